//! JSON command bridge for the tour solvers.
//!
//! Reads one request object from stdin (or from a file named as the only
//! argument), solves it, and prints the result on stdout. Errors go to
//! stderr with a failing exit code, so a frontend can shell out to this
//! binary and treat it as a pure function.
//!
//! A request names either a ready cost `matrix` (nullable entries, as
//! routing providers return them) or raw `waypoints` for the
//! straight-line fallback, plus an optional solver `mode`, per-waypoint
//! `parameters`, and a `bruteForceCeiling` override.

use std::io::Read;
use std::process::ExitCode;

use serde::{Deserialize, Serialize};
use tsp_core::{DistanceMatrix, Error, ParameterMap, Result, Tour, Waypoint};
use tsp_selector::{select_weighted, select_with, Mode, SelectorOptions};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveRequest {
    #[serde(default)]
    matrix: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default)]
    waypoints: Option<Vec<Waypoint>>,
    #[serde(default)]
    parameters: Option<ParameterMap>,
    #[serde(default)]
    mode: Option<Mode>,
    #[serde(default)]
    brute_force_ceiling: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    /// Cost of the tour on the unadjusted matrix.
    distance: f64,
    path: Tour,
    /// Cost on the weighted matrix, when parameters were sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    adjusted_distance: Option<f64>,
}

fn handle(request: SolveRequest) -> Result<SolveResponse> {
    let matrix = match (request.matrix, request.waypoints) {
        (Some(rows), None) => DistanceMatrix::from_provider_rows(rows)?,
        (None, Some(waypoints)) => DistanceMatrix::from_waypoints(&waypoints)?,
        (Some(_), Some(_)) => {
            return Err(Error::invalid_request(
                "request carries both a matrix and waypoints; send one of them",
            ))
        }
        (None, None) => {
            return Err(Error::invalid_request(
                "request needs either a matrix or waypoints",
            ))
        }
    };

    let mode = request.mode.unwrap_or_default();
    let mut options = SelectorOptions::default();
    if let Some(ceiling) = request.brute_force_ceiling {
        options.brute_force_ceiling = ceiling;
    }

    let params = request.parameters.unwrap_or_default();
    let response = if params.is_empty() {
        let result = select_with(&matrix, mode, &options)?;
        SolveResponse {
            distance: result.distance,
            path: result.path,
            adjusted_distance: None,
        }
    } else {
        let weighted = select_weighted(&matrix, &params, mode, &options)?;
        SolveResponse {
            distance: weighted.true_distance,
            path: weighted.selection.path,
            adjusted_distance: Some(weighted.selection.distance),
        }
    };
    log::info!(
        "{mode} solved {} waypoints: {}",
        response.path.node_count(),
        response.path
    );
    Ok(response)
}

fn read_payload() -> Result<String> {
    match std::env::args().nth(1) {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run() -> Result<String> {
    let payload = read_payload()?;
    let request: SolveRequest = serde_json::from_str(&payload)
        .map_err(|err| Error::invalid_request(format!("malformed request: {err}")))?;
    let response = handle(request)?;
    Ok(serde_json::to_string(&response)?)
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("tsp-bridge: {err}");
            ExitCode::FAILURE
        }
    }
}
