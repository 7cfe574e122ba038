#![deny(clippy::all)]

//! Solver selection for tour requests.
//!
//! One entry point for callers: pick a [`Mode`], hand over a validated
//! matrix, and get a [`SolverResult`] back. The selector owns the
//! preconditions (minimum waypoint count, the exhaustive solver's
//! ceiling) and refuses a request before any solver spends time on it.
//! [`select_weighted`] layers the per-waypoint parameter adjustment on
//! top and reprices the winner at true cost.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tsp_core::{
    adjust, CancelToken, DistanceMatrix, Error, ParameterMap, Result, SolverResult,
};

/// Most waypoints the exhaustive solver accepts by default; nine
/// waypoints still mean only `8!` tours.
pub const DEFAULT_BRUTE_FORCE_CEILING: usize = 9;
/// Fewest waypoints that make a closed tour.
pub const MIN_WAYPOINTS: usize = 2;

/// Which solver runs a request. The serialized names are the ones the
/// frontend sends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// Exhaustive permutation search; exact, capped by the ceiling.
    BruteForce,
    /// Dynamic programming over visited sets; exact, uncapped.
    HeldKarp,
    /// Prices the input order without optimizing.
    #[default]
    Identity,
}

impl FromStr for Mode {
    type Err = Error;

    /// Unknown modes are rejected rather than silently mapped to a
    /// fallback solver.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bruteForce" => Ok(Self::BruteForce),
            "heldKarp" => Ok(Self::HeldKarp),
            "identity" => Ok(Self::Identity),
            other => Err(Error::invalid_parameter(format!(
                "unknown solver mode `{other}`"
            ))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BruteForce => "bruteForce",
            Self::HeldKarp => "heldKarp",
            Self::Identity => "identity",
        })
    }
}

/// Knobs for [`select_with`]; the default matches plain [`select`].
#[derive(Clone, Debug)]
pub struct SelectorOptions {
    /// Inclusive waypoint cap for [`Mode::BruteForce`].
    pub brute_force_ceiling: usize,
    /// Stop flag handed to the exact solvers.
    pub cancel: CancelToken,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            brute_force_ceiling: DEFAULT_BRUTE_FORCE_CEILING,
            cancel: CancelToken::new(),
        }
    }
}

/// Dispatches `matrix` to the solver for `mode` with default options.
pub fn select(matrix: &DistanceMatrix, mode: Mode) -> Result<SolverResult> {
    select_with(matrix, mode, &SelectorOptions::default())
}

/// Dispatches `matrix` to the solver for `mode`.
///
/// Every mode needs at least [`MIN_WAYPOINTS`] waypoints, and
/// [`Mode::BruteForce`] additionally refuses inputs past the ceiling;
/// both checks fire before any solver runs.
pub fn select_with(
    matrix: &DistanceMatrix,
    mode: Mode,
    options: &SelectorOptions,
) -> Result<SolverResult> {
    let n = matrix.size();
    if n < MIN_WAYPOINTS {
        return Err(Error::InsufficientWaypoints(n));
    }
    if mode == Mode::BruteForce && n > options.brute_force_ceiling {
        return Err(Error::CapacityExceeded {
            waypoints: n,
            ceiling: options.brute_force_ceiling,
        });
    }

    log::debug!("dispatching {n} waypoints to {mode}");
    match mode {
        Mode::BruteForce => tsp_brute_force::solve_with(matrix, &options.cancel),
        Mode::HeldKarp => tsp_held_karp::solve_with(matrix, &options.cancel),
        Mode::Identity => tsp_baseline::solve(matrix),
    }
}

/// A weighted solve: the tour minimizes the adjusted costs, and the
/// same tour is repriced on the raw matrix.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedResult {
    /// Winner on the adjusted matrix, adjusted distance included.
    pub selection: SolverResult,
    /// The winning tour's cost on the unadjusted matrix.
    pub true_distance: f64,
}

/// Adjusts `matrix` by `params`, solves the adjusted copy, and reprices
/// the winning tour on the unadjusted matrix.
///
/// The adjusted distance steers which tour wins; the true distance is
/// what the driver covers.
pub fn select_weighted(
    matrix: &DistanceMatrix,
    params: &ParameterMap,
    mode: Mode,
    options: &SelectorOptions,
) -> Result<WeightedResult> {
    let adjusted = adjust(matrix, params)?;
    let selection = select_with(&adjusted, mode, options)?;
    let true_distance = matrix.tour_cost(&selection.path)?;
    Ok(WeightedResult {
        selection,
        true_distance,
    })
}
