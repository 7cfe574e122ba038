#![deny(clippy::all)]

//! Identity baseline: visit the waypoints in the order they were given.
//!
//! This prices the route a user would drive without optimizing, which
//! makes it the yardstick for the exact solvers. Any correct solver must
//! come in at or below this distance on the same matrix.

use tsp_core::{DistanceMatrix, Error, Result, SolverResult, Tour};

/// Prices the input-order tour `0, 1, .., n-1, 0`.
pub fn solve(matrix: &DistanceMatrix) -> Result<SolverResult> {
    let n = matrix.size();
    if n < 2 {
        return Err(Error::InsufficientWaypoints(n));
    }
    let mut indices: Vec<usize> = (0..n).collect();
    indices.push(0);
    let path = Tour::from_indices(indices, n)?;
    let distance = matrix.tour_cost(&path)?;
    Ok(SolverResult { distance, path })
}
