#![deny(clippy::all)]

//! Shared types and primitives for the waypoint tour problem.
//!
//! Everything a solver consumes lives here: the validated [`DistanceMatrix`],
//! the per-waypoint weighting [`Parameters`] and the [`adjust`] transform,
//! the Hamiltonian [`Tour`] with its [`SolverResult`] pair, and the
//! cooperative [`CancelToken`] the exponential solvers poll.

mod adjust;
mod cancel;
mod error;
mod matrix;
mod params;
mod tour;
mod waypoint;

pub use adjust::{adjust, ParameterMap};
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use matrix::DistanceMatrix;
pub use params::Parameters;
pub use tour::{SolverResult, Tour};
pub use waypoint::Waypoint;
