#![deny(clippy::all)]

//! Validation harness for the tour solvers.
//!
//! Seeded instance generation plus sweeps that run the exact solvers
//! against each other over a grid of sizes. The `agreement-sweep`
//! binary drives [`sweep::run`] and writes a CSV report.

mod generator;
pub mod sweep;

pub use generator::InstanceGenerator;
