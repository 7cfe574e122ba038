//! Agreement sweep between the exact solvers.
//!
//! Every instance is solved three ways. The two exact solvers must
//! report the same distance on the generator's integer-valued matrices;
//! the identity baseline rides along as an upper bound and a sanity
//! check on the reported improvements.

use std::time::Instant;

use serde::Serialize;
use tsp_core::Result;

use crate::InstanceGenerator;

/// One solved instance in a sweep report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepRow {
    pub waypoints: usize,
    pub instance: u32,
    pub brute_force_distance: f64,
    pub held_karp_distance: f64,
    pub identity_distance: f64,
    pub brute_force_micros: u128,
    pub held_karp_micros: u128,
    pub agree: bool,
    /// The instance itself, attached only when the solvers disagree so
    /// the dumped row reproduces the failure without re-running the
    /// whole sweep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Vec<f64>>>,
}

/// Runs `instances` seeded instances for every size in `sizes`.
pub fn run(sizes: &[usize], instances: u32, seed: u64) -> Result<Vec<SweepRow>> {
    let mut generator = InstanceGenerator::new(seed);
    let mut rows = Vec::new();
    for &n in sizes {
        for instance in 0..instances {
            let matrix = generator.directed(n)?;

            let started = Instant::now();
            let brute = tsp_brute_force::solve(&matrix)?;
            let brute_force_micros = started.elapsed().as_micros();

            let started = Instant::now();
            let dynamic = tsp_held_karp::solve(&matrix)?;
            let held_karp_micros = started.elapsed().as_micros();

            let identity = tsp_baseline::solve(&matrix)?;

            let agree = brute.distance == dynamic.distance;
            rows.push(SweepRow {
                waypoints: n,
                instance,
                brute_force_distance: brute.distance,
                held_karp_distance: dynamic.distance,
                identity_distance: identity.distance,
                brute_force_micros,
                held_karp_micros,
                agree,
                matrix: (!agree).then(|| matrix.rows()),
            });
        }
        log::info!("swept {instances} instances at {n} waypoints");
    }
    Ok(rows)
}
