use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tsp_core::{DistanceMatrix, Result, Waypoint};

/// Reproducible instance source for sweeps and solver tests. The same
/// seed and call sequence always yields the same instances.
pub struct InstanceGenerator {
    rng: Xoshiro256StarStar,
}

impl InstanceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Directed matrix with integer metre costs in `[50, 5000)`.
    ///
    /// Integer-valued entries keep tour sums exact in an f64, so the
    /// exact solvers must agree to the bit.
    pub fn directed(&mut self, n: usize) -> Result<DistanceMatrix> {
        let mut rows = vec![vec![0.0; n]; n];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cost) in row.iter_mut().enumerate() {
                if i != j {
                    *cost = f64::from(self.rng.gen_range(50u32..5000));
                }
            }
        }
        DistanceMatrix::from_rows(rows)
    }

    /// Waypoints scattered over lower Manhattan, paired with their
    /// great-circle matrix.
    pub fn planar(&mut self, n: usize) -> Result<(Vec<Waypoint>, DistanceMatrix)> {
        let waypoints: Vec<Waypoint> = (0..n)
            .map(|_| {
                Waypoint::new(
                    self.rng.gen_range(-74.05..-73.90),
                    self.rng.gen_range(40.68..40.80),
                )
            })
            .collect();
        let matrix = DistanceMatrix::from_waypoints(&waypoints)?;
        Ok((waypoints, matrix))
    }
}
