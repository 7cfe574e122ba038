use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// A closed visiting order: starts and ends at waypoint 0 and covers
/// every other waypoint exactly once in between.
///
/// The only way to build one is [`Tour::from_indices`], so a `Tour` in
/// hand is always a well-formed cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tour {
    indices: Vec<usize>,
}

impl Tour {
    /// Validates the cycle shape: `node_count + 1` entries, waypoint 0 at
    /// both ends, interior a permutation of the remaining waypoints.
    pub fn from_indices(indices: Vec<usize>, node_count: usize) -> Result<Self> {
        if indices.len() != node_count + 1 {
            return Err(Error::invalid_tour(format!(
                "expected {} entries for {node_count} waypoints, got {}",
                node_count + 1,
                indices.len()
            )));
        }
        if indices.first() != Some(&0) || indices.last() != Some(&0) {
            return Err(Error::invalid_tour("tour must start and end at waypoint 0"));
        }
        let mut seen = vec![false; node_count];
        for &index in &indices[..node_count] {
            if index >= node_count {
                return Err(Error::invalid_tour(format!(
                    "waypoint {index} is out of range"
                )));
            }
            if seen[index] {
                return Err(Error::invalid_tour(format!(
                    "waypoint {index} visited twice"
                )));
            }
            seen[index] = true;
        }
        Ok(Self { indices })
    }

    /// Number of distinct waypoints the tour visits.
    pub fn node_count(&self) -> usize {
        self.indices.len() - 1
    }

    /// The full index sequence, closing 0 included.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for index in &self.indices {
            if !first {
                write!(f, " -> ")?;
            }
            write!(f, "{index}")?;
            first = false;
        }
        Ok(())
    }
}

/// What a solver hands back: the winning tour and its summed cost on the
/// matrix it was solved against.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolverResult {
    pub distance: f64,
    pub path: Tour,
}
