use crate::{Error, Result, Tour, Waypoint};

/// Immutable n-by-n travel cost table, row-major in one allocation for
/// cache locality.
///
/// `get(from, to)` is the cost of travelling from waypoint `from` to
/// waypoint `to`. The table need not be symmetric (directed road costs)
/// and the diagonal is never read by a solver. Construction validates
/// shape and entries, so a held matrix is always safe to solve.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from explicit rows.
    ///
    /// Rejects an empty table, ragged rows, and any entry that is not a
    /// finite non-negative number.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(Error::invalid_matrix("matrix is empty"));
        }
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(Error::invalid_matrix(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            for (j, &cost) in row.iter().enumerate() {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(Error::invalid_matrix(format!(
                        "entry [{i}][{j}] = {cost} is not a finite non-negative cost"
                    )));
                }
                data.push(cost);
            }
        }
        Ok(Self { data, size })
    }

    /// Builds a matrix from a routing provider payload, where a pair
    /// with no drivable route comes back as `null`.
    pub fn from_provider_rows(rows: Vec<Vec<Option<f64>>>) -> Result<Self> {
        let mut dense = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (j, cost) in row.into_iter().enumerate() {
                match cost {
                    Some(cost) => out.push(cost),
                    None => {
                        return Err(Error::invalid_matrix(format!(
                            "no route from waypoint {i} to waypoint {j}"
                        )))
                    }
                }
            }
            dense.push(out);
        }
        Self::from_rows(dense)
    }

    /// Straight-line fallback: great-circle metres between every pair.
    pub fn from_waypoints(waypoints: &[Waypoint]) -> Result<Self> {
        let rows = waypoints
            .iter()
            .map(|from| waypoints.iter().map(|to| from.distance_to(to)).collect())
            .collect();
        Self::from_rows(rows)
    }

    /// Number of waypoints the table covers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cost of travelling from waypoint `from` to waypoint `to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sum of `tour`'s consecutive edges on this table, closing edge
    /// included.
    pub fn tour_cost(&self, tour: &Tour) -> Result<f64> {
        if tour.node_count() != self.size {
            return Err(Error::invalid_tour(format!(
                "tour visits {} waypoints but the matrix covers {}",
                tour.node_count(),
                self.size
            )));
        }
        let mut total = 0.0;
        for pair in tour.indices().windows(2) {
            total += self.get(pair[0], pair[1]);
        }
        Ok(total)
    }

    /// Rows view, for serialization and error reporting.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}
