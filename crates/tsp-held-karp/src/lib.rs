#![deny(clippy::all)]

//! Exact tour solver by dynamic programming over visited sets.
//!
//! A state is a pair of current waypoint and visited-waypoint bitmask.
//! The cheapest completion of every state is memoized together with the
//! waypoint that achieves it, and the winning tour is read back by
//! following those successors from the start state. Time is
//! `O(n^2 * 2^n)` and memory `O(n * 2^n)`, which reaches input sizes the
//! exhaustive search never will; past roughly twenty-five waypoints the
//! memo no longer fits in memory.

use std::time::Instant;

use tsp_core::{CancelToken, DistanceMatrix, Error, Result, SolverResult, Tour};

/// Fresh states solved between cancellation polls.
const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Largest waypoint count whose `n * 2^n` memo table is still indexable
/// by a `usize`: 58 on 64-bit targets. The visited-set bitmask fits by
/// construction, and memory runs out well below this.
const MEMO_CEILING: usize = {
    let mut n = 1;
    while n + 1 < usize::BITS as usize && (n + 1).checked_mul(1 << (n + 1)).is_some() {
        n += 1;
    }
    n
};

/// Solves without a cancellation hook.
pub fn solve(matrix: &DistanceMatrix) -> Result<SolverResult> {
    solve_with(matrix, &CancelToken::new())
}

/// Solves on the calling thread, checking `cancel` up front and then as
/// the memo fills.
pub fn solve_with(matrix: &DistanceMatrix, cancel: &CancelToken) -> Result<SolverResult> {
    let n = matrix.size();
    if n < 2 {
        return Err(Error::InsufficientWaypoints(n));
    }
    if n > MEMO_CEILING {
        return Err(Error::CapacityExceeded {
            waypoints: n,
            ceiling: MEMO_CEILING,
        });
    }
    cancel.check()?;

    let started = Instant::now();
    let mut memo = Memo::new(n);
    memo.cost(matrix, 0, 1, cancel)?;
    let path = Tour::from_indices(memo.walk_successors(n)?, n)?;
    // Reprice on the matrix so the reported distance re-derives from
    // the path, not from the memo's fold order.
    let distance = matrix.tour_cost(&path)?;

    log::debug!(
        "dp solved {n} waypoints, {} of {} states touched, in {:?}",
        memo.fresh,
        memo.entries.len(),
        started.elapsed()
    );
    Ok(SolverResult { distance, path })
}

#[derive(Clone, Copy)]
struct Entry {
    cost: f64,
    next: u8,
}

struct Memo {
    entries: Vec<Option<Entry>>,
    n: usize,
    full: usize,
    fresh: u64,
}

impl Memo {
    fn new(n: usize) -> Self {
        Self {
            entries: vec![None; n * (1 << n)],
            n,
            full: (1 << n) - 1,
            fresh: 0,
        }
    }

    #[inline]
    fn key(&self, pos: usize, mask: usize) -> usize {
        pos * (self.full + 1) + mask
    }

    /// Cheapest completion from `pos` with `mask` already visited, the
    /// closing edge back to the start included. Candidate successors are
    /// tried in ascending order and kept only on a strict improvement,
    /// so ties resolve to the lowest waypoint.
    fn cost(
        &mut self,
        matrix: &DistanceMatrix,
        pos: usize,
        mask: usize,
        cancel: &CancelToken,
    ) -> Result<f64> {
        if mask == self.full {
            return Ok(matrix.get(pos, 0));
        }
        let key = self.key(pos, mask);
        if let Some(entry) = self.entries[key] {
            return Ok(entry.cost);
        }

        self.fresh += 1;
        if self.fresh % CANCEL_POLL_INTERVAL == 0 {
            cancel.check()?;
        }

        let mut best = f64::INFINITY;
        let mut next = 0u8;
        for city in 1..self.n {
            let bit = 1usize << city;
            if mask & bit != 0 {
                continue;
            }
            let candidate = matrix.get(pos, city) + self.cost(matrix, city, mask | bit, cancel)?;
            if candidate < best {
                best = candidate;
                next = city as u8;
            }
        }
        self.entries[key] = Some(Entry { cost: best, next });
        Ok(best)
    }

    /// Reads the winning tour back from the successor pointers.
    fn walk_successors(&self, n: usize) -> Result<Vec<usize>> {
        let mut indices = Vec::with_capacity(n + 1);
        indices.push(0);
        let mut pos = 0usize;
        let mut mask = 1usize;
        while mask != self.full {
            let entry = self.entries[self.key(pos, mask)]
                .ok_or_else(|| Error::invalid_tour("unsolved state on the winning tour"))?;
            pos = entry.next as usize;
            indices.push(pos);
            mask |= 1 << pos;
        }
        indices.push(0);
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> DistanceMatrix {
        DistanceMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn three_waypoints_symmetric() {
        let matrix = matrix(vec![
            vec![0.0, 10.0, 15.0],
            vec![10.0, 0.0, 20.0],
            vec![15.0, 20.0, 0.0],
        ]);
        let result = solve(&matrix).unwrap();
        assert_eq!(result.distance, 45.0);
        assert_eq!(result.path.indices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn two_waypoints_make_an_out_and_back() {
        let matrix = matrix(vec![vec![0.0, 3.0], vec![4.0, 0.0]]);
        let result = solve(&matrix).unwrap();
        assert_eq!(result.distance, 7.0);
        assert_eq!(result.path.indices(), &[0, 1, 0]);
    }

    #[test]
    fn finds_the_cheap_directed_cycle() {
        let matrix = matrix(vec![
            vec![0.0, 9.0, 1.0, 9.0],
            vec![9.0, 0.0, 9.0, 1.0],
            vec![1.0, 1.0, 0.0, 9.0],
            vec![1.0, 9.0, 9.0, 0.0],
        ]);
        let result = solve(&matrix).unwrap();
        assert_eq!(result.distance, 4.0);
        assert_eq!(result.path.indices(), &[0, 2, 1, 3, 0]);
    }

    #[test]
    fn one_waypoint_is_not_a_tour() {
        let matrix = matrix(vec![vec![0.0]]);
        assert!(matches!(
            solve(&matrix),
            Err(Error::InsufficientWaypoints(1))
        ));
    }

    #[test]
    fn tables_past_the_memo_ceiling_are_refused() {
        // 59 * 2^59 slots already overflow a 64-bit usize; the guard has
        // to fire instead of the table-size arithmetic.
        for n in [59usize, 64] {
            let matrix = matrix(vec![vec![1.0; n]; n]);
            assert!(matches!(
                solve(&matrix),
                Err(Error::CapacityExceeded {
                    waypoints,
                    ceiling: MEMO_CEILING,
                }) if waypoints == n
            ));
        }
    }

    #[test]
    fn cancelled_token_stops_the_fill() {
        let token = CancelToken::new();
        token.cancel();
        let matrix = matrix(vec![vec![1.0; 12]; 12]);
        assert!(matches!(
            solve_with(&matrix, &token),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn cancellation_applies_before_the_first_state() {
        let token = CancelToken::new();
        token.cancel();
        // A 5-waypoint memo holds fewer states than one poll interval,
        // so only the entry check can see the token.
        let matrix = matrix(vec![vec![1.0; 5]; 5]);
        assert!(matches!(
            solve_with(&matrix, &token),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn a_deadline_fires_while_the_memo_fills() {
        let token = CancelToken::with_timeout(std::time::Duration::from_millis(1));
        // A million-state fill cannot finish inside the deadline, so an
        // in-flight poll has to see the expiry.
        let matrix = matrix(vec![vec![1.0; 16]; 16]);
        assert!(matches!(
            solve_with(&matrix, &token),
            Err(Error::Cancelled)
        ));
    }
}
