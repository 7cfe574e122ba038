#![deny(clippy::all)]

//! Exhaustive tour search.
//!
//! Enumerates every permutation of the non-start waypoints with Heap's
//! algorithm and keeps the strictly cheapest closed tour, so the first
//! tour reaching the minimum wins and reruns are deterministic. Runtime
//! is factorial in the waypoint count; the selector caps it, and the
//! other solvers use this crate as their correctness oracle.

use std::time::Instant;

use tsp_core::{CancelToken, DistanceMatrix, Error, Result, SolverResult, Tour};

/// Permutations priced between cancellation polls.
const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Solves without a cancellation hook.
pub fn solve(matrix: &DistanceMatrix) -> Result<SolverResult> {
    solve_with(matrix, &CancelToken::new())
}

/// Solves on the calling thread, checking `cancel` up front and then
/// coarsely between permutations.
pub fn solve_with(matrix: &DistanceMatrix, cancel: &CancelToken) -> Result<SolverResult> {
    let n = matrix.size();
    if n < 2 {
        return Err(Error::InsufficientWaypoints(n));
    }
    cancel.check()?;

    let started = Instant::now();
    let mut rest: Vec<usize> = (1..n).collect();
    let mut best_cost = f64::INFINITY;
    let mut best_order = rest.clone();
    let mut since_poll = 0u64;

    for_each_permutation(&mut rest, |order| {
        since_poll += 1;
        if since_poll == CANCEL_POLL_INTERVAL {
            since_poll = 0;
            cancel.check()?;
        }
        let cost = price(matrix, order[0], &order[1..]);
        if cost < best_cost {
            best_cost = cost;
            best_order.clear();
            best_order.extend_from_slice(order);
        }
        Ok(())
    })?;

    log::debug!(
        "exhaustive search over {n} waypoints took {:?}",
        started.elapsed()
    );
    finish(n, best_cost, &best_order)
}

/// Splits the search across up to `workers` threads, sharded by the
/// waypoint visited first.
///
/// Shards are disjoint and cover the whole search space, and their
/// results fold in ascending shard order with the same strict
/// comparison, so repeated runs return the same tour. The distance
/// always matches [`solve`]; on cost ties the winning tour can be a
/// different one, since the two enumerations meet equal tours in a
/// different order.
pub fn solve_sharded(
    matrix: &DistanceMatrix,
    workers: usize,
    cancel: &CancelToken,
) -> Result<SolverResult> {
    let n = matrix.size();
    if n < 2 {
        return Err(Error::InsufficientWaypoints(n));
    }
    if workers == 0 {
        return Err(Error::invalid_parameter("worker count must be non-zero"));
    }
    if n == 2 {
        return solve_with(matrix, cancel);
    }
    cancel.check()?;

    let started = Instant::now();
    let shards: Vec<usize> = (1..n).collect();
    let (sender, receiver) = crossbeam_channel::unbounded();

    std::thread::scope(|scope| {
        for chunk in shards.chunks(shards.len().div_ceil(workers)) {
            let sender = sender.clone();
            scope.spawn(move || {
                for &first in chunk {
                    let outcome = solve_shard(matrix, first, cancel);
                    if sender.send((first, outcome)).is_err() {
                        return;
                    }
                }
            });
        }
    });
    drop(sender);

    let mut outcomes: Vec<_> = receiver.into_iter().collect();
    outcomes.sort_by_key(|(first, _)| *first);

    let mut best_cost = f64::INFINITY;
    let mut best_order = Vec::new();
    for (_, outcome) in outcomes {
        let (cost, order) = outcome?;
        if cost < best_cost {
            best_cost = cost;
            best_order = order;
        }
    }

    log::debug!(
        "sharded search over {n} waypoints on {workers} workers took {:?}",
        started.elapsed()
    );
    finish(n, best_cost, &best_order)
}

/// Best tour through every permutation that visits `first` directly
/// after the start.
fn solve_shard(
    matrix: &DistanceMatrix,
    first: usize,
    cancel: &CancelToken,
) -> Result<(f64, Vec<usize>)> {
    cancel.check()?;
    let n = matrix.size();
    let mut tail: Vec<usize> = (1..n).filter(|&city| city != first).collect();
    let mut best_cost = f64::INFINITY;
    let mut best_tail = tail.clone();
    let mut since_poll = 0u64;

    for_each_permutation(&mut tail, |order| {
        since_poll += 1;
        if since_poll == CANCEL_POLL_INTERVAL {
            since_poll = 0;
            cancel.check()?;
        }
        let cost = price(matrix, first, order);
        if cost < best_cost {
            best_cost = cost;
            best_tail.clear();
            best_tail.extend_from_slice(order);
        }
        Ok(())
    })?;

    let mut order = Vec::with_capacity(n - 1);
    order.push(first);
    order.extend_from_slice(&best_tail);
    Ok((best_cost, order))
}

/// Cost of the closed tour `0 -> first -> rest.. -> 0`.
fn price(matrix: &DistanceMatrix, first: usize, rest: &[usize]) -> f64 {
    let mut cost = matrix.get(0, first);
    let mut from = first;
    for &to in rest {
        cost += matrix.get(from, to);
        from = to;
    }
    cost + matrix.get(from, 0)
}

/// Heap's algorithm, iterative form. Visits the identity order first,
/// then every other permutation of `items` exactly once, swapping in
/// place.
fn for_each_permutation<F>(items: &mut [usize], mut visit: F) -> Result<()>
where
    F: FnMut(&[usize]) -> Result<()>,
{
    visit(items)?;
    let n = items.len();
    let mut counters = vec![0usize; n];
    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            visit(items)?;
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
    Ok(())
}

fn finish(n: usize, best_cost: f64, order: &[usize]) -> Result<SolverResult> {
    let mut indices = Vec::with_capacity(n + 1);
    indices.push(0);
    indices.extend_from_slice(order);
    indices.push(0);
    let path = Tour::from_indices(indices, n)?;
    Ok(SolverResult {
        distance: best_cost,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> DistanceMatrix {
        DistanceMatrix::from_rows(rows).unwrap()
    }

    fn all_ones(n: usize) -> DistanceMatrix {
        matrix(vec![vec![1.0; n]; n])
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
        // Both directions cost 45; the first one enumerated wins.
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
    fn permutation_count_is_factorial() {
        let mut items: Vec<usize> = (0..5).collect();
        let mut count = 0u32;
        for_each_permutation(&mut items, |_| {
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 120);
    }

    #[test]
    fn permutations_are_distinct() {
        let mut items: Vec<usize> = (0..4).collect();
        let mut seen = std::collections::HashSet::new();
        for_each_permutation(&mut items, |order| {
            assert!(seen.insert(order.to_vec()));
            Ok(())
        })
        .unwrap();
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn cancelled_token_stops_the_search() {
        let token = CancelToken::new();
        token.cancel();
        // 7! = 5040 permutations, past the first poll.
        assert!(matches!(
            solve_with(&all_ones(8), &token),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn cancellation_applies_before_the_first_permutation() {
        let token = CancelToken::new();
        token.cancel();
        // 4! = 24 permutations, well under one poll interval, so only
        // the entry check can see the token.
        assert!(matches!(
            solve_with(&all_ones(5), &token),
            Err(Error::Cancelled)
        ));
        assert!(matches!(
            solve_sharded(&all_ones(5), 2, &token),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn an_expired_deadline_cancels_the_solve() {
        let token = CancelToken::with_timeout(std::time::Duration::ZERO);
        assert!(matches!(
            solve_with(&all_ones(3), &token),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn a_deadline_fires_mid_search() {
        let token = CancelToken::with_timeout(std::time::Duration::from_millis(10));
        // 11! permutations keep the search busy well past the deadline,
        // so an in-flight poll has to see the expiry.
        assert!(matches!(
            solve_with(&all_ones(12), &token),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn sharded_distance_matches_the_single_thread() {
        let matrix = matrix(vec![
            vec![0.0, 9.0, 1.0, 9.0, 3.0],
            vec![9.0, 0.0, 9.0, 1.0, 7.0],
            vec![1.0, 1.0, 0.0, 9.0, 5.0],
            vec![1.0, 9.0, 9.0, 0.0, 2.0],
            vec![4.0, 6.0, 2.0, 8.0, 0.0],
        ]);
        let single = solve(&matrix).unwrap();
        let sharded = solve_sharded(&matrix, 2, &CancelToken::new()).unwrap();
        assert_eq!(sharded.distance, single.distance);
    }

    #[test]
    fn sharded_ties_prefer_the_lowest_first_waypoint() {
        let matrix = matrix(vec![
            vec![0.0, 10.0, 15.0],
            vec![10.0, 0.0, 20.0],
            vec![15.0, 20.0, 0.0],
        ]);
        let result = solve_sharded(&matrix, 2, &CancelToken::new()).unwrap();
        assert_eq!(result.distance, 45.0);
        assert_eq!(result.path.indices(), &[0, 1, 2, 0]);
    }

    #[test]
    fn sharded_two_waypoints_fall_back_to_the_single_thread() {
        let matrix = matrix(vec![vec![0.0, 3.0], vec![4.0, 0.0]]);
        let result = solve_sharded(&matrix, 4, &CancelToken::new()).unwrap();
        assert_eq!(result.distance, 7.0);
    }

    #[test]
    fn sharded_rejects_zero_workers() {
        assert!(matches!(
            solve_sharded(&all_ones(4), 0, &CancelToken::new()),
            Err(Error::InvalidParameter(_))
        ));
    }
}
