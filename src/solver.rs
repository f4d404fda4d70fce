//! Route ordering solver (nearest-neighbor construction + 2-opt refinement).

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::haversine::distance_m;
use crate::stop::{ResolvedStop, Stop, Tour};
use crate::traits::{CoordinateResolver, LegScorer, Pacer};

#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Minimum straight-line saving (meters) for a 2-opt move to apply.
    /// Guards against floating-point noise re-applying no-op moves.
    pub improvement_threshold_m: f64,
    /// Maximum full 2-opt passes before accepting the current order.
    pub max_refine_passes: usize,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            improvement_threshold_m: 1e-6,
            max_refine_passes: 100,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    /// Fewer than two stops could be placed on the map.
    #[error("route optimization needs at least 2 resolvable stops, got {resolved}")]
    InsufficientStops { resolved: usize },
}

/// Outcome of a successful optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeResult {
    /// Refined visiting order over every stop that resolved.
    pub tour: Tour,
    /// Stops dropped because coordinate resolution failed, in input order.
    pub excluded: Vec<Stop>,
}

/// Orders a stop set into a short driving route.
///
/// Stops without a coordinate are resolved through `resolver`, paced by
/// `pacer` between successive lookups; a stop whose lookup fails is
/// excluded and reported in the result rather than aborting the run.
/// The surviving stops are ordered by nearest-neighbor construction and
/// refined with 2-opt. Fails only when fewer than two stops resolve.
pub fn optimize<R, P>(
    stops: Vec<Stop>,
    resolver: &R,
    pacer: &P,
    options: &OptimizeOptions,
) -> Result<OptimizeResult, OptimizeError>
where
    R: CoordinateResolver,
    P: Pacer,
{
    let mut resolved: Vec<ResolvedStop> = Vec::with_capacity(stops.len());
    let mut excluded: Vec<Stop> = Vec::new();
    let mut lookups = 0usize;

    for mut stop in stops {
        if stop.coordinate().is_none() {
            if lookups > 0 {
                pacer.pause();
            }
            lookups += 1;
            if let Some(coordinate) = resolver.resolve(stop.query()) {
                stop.resolve(coordinate);
            }
        }

        match stop.into_resolved() {
            Ok(placed) => resolved.push(placed),
            Err(unplaced) => {
                warn!(
                    stop = %unplaced.id(),
                    query = unplaced.query(),
                    "coordinate resolution failed, excluding stop"
                );
                excluded.push(unplaced);
            }
        }
    }

    if resolved.len() < 2 {
        return Err(OptimizeError::InsufficientStops {
            resolved: resolved.len(),
        });
    }

    debug!(
        resolved = resolved.len(),
        excluded = excluded.len(),
        "ordering stops"
    );

    let mut order = nearest_neighbor(resolved);
    two_opt(&mut order, options);

    Ok(OptimizeResult {
        tour: Tour::new(order),
        excluded,
    })
}

/// Builds an initial visiting order by nearest-neighbor selection.
///
/// The first input stop stays first; each following position takes the
/// closest not-yet-visited stop, ties broken by earliest input index.
/// Returns a permutation of the input.
pub fn nearest_neighbor(stops: Vec<ResolvedStop>) -> Vec<ResolvedStop> {
    let n = stops.len();
    if n <= 1 {
        return stops;
    }

    let mut visited = vec![false; n];
    visited[0] = true;
    let mut order_indices = Vec::with_capacity(n);
    order_indices.push(0);
    let mut current = 0usize;

    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for i in 0..n {
            if visited[i] {
                continue;
            }
            let d = distance_m(stops[current].coordinate(), stops[i].coordinate());
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((i, d));
            }
        }

        match best {
            Some((next, _)) => {
                visited[next] = true;
                order_indices.push(next);
                current = next;
            }
            None => break,
        }
    }

    let mut slots: Vec<Option<ResolvedStop>> = stops.into_iter().map(Some).collect();
    order_indices
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

/// Refines a visiting order in place with 2-opt segment reversal.
///
/// Candidate moves are scored over the closed loop (the last stop
/// connects back to the first), but the order itself stays an open
/// sequence; the wrap-around edge exists only inside the scoring step.
/// The first improving move in a pass applies immediately and the scan
/// resumes at the next leading edge. Passes repeat until one completes
/// with no move, bounded by `max_refine_passes`.
pub fn two_opt(order: &mut [ResolvedStop], options: &OptimizeOptions) {
    let n = order.len();
    if n <= 3 {
        return;
    }

    for pass in 0..options.max_refine_passes {
        let mut improved = false;

        for i in 0..n - 2 {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    // The same closed loop walked backwards; not a move.
                    continue;
                }

                let a = order[i].coordinate();
                let b = order[i + 1].coordinate();
                let c = order[j].coordinate();
                let d = order[(j + 1) % n].coordinate();

                let delta =
                    distance_m(a, c) + distance_m(b, d) - distance_m(a, b) - distance_m(c, d);

                if delta < -options.improvement_threshold_m {
                    order[i + 1..=j].reverse();
                    improved = true;
                    break;
                }
            }
        }

        if !improved {
            debug!(passes = pass + 1, "2-opt reached a local optimum");
            return;
        }
    }
}

/// Closed-loop straight-line length of a visiting order in meters.
///
/// This is the refinement objective. It is not road distance and must
/// not be reported to users as travel distance.
pub fn tour_length_m(order: &[ResolvedStop]) -> f64 {
    if order.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for pair in order.windows(2) {
        total += distance_m(pair[0].coordinate(), pair[1].coordinate());
    }
    total + distance_m(order[order.len() - 1].coordinate(), order[0].coordinate())
}

/// Aggregate road metrics over a tour's consecutive legs.
///
/// A failed leg contributes zero to the totals; `failed_legs` records
/// how many did, so partial totals are visible instead of silently low.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RouteMetrics {
    pub total_distance_m: f64,
    pub total_duration_s: f64,
    pub scored_legs: usize,
    pub failed_legs: usize,
}

impl RouteMetrics {
    pub fn is_complete(&self) -> bool {
        self.failed_legs == 0
    }
}

/// Scores every consecutive pair of a tour and sums the results.
///
/// Legs are scored in tour order, paced between successive calls, so
/// partial-failure outcomes are reproducible.
pub fn score_tour<S, P>(tour: &Tour, scorer: &S, pacer: &P) -> RouteMetrics
where
    S: LegScorer,
    P: Pacer,
{
    let mut metrics = RouteMetrics::default();

    for (leg_index, pair) in tour.stops().windows(2).enumerate() {
        if leg_index > 0 {
            pacer.pause();
        }

        match scorer.score(pair[0].coordinate(), pair[1].coordinate()) {
            Some(leg) => {
                metrics.total_distance_m += leg.distance_m;
                metrics.total_duration_s += leg.duration_s;
                metrics.scored_legs += 1;
            }
            None => {
                warn!(
                    from = %pair[0].id(),
                    to = %pair[1].id(),
                    "leg scoring failed, totals are partial"
                );
                metrics.failed_legs += 1;
            }
        }
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stop::{Coordinate, StopId};

    fn resolved(id: &str, lat: f64, lng: f64) -> ResolvedStop {
        Stop::new(StopId::new(id), id.to_uppercase())
            .unwrap()
            .with_coordinate(Coordinate::new(lat, lng).unwrap())
            .into_resolved()
            .unwrap()
    }

    fn ids(order: &[ResolvedStop]) -> Vec<&str> {
        order.iter().map(|stop| stop.id().as_str()).collect()
    }

    #[test]
    fn test_nn_empty_and_single() {
        assert!(nearest_neighbor(Vec::new()).is_empty());

        let single = nearest_neighbor(vec![resolved("a", 0.0, 0.0)]);
        assert_eq!(ids(&single), vec!["a"]);
    }

    #[test]
    fn test_nn_keeps_first_stop() {
        let order = nearest_neighbor(vec![
            resolved("a", 0.0, 0.0),
            resolved("b", 0.0, 10.0),
            resolved("c", 0.0, 5.0),
        ]);
        assert_eq!(order[0].id().as_str(), "a");
    }

    #[test]
    fn test_nn_chooses_nearest() {
        // C sits between A and B, so greedy selection from A takes C first.
        let order = nearest_neighbor(vec![
            resolved("a", 0.0, 0.0),
            resolved("b", 0.0, 10.0),
            resolved("c", 0.0, 5.0),
        ]);
        assert_eq!(ids(&order), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_nn_tie_breaks_by_input_index() {
        // B and C are equidistant from A; B comes first in the input.
        let order = nearest_neighbor(vec![
            resolved("a", 0.0, 0.0),
            resolved("b", 0.0, 1.0),
            resolved("c", 0.0, -1.0),
        ]);
        assert_eq!(ids(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_nn_is_permutation() {
        let input = vec![
            resolved("a", 0.1, 0.4),
            resolved("b", 0.3, 0.2),
            resolved("c", 0.2, 0.9),
            resolved("d", 0.7, 0.1),
        ];
        let order = nearest_neighbor(input.clone());

        let mut got = ids(&order);
        got.sort_unstable();
        let mut expected = ids(&input);
        expected.sort_unstable();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_two_opt_short_tours_unchanged() {
        let options = OptimizeOptions::default();

        for len in 0..=3usize {
            let mut order: Vec<ResolvedStop> = (0..len)
                .map(|i| resolved(&format!("s{}", i), i as f64, (len - i) as f64))
                .collect();
            let before = ids(&order)
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<_>>();
            two_opt(&mut order, &options);
            assert_eq!(ids(&order), before, "length {} must not change", len);
        }
    }

    #[test]
    fn test_two_opt_uncrosses_bowtie() {
        // Convex hull order is a, b, c, d; the bowtie visits the two
        // diagonals. 2-opt must recover the perimeter.
        let mut order = vec![
            resolved("a", 0.000, 0.000),
            resolved("b", 0.000, 0.010),
            resolved("d", 0.011, 0.001),
            resolved("c", 0.010, 0.025),
        ];
        let before = tour_length_m(&order);

        two_opt(&mut order, &OptimizeOptions::default());
        let after = tour_length_m(&order);

        assert!(after < before, "expected improvement, {} >= {}", after, before);
        assert_eq!(ids(&order), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn test_two_opt_idempotent_at_local_optimum() {
        let options = OptimizeOptions::default();
        let mut order = vec![
            resolved("a", 0.000, 0.000),
            resolved("b", 0.000, 0.010),
            resolved("d", 0.011, 0.001),
            resolved("c", 0.010, 0.025),
        ];

        two_opt(&mut order, &options);
        let settled = ids(&order)
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let settled_length = tour_length_m(&order);

        two_opt(&mut order, &options);
        assert_eq!(ids(&order), settled);
        assert_eq!(tour_length_m(&order), settled_length);
    }

    #[test]
    fn test_tour_length_closed_loop() {
        let order = vec![resolved("a", 0.0, 0.0), resolved("b", 0.0, 1.0)];
        let one_way = distance_m(order[0].coordinate(), order[1].coordinate());
        assert!((tour_length_m(&order) - 2.0 * one_way).abs() < 1e-6);
    }

    #[test]
    fn test_tour_length_degenerate() {
        assert_eq!(tour_length_m(&[]), 0.0);
        assert_eq!(tour_length_m(&[resolved("a", 1.0, 2.0)]), 0.0);
    }
}
