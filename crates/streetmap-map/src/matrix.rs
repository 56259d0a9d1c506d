//! Multi-target Dijkstra: one-to-many travel times over a "key set" of
//! intersections (spec §4.5).
//!
//! Grounded on the same heap/stale-entry shape as [`crate::pathfinding`],
//! minus the heuristic, plus the `parallel` Cargo-feature pattern from
//! `dt-sim::sim::compute_intents` (sequential by default, rayon `par_iter`
//! behind the feature gate, one worker per key source writing its own row).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use streetmap_core::IntersectionId;

use crate::index::MapIndex;

/// Sparse travel-time matrix: one row per distinct key source actually asked
/// for, keyed by source rather than a dense `Vec<Vec<_>>` (spec §9, "matrix
/// sparsity" — this scales to large maps where only a handful of
/// depots/pickups/dropoffs are ever rows).
#[derive(Debug, Default)]
pub struct TravelTimeMatrix {
    rows: HashMap<IntersectionId, Vec<f64>>,
}

impl TravelTimeMatrix {
    /// Travel time from `src` to `dst` in seconds, or `+inf` if `src` has no
    /// row (never requested) or `dst` was never settled from it.
    pub fn get(&self, src: IntersectionId, dst: IntersectionId) -> f64 {
        self.rows
            .get(&src)
            .and_then(|row| row.get(dst.index()))
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn row(&self, src: IntersectionId) -> Option<&[f64]> {
        self.rows.get(&src).map(Vec::as_slice)
    }
}

/// Compute [`TravelTimeMatrix`] rows for every source in `key_set`, each row
/// covering travel time to every other member of `key_set` (spec §4.5).
///
/// With the `parallel` feature enabled, one Dijkstra runs per source on
/// rayon's thread pool; each worker writes only its own row, so no
/// synchronization is needed beyond collecting the per-source results (spec
/// §5's "exclusive per source id" contract).
pub fn travel_time_matrix(
    map: &MapIndex,
    key_set: &[IntersectionId],
    turn_penalty_s: f64,
) -> TravelTimeMatrix {
    log::debug!(
        "travel_time_matrix: {} key intersections, turn_penalty={}",
        key_set.len(),
        turn_penalty_s
    );

    #[cfg(feature = "parallel")]
    let rows: HashMap<IntersectionId, Vec<f64>> = {
        use rayon::prelude::*;
        key_set
            .par_iter()
            .map(|&src| (src, multi_target_dijkstra(map, src, key_set, turn_penalty_s)))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let rows: HashMap<IntersectionId, Vec<f64>> = key_set
        .iter()
        .map(|&src| (src, multi_target_dijkstra(map, src, key_set, turn_penalty_s)))
        .collect();

    TravelTimeMatrix { rows }
}

/// One Dijkstra run from `src`, terminating as soon as every member of
/// `key_set` has been settled (spec §4.5's early-termination contract).
///
/// Returns a dense `Vec<f64>` indexed by intersection id; unsettled entries
/// remain `+inf`.
fn multi_target_dijkstra(
    map: &MapIndex,
    src: IntersectionId,
    key_set: &[IntersectionId],
    turn_penalty_s: f64,
) -> Vec<f64> {
    let n = map.intersection_count();
    let mut g = vec![f64::INFINITY; n];
    let mut parent_street: Vec<Option<streetmap_core::StreetId>> = vec![None; n];
    let mut settled = vec![false; n];

    let mut remaining = key_set.len();
    // `src` itself may or may not be a member of the key set; either way its
    // distance to itself is trivially 0 and counts as settled up front.
    if key_set.contains(&src) {
        remaining -= 1;
    }

    g[src.index()] = 0.0;
    let mut heap: BinaryHeap<Reverse<(OrderedF64, IntersectionId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedF64(0.0), src)));

    while remaining > 0 {
        let Some(Reverse((OrderedF64(cost), node))) = heap.pop() else {
            break;
        };
        if cost > g[node.index()] {
            continue; // stale entry
        }
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;
        if key_set.contains(&node) && node != src {
            remaining -= 1;
        }

        for &seg_id in map.segments_of_intersection(node) {
            let seg = map.segment_raw(seg_id);
            let next = if seg.from == node {
                seg.to
            } else if seg.to == node && !seg.one_way {
                seg.from
            } else {
                continue;
            };

            let turn = match parent_street[node.index()] {
                Some(prev_street) if prev_street != seg.street_id => turn_penalty_s,
                _ => 0.0,
            };
            let tentative_g = cost + map.street_segment_travel_time(seg_id) + turn;

            if tentative_g < g[next.index()] {
                g[next.index()] = tentative_g;
                parent_street[next.index()] = Some(seg.street_id);
                heap.push(Reverse((OrderedF64(tentative_g), next)));
            }
        }
    }

    g
}

/// `f64` wrapper implementing a total order for the min-heap. NaN never
/// occurs here (all costs are sums of finite travel times and penalties).
#[derive(Copy, Clone, PartialEq)]
struct OrderedF64(f64);

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}
