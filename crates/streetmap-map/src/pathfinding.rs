//! A* routing core with turn penalties (spec §4.4).
//!
//! Grounded on `dt-spatial::router::dijkstra`: `BinaryHeap` of ordered
//! entries, a stale-entry guard on pop, and a `parent_seg` array walked
//! backward to reconstruct the path. Generalized by adding the straight-line
//! heuristic and the turn-identity penalty from `original_source/m3.cpp`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use streetmap_core::{IntersectionId, SegmentId};

use crate::index::MapIndex;

/// One entry in the A* open set, ordered so that `BinaryHeap` (a max-heap)
/// pops the entry with the smallest `f`, breaking ties FIFO by insertion
/// order (spec §4.4's tie-breaking note).
struct HeapEntry {
    f: f64,
    g: f64,
    seq: u64,
    node: IntersectionId,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .partial_cmp(&self.f)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Minimum-cost path of segment ids from `src` to `dst` under
/// `cost = Σ segTravelTime + turnPenalty·(#street-identity changes)`.
///
/// Empty if `src == dst` or `dst` is unreachable.
pub fn find_path(
    map: &MapIndex,
    turn_penalty_s: f64,
    src: IntersectionId,
    dst: IntersectionId,
) -> Vec<SegmentId> {
    log::debug!("find_path: {src} -> {dst}, turn_penalty={turn_penalty_s}");

    if src == dst {
        return Vec::new();
    }

    let n = map.intersection_count();
    let mut g = vec![f64::INFINITY; n];
    let mut parent_seg = vec![SegmentId::INVALID; n];

    let dst_pos = map.intersection_pos(dst);
    let heuristic = |node: IntersectionId| {
        map.intersection_pos(node).distance_m(dst_pos) / map.fastest_plausible_speed_mps()
    };

    g[src.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    heap.push(HeapEntry { f: heuristic(src), g: 0.0, seq, node: src });
    seq += 1;

    let mut relaxed = 0u64;
    while let Some(HeapEntry { g: entry_g, node, .. }) = heap.pop() {
        if node == dst {
            log::trace!("find_path: settled {relaxed} edges");
            return reconstruct(map, &parent_seg, src, dst);
        }
        if entry_g > g[node.index()] {
            continue; // stale entry
        }

        for &seg_id in map.segments_of_intersection(node) {
            let seg = map.segment_raw(seg_id);
            let next = if seg.from == node {
                seg.to
            } else if seg.to == node && !seg.one_way {
                seg.from
            } else {
                continue; // illegal direction against a one-way segment
            };

            let turn = match parent_seg[node.index()] {
                p if p == SegmentId::INVALID => 0.0,
                p if map.segment_raw(p).street_id != seg.street_id => turn_penalty_s,
                _ => 0.0,
            };
            let tentative_g = entry_g + map.street_segment_travel_time(seg_id) + turn;

            if tentative_g < g[next.index()] {
                g[next.index()] = tentative_g;
                parent_seg[next.index()] = seg_id;
                heap.push(HeapEntry { f: tentative_g + heuristic(next), g: tentative_g, seq, node: next });
                seq += 1;
                relaxed += 1;
            }
        }
    }

    log::trace!("find_path: no route, {relaxed} edges relaxed");
    Vec::new()
}

fn reconstruct(map: &MapIndex, parent_seg: &[SegmentId], src: IntersectionId, dst: IntersectionId) -> Vec<SegmentId> {
    let mut path = Vec::new();
    let mut cur = dst;
    while cur != src {
        let seg_id = parent_seg[cur.index()];
        if seg_id == SegmentId::INVALID {
            return Vec::new();
        }
        path.push(seg_id);
        let seg = map.segment_raw(seg_id);
        cur = if seg.to == cur { seg.from } else { seg.to };
    }
    path.reverse();
    path
}

/// Sum of segment travel times plus `turn_penalty_s` for every adjacent pair
/// of segments whose street id differs (spec §4.4's `computePathTravelTime`).
pub fn compute_path_travel_time(map: &MapIndex, turn_penalty_s: f64, path: &[SegmentId]) -> f64 {
    let mut total = 0.0;
    for (i, &seg_id) in path.iter().enumerate() {
        total += map.street_segment_travel_time(seg_id);
        if i > 0 {
            let prev_street = map.segment_raw(path[i - 1]).street_id;
            let cur_street = map.segment_raw(seg_id).street_id;
            if prev_street != cur_street {
                total += turn_penalty_s;
            }
        }
    }
    total
}
