//! Randomized 2-opt-style local search over a constructed courier plan.
//!
//! [`perturb_once`] partitions the delivery portion of the tour into three
//! subpaths, reverses the shortest one, re-resolves every touched hop
//! through A*, rebuilds the two bridges connecting the three pieces, and
//! reverts to the original tour if any re-resolution fails or the final
//! connectivity sanity check doesn't hold.
//!
//! A single unconditional move isn't enough on its own: [`improve`] wraps it
//! in an evaluate-and-keep-the-better loop bounded by a time budget, so
//! `CourierPlanner::plan` always calls `improve` while [`perturb_once`]
//! stays separately testable as one raw move.

use streetmap_core::PlannerRng;
use streetmap_map::{find_path, MapIndex};

use crate::deadline::Deadline;
use crate::delivery::{CourierSubPath, Delivery};
use crate::planner::{calculate_path_cost, legal_path_check};

/// Minimum number of delivery hops (excluding the two depot legs) required
/// before a perturbation is attempted.
const MIN_DELIVERY_HOPS: usize = 5;

/// One randomized perturbation attempt. Returns a plan identical to `plan`
/// (by value) if the tour is too small to perturb, a re-resolved hop fails
/// to find a path, or the final connectivity sanity check fails — in every
/// such case this is a no-op.
pub fn perturb_once(
    map: &MapIndex,
    turn_penalty_s: f64,
    plan: &[CourierSubPath],
    rng: &mut PlannerRng,
) -> Vec<CourierSubPath> {
    let original = || plan.to_vec();

    if plan.len() < 2 {
        return original();
    }
    let delivery_hops = &plan[1..plan.len() - 1];
    let n = delivery_hops.len();
    if n < MIN_DELIVERY_HOPS {
        return original();
    }

    // Two partition indices splitting `delivery_hops` into three non-empty
    // runs: `max_start` guarantees at least 2 hops remain after partition1,
    // so partition2 always has room to land strictly between partition1 and
    // n.
    let max_start = n - 3;
    let partition1 = 1 + rng.gen_index(max_start);
    let partition2 = partition1 + 1 + rng.gen_index(n - partition1 - 1);

    let mut subpath1 = delivery_hops[..partition1].to_vec();
    let mut subpath2 = delivery_hops[partition1..partition2].to_vec();
    let mut subpath3 = delivery_hops[partition2..].to_vec();

    // Reverse the shortest of the three, re-resolving each of its hops.
    let sizes = [subpath1.len(), subpath2.len(), subpath3.len()];
    let smallest = *sizes.iter().min().unwrap();
    let target = if subpath1.len() == smallest {
        &mut subpath1
    } else if subpath2.len() == smallest {
        &mut subpath2
    } else {
        &mut subpath3
    };
    if reverse_and_resolve(map, turn_penalty_s, target).is_none() {
        return original();
    }

    // Rebuild the two bridges connecting the (possibly reversed) three runs.
    let bridge1_from = subpath1.last().unwrap().to;
    let bridge1_to = subpath2.first().unwrap().from;
    let Some(bridge1) = resolve_hop(map, turn_penalty_s, bridge1_from, bridge1_to) else {
        return original();
    };

    let bridge2_from = subpath2.last().unwrap().to;
    let bridge2_to = subpath3.first().unwrap().from;
    let Some(bridge2) = resolve_hop(map, turn_penalty_s, bridge2_from, bridge2_to) else {
        return original();
    };

    let mut rebuilt = Vec::with_capacity(plan.len() + 2);
    rebuilt.push(plan[0].clone());
    rebuilt.append(&mut subpath1);
    rebuilt.push(bridge1);
    rebuilt.append(&mut subpath2);
    rebuilt.push(bridge2);
    rebuilt.append(&mut subpath3);
    rebuilt.push(plan[plan.len() - 1].clone());

    // Final sanity check: every adjacent pair of hops must still connect.
    // This is what actually catches the case where the reversed run abuts
    // a depot leg whose endpoint we never patched.
    if rebuilt.windows(2).any(|w| w[0].to != w[1].from) {
        return original();
    }

    rebuilt
}

/// Iterated, accept-if-better wrapper around [`perturb_once`], bounded by
/// `deadline`. Keeps the best tour seen; returns the input unchanged if the
/// tour is too small to perturb at all.
///
/// A candidate is only accepted if it is both cheaper *and* still passes
/// [`legal_path_check`] — reversing a subpath reorders visitation order and
/// can turn a legal tour into one where a dropoff precedes its pickup.
/// Courier-feasibility binds the planner's final output, not just the
/// greedy construction stage, so local search must not be the one place
/// that regresses it.
pub fn improve(
    map: &MapIndex,
    turn_penalty_s: f64,
    deliveries: &[Delivery],
    plan: Vec<CourierSubPath>,
    deadline: &Deadline,
    rng: &mut PlannerRng,
) -> Vec<CourierSubPath> {
    if plan.len() < 2 || plan[1..plan.len() - 1].len() < MIN_DELIVERY_HOPS {
        return plan;
    }

    let mut best = plan;
    let mut best_cost = calculate_path_cost(map, turn_penalty_s, &best);

    while !deadline.expired() {
        let candidate = perturb_once(map, turn_penalty_s, &best, rng);
        let candidate_cost = calculate_path_cost(map, turn_penalty_s, &candidate);
        if candidate_cost < best_cost && legal_path_check(deliveries, &candidate) {
            log::debug!("local_search: improved tour cost {best_cost} -> {candidate_cost}");
            best = candidate;
            best_cost = candidate_cost;
        }
    }

    best
}

/// Reverse `sub`'s hop order, swap each hop's `(from, to)`, and re-resolve
/// its segment path through A*. `None` if any re-resolution fails.
fn reverse_and_resolve(map: &MapIndex, turn_penalty_s: f64, sub: &mut Vec<CourierSubPath>) -> Option<()> {
    sub.reverse();
    for hop in sub.iter_mut() {
        let segments = find_path(map, turn_penalty_s, hop.to, hop.from);
        if segments.is_empty() {
            return None;
        }
        let new_from = hop.to;
        let new_to = hop.from;
        hop.from = new_from;
        hop.to = new_to;
        hop.segments = segments;
    }
    Some(())
}

fn resolve_hop(
    map: &MapIndex,
    turn_penalty_s: f64,
    from: streetmap_core::IntersectionId,
    to: streetmap_core::IntersectionId,
) -> Option<CourierSubPath> {
    let segments = find_path(map, turn_penalty_s, from, to);
    if segments.is_empty() {
        return None;
    }
    Some(CourierSubPath { from, to, segments })
}
