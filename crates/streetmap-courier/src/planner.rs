//! Feasibility-aware greedy courier tour construction.
//!
//! `DeliveryTable` is per-request state built and torn down inside `plan` —
//! never a module-level global — so a `CourierPlanner` carries no state of
//! its own between calls.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use streetmap_core::{DeliveryId, IntersectionId, PlannerRng};
use streetmap_map::{compute_path_travel_time, find_path, MapIndex};
use streetmap_map::matrix::{travel_time_matrix, TravelTimeMatrix};

use crate::deadline::Deadline;
use crate::delivery::{CourierSubPath, Delivery, DeliveryRole, DeliveryTable};
use crate::error::CourierError;
use crate::local_search;

/// Entry point for the courier tour planner.
///
/// Stateless: every call builds and tears down its own `DeliveryTable` and
/// `TravelTimeMatrix`, released when `plan` returns.
pub struct CourierPlanner;

impl CourierPlanner {
    /// Plan with the default 50-second deadline and an entropy-seeded RNG.
    pub fn plan(
        map: &MapIndex,
        turn_penalty_s: f64,
        deliveries: &[Delivery],
        depots: &[IntersectionId],
    ) -> Vec<CourierSubPath> {
        Self::plan_with_deadline(
            map,
            turn_penalty_s,
            deliveries,
            depots,
            Deadline::default(),
            &mut PlannerRng::from_entropy(),
        )
    }

    /// Plan with caller-supplied deadline and RNG (tests inject both for
    /// determinism and to keep unit tests fast).
    pub fn plan_with_deadline(
        map: &MapIndex,
        turn_penalty_s: f64,
        deliveries: &[Delivery],
        depots: &[IntersectionId],
        deadline: Deadline,
        rng: &mut PlannerRng,
    ) -> Vec<CourierSubPath> {
        log::debug!(
            "plan: {} deliveries, {} depots, turn_penalty={turn_penalty_s}",
            deliveries.len(),
            depots.len(),
        );

        if let Err(e) = validate_request(deliveries, depots) {
            log::debug!("plan: invalid request ({e}), returning empty plan");
            return Vec::new();
        }

        let table = DeliveryTable::build(deliveries);
        let key_set = build_key_set(deliveries, depots);
        let matrix = travel_time_matrix(map, &key_set, turn_penalty_s);

        let Some(plan) = greedy_construct(map, turn_penalty_s, deliveries, depots, &table, &matrix, &deadline)
        else {
            log::debug!("plan: greedy construction failed, returning empty plan");
            return Vec::new();
        };

        if !legal_path_check(deliveries, &plan) {
            // Greedy construction enforces legality by build, so reaching
            // this means a bug upstream rather than an infeasible instance
            // — fail closed rather than return an illegal plan.
            log::debug!("plan: constructed plan failed legality check");
            return Vec::new();
        }

        local_search::improve(map, turn_penalty_s, deliveries, plan, &deadline, rng)
    }
}

fn validate_request(deliveries: &[Delivery], depots: &[IntersectionId]) -> Result<(), CourierError> {
    if depots.is_empty() {
        return Err(CourierError::NoDepots);
    }
    if deliveries.is_empty() {
        return Err(CourierError::NoDeliveries);
    }
    Ok(())
}

/// Unique union of every pickup, dropoff, and depot intersection.
fn build_key_set(deliveries: &[Delivery], depots: &[IntersectionId]) -> Vec<IntersectionId> {
    let mut seen = HashSet::new();
    let mut key_set = Vec::new();
    for d in deliveries {
        if seen.insert(d.pick_up) {
            key_set.push(d.pick_up);
        }
        if seen.insert(d.drop_off) {
            key_set.push(d.drop_off);
        }
    }
    for &depot in depots {
        if seen.insert(depot) {
            key_set.push(depot);
        }
    }
    key_set
}

/// `true` if at least one of `loc`'s role entries can legally be acted on
/// right now: an unpicked pickup is always legal; a dropoff is legal once
/// its delivery has been picked up and not yet dropped off.
fn has_legal_role(
    loc: IntersectionId,
    table: &DeliveryTable,
    picked_up: &HashSet<DeliveryId>,
    dropped_off: &HashSet<DeliveryId>,
) -> bool {
    table.roles_at(loc).iter().any(|&(d, role)| match role {
        DeliveryRole::PickUp => !picked_up.contains(&d),
        DeliveryRole::DropOff => picked_up.contains(&d) && !dropped_off.contains(&d),
    })
}

/// Apply every actionable role entry at `loc`: mark pickups picked up,
/// discharge dropoffs whose pickup is already done. Returns the number of
/// deliveries newly completed by this visit.
fn apply_roles(
    loc: IntersectionId,
    table: &DeliveryTable,
    picked_up: &mut HashSet<DeliveryId>,
    dropped_off: &mut HashSet<DeliveryId>,
) -> usize {
    let mut newly_completed = 0;
    for &(d, role) in table.roles_at(loc) {
        match role {
            DeliveryRole::PickUp => {
                picked_up.insert(d);
            }
            DeliveryRole::DropOff => {
                if picked_up.contains(&d) && dropped_off.insert(d) {
                    newly_completed += 1;
                }
            }
        }
    }
    newly_completed
}

/// `true` once every role entry at `loc` has been resolved (all its pickups
/// picked up, all its dropoffs dropped off) — the point at which `loc` can
/// leave the set of still-relevant candidates.
fn is_exhausted(
    loc: IntersectionId,
    table: &DeliveryTable,
    picked_up: &HashSet<DeliveryId>,
    dropped_off: &HashSet<DeliveryId>,
) -> bool {
    table.roles_at(loc).iter().all(|&(d, role)| match role {
        DeliveryRole::PickUp => picked_up.contains(&d),
        DeliveryRole::DropOff => dropped_off.contains(&d),
    })
}

/// `f64` wrapper implementing a total order for the candidate min-heap
/// below. NaN never occurs: every value is a matrix lookup that is either a
/// finite travel time or `+inf`, both totally ordered.
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

/// The greedy construction proper. Returns `None` on
/// any infeasibility: no reachable starting pickup, a stuck step with no
/// legal candidate, the max-iteration guard tripping, or the deadline
/// expiring mid-construction.
fn greedy_construct(
    map: &MapIndex,
    turn_penalty_s: f64,
    deliveries: &[Delivery],
    depots: &[IntersectionId],
    table: &DeliveryTable,
    matrix: &TravelTimeMatrix,
    deadline: &Deadline,
) -> Option<Vec<CourierSubPath>> {
    // Step 1: starting depot/first-pickup pair minimizing T[depot][pickup].
    let mut start_depot = None;
    let mut start_pickup = None;
    let mut best = f64::INFINITY;
    for &depot in depots {
        for d in deliveries {
            let t = matrix.get(depot, d.pick_up);
            if t < best {
                best = t;
                start_depot = Some(depot);
                start_pickup = Some(d.pick_up);
            }
        }
    }
    let (start_depot, start_pickup) = (start_depot?, start_pickup?);
    if !best.is_finite() {
        return None;
    }

    let mut hops = Vec::new();
    if start_depot != start_pickup {
        let initial = find_path(map, turn_penalty_s, start_depot, start_pickup);
        if initial.is_empty() {
            return None;
        }
        hops.push(CourierSubPath { from: start_depot, to: start_pickup, segments: initial });
    }

    let mut picked_up: HashSet<DeliveryId> = HashSet::new();
    let mut dropped_off: HashSet<DeliveryId> = HashSet::new();
    apply_roles(start_pickup, table, &mut picked_up, &mut dropped_off);

    let mut active: HashSet<IntersectionId> = HashSet::new();
    for d in deliveries {
        active.insert(d.pick_up);
        active.insert(d.drop_off);
    }
    if is_exhausted(start_pickup, table, &picked_up, &dropped_off) {
        active.remove(&start_pickup);
    }

    let total = deliveries.len();
    let max_iterations = 10 * total;
    let mut current = start_pickup;
    let mut iterations = 0;

    while dropped_off.len() < total {
        iterations += 1;
        if iterations > max_iterations {
            return None;
        }
        if deadline.expired() {
            return None;
        }

        let mut heap: BinaryHeap<Reverse<(OrderedF64, IntersectionId)>> = BinaryHeap::new();
        for &k in &active {
            if k == current {
                continue;
            }
            let t = matrix.get(current, k);
            if t.is_finite() {
                heap.push(Reverse((OrderedF64(t), k)));
            }
        }

        let mut next = None;
        while let Some(Reverse((_, candidate))) = heap.pop() {
            if has_legal_role(candidate, table, &picked_up, &dropped_off) {
                next = Some(candidate);
                break;
            }
        }
        let Some(next) = next else {
            return None;
        };

        let segment_path = find_path(map, turn_penalty_s, current, next);
        if segment_path.is_empty() {
            return None;
        }
        hops.push(CourierSubPath { from: current, to: next, segments: segment_path });

        apply_roles(next, table, &mut picked_up, &mut dropped_off);
        if is_exhausted(next, table, &picked_up, &dropped_off) {
            active.remove(&next);
        }
        current = next;
    }

    // End leg: nearest depot from the final delivery stop.
    let mut end_depot = None;
    let mut best_end = f64::INFINITY;
    for &depot in depots {
        let t = matrix.get(current, depot);
        if t < best_end {
            best_end = t;
            end_depot = Some(depot);
        }
    }
    let end_depot = end_depot?;
    if !best_end.is_finite() {
        return None;
    }

    if current != end_depot {
        let final_path = find_path(map, turn_penalty_s, current, end_depot);
        if final_path.is_empty() {
            return None;
        }
        hops.push(CourierSubPath { from: current, to: end_depot, segments: final_path });
    }

    Some(hops)
}

/// Total plan cost: sum of the travel time over every hop.
pub fn calculate_path_cost(map: &MapIndex, turn_penalty_s: f64, plan: &[CourierSubPath]) -> f64 {
    plan.iter()
        .map(|hop| compute_path_travel_time(map, turn_penalty_s, &hop.segments))
        .sum()
}

/// Simulates the plan left to right: every dropoff whose pickup has already
/// happened gets discharged, every other role entry just updates pickup
/// state. Legal iff every delivery ends up discharged by the final stop —
/// correctly handling repeat visits to a shared dropoff location.
pub fn legal_path_check(deliveries: &[Delivery], plan: &[CourierSubPath]) -> bool {
    if plan.is_empty() {
        return deliveries.is_empty();
    }

    let table = DeliveryTable::build(deliveries);
    let mut picked_up: HashSet<DeliveryId> = HashSet::new();
    let mut dropped_off: HashSet<DeliveryId> = HashSet::new();

    // `stops[0]` is the starting depot; simulation starts after it.
    let mut stops = Vec::with_capacity(plan.len() + 1);
    stops.push(plan[0].from);
    stops.extend(plan.iter().map(|hop| hop.to));

    // A dropoff entry seen before its matching pickup isn't an immediate
    // failure — a shared dropoff intersection can be visited more than once,
    // and an earlier visit may simply be too early for *this* delivery while
    // still legally discharging another one located there.
    // The entry is left pending and re-examined on the next visit to the
    // same location; only failing to ever discharge every delivery by the
    // end of the walk makes the plan illegal.
    for &loc in &stops[1..] {
        for &(d, role) in table.roles_at(loc) {
            match role {
                DeliveryRole::PickUp => {
                    picked_up.insert(d);
                }
                DeliveryRole::DropOff => {
                    if picked_up.contains(&d) {
                        dropped_off.insert(d);
                    }
                }
            }
        }
    }

    dropped_off.len() == deliveries.len()
}
