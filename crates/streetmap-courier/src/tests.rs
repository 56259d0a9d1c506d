//! Unit tests for `streetmap-courier`.
//!
//! Hand-built small networks, no OSM file, mirroring
//! `streetmap-map::tests`'s fixture style.

#[cfg(test)]
mod helpers {
    use streetmap_core::{GeoPoint, IntersectionId};
    use streetmap_map::{MapIndex, MapIndexBuilder};

    /// A bidirectional line of `n` intersections along one street, constant
    /// 10 m/s speed limit. The only route between any two nodes is the
    /// direct line route, so travel time grows monotonically with distance
    /// along the line — handy for greedy-construction tests where the
    /// expected visiting order is unambiguous.
    pub fn line_map(n: usize) -> (MapIndex, Vec<IntersectionId>) {
        let mut b = MapIndexBuilder::new();
        let nodes: Vec<IntersectionId> = (0..n)
            .map(|i| b.add_intersection(GeoPoint::new(0.0, i as f64 * 0.001), format!("N{i}")))
            .collect();
        let street = b.add_street("Line Street");
        for w in nodes.windows(2) {
            b.add_segment(w[0], w[1], street, false, 10.0, vec![]);
        }
        (b.build(), nodes)
    }

    /// A hub-and-spoke network: `nodes[0]` is the hub, `nodes[1..=k]` are
    /// spokes connected directly to the hub (bidirectional, constant
    /// speed). Any two distinct spokes are exactly two hops apart via the
    /// hub, so several deliveries can share a location without one
    /// necessarily shadowing another on the line topology above.
    pub fn star_map(k: usize) -> (MapIndex, Vec<IntersectionId>) {
        let mut b = MapIndexBuilder::new();
        let hub = b.add_intersection(GeoPoint::new(0.0, 0.0), "Hub");
        let mut nodes = vec![hub];
        let street = b.add_street("Spoke Street");
        for i in 1..=k {
            let spoke = b.add_intersection(GeoPoint::new(i as f64 * 0.001, i as f64 * 0.001), format!("Spoke{i}"));
            b.add_segment(hub, spoke, street, false, 10.0, vec![]);
            nodes.push(spoke);
        }
        (b.build(), nodes)
    }
}

// ── Delivery role table ─────────────────────────────────────────────────

#[cfg(test)]
mod delivery_table {
    use streetmap_core::IntersectionId;

    use crate::delivery::{Delivery, DeliveryRole, DeliveryTable};

    #[test]
    fn shared_intersection_holds_all_entries() {
        let deliveries = [
            Delivery::new(IntersectionId(1), IntersectionId(9)),
            Delivery::new(IntersectionId(2), IntersectionId(9)),
        ];
        let table = DeliveryTable::build(&deliveries);
        let roles = table.roles_at(IntersectionId(9));
        assert_eq!(roles.len(), 2);
        assert!(roles.iter().all(|&(_, role)| role == DeliveryRole::DropOff));
    }

    #[test]
    fn unvisited_intersection_has_no_roles() {
        let deliveries = [Delivery::new(IntersectionId(1), IntersectionId(2))];
        let table = DeliveryTable::build(&deliveries);
        assert!(table.roles_at(IntersectionId(99)).is_empty());
    }
}

// ── Greedy construction ─────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use std::time::Duration;

    use streetmap_core::PlannerRng;

    use crate::deadline::Deadline;
    use crate::delivery::Delivery;
    use crate::planner::{legal_path_check, CourierPlanner};

    fn generous_deadline() -> Deadline {
        Deadline::new(Duration::from_secs(5))
    }

    #[test]
    fn toy_single_delivery_is_exactly_three_hops() {
        // One depot D, one delivery (P, Q): the tour must be exactly D->P->Q->D.
        let (map, nodes) = super::helpers::line_map(3);
        let (depot, p, q) = (nodes[0], nodes[1], nodes[2]);
        let delivery = Delivery::new(p, q);

        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &[delivery],
            &[depot],
            generous_deadline(),
            &mut PlannerRng::new(1),
        );

        assert_eq!(plan.len(), 3);
        assert_eq!((plan[0].from, plan[0].to), (depot, p));
        assert_eq!((plan[1].from, plan[1].to), (p, q));
        assert_eq!((plan[2].from, plan[2].to), (q, depot));
        assert!(legal_path_check(&[delivery], &plan));
    }

    #[test]
    fn shared_dropoff_across_two_deliveries_is_legal() {
        // Two deliveries sharing one dropoff: (P1, Q) and (P2, Q).
        let (map, nodes) = super::helpers::star_map(4);
        let (depot, p1, p2, q) = (nodes[1], nodes[2], nodes[3], nodes[4]);
        let deliveries = [Delivery::new(p1, q), Delivery::new(p2, q)];

        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &deliveries,
            &[depot],
            generous_deadline(),
            &mut PlannerRng::new(7),
        );

        assert!(!plan.is_empty(), "expected a feasible plan");
        assert_eq!(plan.first().unwrap().from, depot);
        assert_eq!(plan.last().unwrap().to, depot);
        assert!(legal_path_check(&deliveries, &plan));

        // Both pickups and the shared dropoff must appear among the stops.
        let mut stops = vec![plan[0].from];
        stops.extend(plan.iter().map(|hop| hop.to));
        assert!(stops.contains(&p1));
        assert!(stops.contains(&p2));
        assert!(stops.contains(&q));
    }

    #[test]
    fn no_depots_returns_empty_plan() {
        let (map, nodes) = super::helpers::line_map(3);
        let delivery = Delivery::new(nodes[1], nodes[2]);
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &[delivery],
            &[],
            generous_deadline(),
            &mut PlannerRng::new(1),
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn no_deliveries_returns_empty_plan() {
        let (map, nodes) = super::helpers::line_map(3);
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &[],
            &[nodes[0]],
            generous_deadline(),
            &mut PlannerRng::new(1),
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn unreachable_pickup_returns_empty_plan() {
        let mut b = streetmap_map::MapIndexBuilder::new();
        let depot = b.add_intersection(streetmap_core::GeoPoint::new(0.0, 0.0), "Depot");
        let island_pickup = b.add_intersection(streetmap_core::GeoPoint::new(9.0, 9.0), "Island P");
        let island_dropoff = b.add_intersection(streetmap_core::GeoPoint::new(9.0, 9.1), "Island Q");
        let map = b.build();

        let delivery = Delivery::new(island_pickup, island_dropoff);
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &[delivery],
            &[depot],
            generous_deadline(),
            &mut PlannerRng::new(1),
        );
        assert!(plan.is_empty());
    }

    #[test]
    fn expired_deadline_fails_construction_closed() {
        let (map, nodes) = super::helpers::line_map(3);
        let delivery = Delivery::new(nodes[1], nodes[2]);
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &[delivery],
            &[nodes[0]],
            Deadline::new(Duration::from_secs(0)),
            &mut PlannerRng::new(1),
        );
        assert!(plan.is_empty());
    }
}

// ── Cost and legality ───────────────────────────────────────────────────

#[cfg(test)]
mod cost_and_legality {
    use crate::delivery::{CourierSubPath, Delivery};
    use crate::planner::{calculate_path_cost, legal_path_check};

    #[test]
    fn cost_matches_sum_of_hop_travel_times() {
        let (map, nodes) = super::helpers::line_map(4);
        let delivery = Delivery::new(nodes[0], nodes[3]);
        let segments = streetmap_map::find_path(&map, 5.0, nodes[0], nodes[3]);
        assert!(!segments.is_empty());
        let hop = CourierSubPath { from: nodes[0], to: nodes[3], segments };
        let expected = streetmap_map::compute_path_travel_time(&map, 5.0, &hop.segments);
        let cost = calculate_path_cost(&map, 5.0, std::slice::from_ref(&hop));
        assert!((cost - expected).abs() < 1e-9);
        let _ = delivery;
    }

    #[test]
    fn dropoff_before_pickup_fails_legality() {
        let deliveries = [Delivery::new(streetmap_core::IntersectionId(1), streetmap_core::IntersectionId(2))];
        // A hand-built plan that visits the dropoff (2) before the pickup (1).
        let plan = vec![
            CourierSubPath { from: streetmap_core::IntersectionId(0), to: streetmap_core::IntersectionId(2), segments: vec![] },
            CourierSubPath { from: streetmap_core::IntersectionId(2), to: streetmap_core::IntersectionId(1), segments: vec![] },
            CourierSubPath { from: streetmap_core::IntersectionId(1), to: streetmap_core::IntersectionId(0), segments: vec![] },
        ];
        assert!(!legal_path_check(&deliveries, &plan));
    }

    #[test]
    fn pickup_then_dropoff_passes_legality() {
        let deliveries = [Delivery::new(streetmap_core::IntersectionId(1), streetmap_core::IntersectionId(2))];
        let plan = vec![
            CourierSubPath { from: streetmap_core::IntersectionId(0), to: streetmap_core::IntersectionId(1), segments: vec![] },
            CourierSubPath { from: streetmap_core::IntersectionId(1), to: streetmap_core::IntersectionId(2), segments: vec![] },
            CourierSubPath { from: streetmap_core::IntersectionId(2), to: streetmap_core::IntersectionId(0), segments: vec![] },
        ];
        assert!(legal_path_check(&deliveries, &plan));
    }

    #[test]
    fn early_visit_to_a_not_yet_ready_shared_dropoff_is_not_an_immediate_failure() {
        // Two deliveries sharing a dropoff at intersection 9: (1 -> 9) and
        // (5 -> 9). The plan reaches 9 once before delivery two's pickup (5)
        // has happened, then again afterwards. The first visit to 9 only
        // discharges delivery one; delivery two's dropoff entry there is
        // left pending rather than failing the whole plan.
        let deliveries = [
            Delivery::new(streetmap_core::IntersectionId(1), streetmap_core::IntersectionId(9)),
            Delivery::new(streetmap_core::IntersectionId(5), streetmap_core::IntersectionId(9)),
        ];
        let stops = [
            streetmap_core::IntersectionId(0),
            streetmap_core::IntersectionId(1),
            streetmap_core::IntersectionId(9),
            streetmap_core::IntersectionId(5),
            streetmap_core::IntersectionId(9),
            streetmap_core::IntersectionId(0),
        ];
        let plan: Vec<CourierSubPath> = stops
            .windows(2)
            .map(|w| CourierSubPath { from: w[0], to: w[1], segments: vec![] })
            .collect();
        assert!(legal_path_check(&deliveries, &plan));
    }
}

// ── Randomized local search ─────────────────────────────────────────────

#[cfg(test)]
mod local_search {
    use std::time::Duration;

    use streetmap_core::PlannerRng;

    use crate::deadline::Deadline;
    use crate::delivery::Delivery;
    use crate::local_search::{improve, perturb_once};
    use crate::planner::{legal_path_check, CourierPlanner};

    /// A chain of 4 deliveries on a line map long enough to clear the
    /// minimum 5-delivery-hop threshold for perturbation.
    fn chained_plan() -> (streetmap_map::MapIndex, Vec<Delivery>, streetmap_core::IntersectionId) {
        let (map, nodes) = super::helpers::line_map(9);
        let depot = nodes[0];
        let deliveries = vec![
            Delivery::new(nodes[1], nodes[2]),
            Delivery::new(nodes[3], nodes[4]),
            Delivery::new(nodes[5], nodes[6]),
            Delivery::new(nodes[7], nodes[8]),
        ];
        (map, deliveries, depot)
    }

    #[test]
    fn too_small_tour_is_unchanged_by_perturb_once() {
        let (map, nodes) = super::helpers::line_map(3);
        let depot = nodes[0];
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &[Delivery::new(nodes[1], nodes[2])],
            &[depot],
            Deadline::new(Duration::from_secs(5)),
            &mut PlannerRng::new(3),
        );
        assert_eq!(plan.len(), 3);
        let perturbed = perturb_once(&map, 0.0, &plan, &mut PlannerRng::new(42));
        assert_eq!(perturbed, plan);
    }

    #[test]
    fn perturb_once_preserves_depot_endpoints_and_connectivity() {
        let (map, deliveries, depot) = chained_plan();
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &deliveries,
            &[depot],
            Deadline::new(Duration::from_secs(5)),
            &mut PlannerRng::new(11),
        );
        assert!(plan[1..plan.len() - 1].len() >= 5, "fixture must clear the perturbation threshold");

        for seed in 0..20u64 {
            let perturbed = perturb_once(&map, 0.0, &plan, &mut PlannerRng::new(seed));
            assert_eq!(perturbed.first().unwrap().from, depot);
            assert_eq!(perturbed.last().unwrap().to, depot);
            assert!(
                perturbed.windows(2).all(|w| w[0].to == w[1].from),
                "seed {seed}: broken connectivity in perturbed tour"
            );
        }
    }

    #[test]
    fn improve_never_returns_a_more_expensive_or_illegal_tour() {
        use crate::planner::calculate_path_cost;

        let (map, deliveries, depot) = chained_plan();
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &deliveries,
            &[depot],
            Deadline::new(Duration::from_secs(5)),
            &mut PlannerRng::new(11),
        );
        let original_cost = calculate_path_cost(&map, 0.0, &plan);

        let improved = improve(
            &map,
            0.0,
            &deliveries,
            plan,
            &Deadline::new(Duration::from_millis(25)),
            &mut PlannerRng::new(99),
        );

        let improved_cost = calculate_path_cost(&map, 0.0, &improved);
        assert!(improved_cost <= original_cost + 1e-9);
        assert!(legal_path_check(&deliveries, &improved));
    }

    #[test]
    fn perturb_once_is_deterministic_given_a_seed() {
        let (map, deliveries, depot) = chained_plan();
        let plan = CourierPlanner::plan_with_deadline(
            &map,
            0.0,
            &deliveries,
            &[depot],
            Deadline::new(Duration::from_secs(5)),
            &mut PlannerRng::new(11),
        );

        let a = perturb_once(&map, 0.0, &plan, &mut PlannerRng::new(123));
        let b = perturb_once(&map, 0.0, &plan, &mut PlannerRng::new(123));
        assert_eq!(a, b);
    }
}
