//! Delivery request types and the per-intersection delivery-role table.

use std::collections::HashMap;

use streetmap_core::{DeliveryId, IntersectionId, SegmentId};

/// One pickup-and-delivery request: goods picked up at `pick_up`, carried to
/// `drop_off`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub pick_up: IntersectionId,
    pub drop_off: IntersectionId,
}

impl Delivery {
    pub fn new(pick_up: IntersectionId, drop_off: IntersectionId) -> Self {
        Self { pick_up, drop_off }
    }
}

/// One leg of a courier plan: travel from `from` to `to`, realized by the
/// ordered `segments`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourierSubPath {
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub segments: Vec<SegmentId>,
}

/// Which half of a delivery an intersection visit discharges.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeliveryRole {
    PickUp,
    DropOff,
}

/// Per-intersection list of `(delivery, role)` obligations.
///
/// A single intersection may hold several entries — the pickup for one
/// delivery and the dropoff for another, or several deliveries sharing the
/// same dropoff. Every query against this table iterates the full entry
/// list for an intersection rather than assuming one role per location.
pub struct DeliveryTable {
    roles: HashMap<IntersectionId, Vec<(DeliveryId, DeliveryRole)>>,
}

const NO_ROLES: &[(DeliveryId, DeliveryRole)] = &[];

impl DeliveryTable {
    pub fn build(deliveries: &[Delivery]) -> Self {
        let mut roles: HashMap<IntersectionId, Vec<(DeliveryId, DeliveryRole)>> = HashMap::new();
        for (i, d) in deliveries.iter().enumerate() {
            let id = DeliveryId(i as u32);
            roles.entry(d.pick_up).or_default().push((id, DeliveryRole::PickUp));
            roles.entry(d.drop_off).or_default().push((id, DeliveryRole::DropOff));
        }
        Self { roles }
    }

    /// Every `(delivery, role)` obligation located at `i`, in insertion order.
    pub fn roles_at(&self, i: IntersectionId) -> &[(DeliveryId, DeliveryRole)] {
        self.roles.get(&i).map(Vec::as_slice).unwrap_or(NO_ROLES)
    }
}
