//! `streetmap-core` — foundational types for the streetmap routing engine.
//!
//! This crate is a dependency of every other crate in the workspace. It
//! intentionally has no workspace-internal dependencies and minimal external
//! ones (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                    |
//! |-----------|--------------------------------------------------------------|
//! | [`ids`]   | `IntersectionId`, `SegmentId`, `StreetId`, `FeatureId`, `PoiId`, `DeliveryId`, `OsmNodeId`, `OsmWayId` |
//! | [`geo`]   | `GeoPoint`, equirectangular-projected distance and feature area |
//! | [`rng`]   | `PlannerRng` — seedable RNG for the courier local search     |
//! | [`error`] | `CoreError`, `CoreResult`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{DeliveryId, FeatureId, IntersectionId, OsmNodeId, OsmWayId, PoiId, SegmentId, StreetId};
pub use rng::PlannerRng;
