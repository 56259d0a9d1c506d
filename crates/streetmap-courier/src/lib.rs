//! `streetmap-courier` — pickup-and-delivery courier tour planner.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-------------------------------------------------------------------|
//! | [`delivery`]   | `Delivery`, `CourierSubPath`, `DeliveryRole`, `DeliveryTable`      |
//! | [`deadline`]   | `Deadline` — the planner's wall-clock budget                      |
//! | [`planner`]    | `CourierPlanner::plan`, `calculate_path_cost`, `legal_path_check`  |
//! | [`local_search`] | `perturb_once` (raw 2-opt-style move), `improve` (iterated wrapper) |
//! | [`error`]      | `CourierError`, `CourierResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                          |
//! |------------|---------------------------------------------------------------------|
//! | `parallel` | Forwarded to `streetmap-map`: parallelizes the travel-time matrix step. |
//! | `serde`    | Propagates serde derives (forwarded to `streetmap-core/serde` and `streetmap-map/serde`). |

pub mod deadline;
pub mod delivery;
pub mod error;
pub mod local_search;
pub mod planner;

#[cfg(test)]
mod tests;

pub use deadline::Deadline;
pub use delivery::{CourierSubPath, Delivery, DeliveryRole, DeliveryTable};
pub use error::{CourierError, CourierResult};
pub use planner::{calculate_path_cost, legal_path_check, CourierPlanner};
