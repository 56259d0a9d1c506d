//! `streetmap-map` — the map index, query layer, A* routing core, and
//! multi-target Dijkstra matrix step.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|------------------------------------------------------------|
//! | [`model`]     | Plain entity structs: `Intersection`, `StreetSegment`, `Street`, `OsmNode`, `OsmWay`, `Feature`, `Poi` |
//! | [`index`]     | `MapIndex`, `MapIndexBuilder` (`build`/`try_build`) — derived tables built once per map |
//! | [`query`]     | Pure queries over a built `MapIndex`, including `turn_angle`  |
//! | [`pathfinding`] | `find_path` (A* with turn penalty), `compute_path_travel_time` |
//! | [`matrix`]    | `travel_time_matrix` — multi-target Dijkstra from a key set |
//! | [`error`]     | `MapError`, `MapResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-------------------------------------------------------------|
//! | `parallel` | Parallelizes the matrix step across key sources with rayon. |
//! | `serde`    | Propagates serde derives (forwarded to `streetmap-core/serde`). |

pub mod error;
pub mod index;
pub mod matrix;
pub mod model;
pub mod pathfinding;
pub mod query;


pub use error::{MapError, MapResult};
pub use index::{MapIndex, MapIndexBuilder};
pub use matrix::TravelTimeMatrix;
pub use model::{Feature, FeatureType, Intersection, OsmNode, OsmWay, Poi, Street, StreetSegment};
pub use pathfinding::{compute_path_travel_time, find_path};
pub use query::{BoundingBox, NO_ANGLE};
