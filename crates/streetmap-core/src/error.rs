//! Shared error vocabulary for the routing engine.
//!
//! `streetmap-map` and `streetmap-courier` define their own `thiserror` enums
//! (`MapError`, `CourierError`) rather than wrapping this one — the query
//! layer never returns `Result` at all, so `CoreError` only needs to cover
//! failures that can occur while building the shared primitives themselves,
//! namely [`GeoPoint::try_new`](crate::geo::GeoPoint::try_new) rejecting an
//! out-of-range coordinate.

use thiserror::Error;

/// Errors produced by `streetmap-core`'s own constructors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// Shorthand result type for `streetmap-core`.
pub type CoreResult<T> = Result<T, CoreError>;
