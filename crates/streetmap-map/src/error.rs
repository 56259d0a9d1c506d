//! Map-subsystem error type.
//!
//! Per spec, the query layer and routing core never return `Result` — their
//! failure modes are in-band (empty vec, `NO_ANGLE`, empty string, `0.0`).
//! `MapError` is reserved for build-time failures that have no sensible
//! in-band empty value.

use thiserror::Error;

use streetmap_core::IntersectionId;

/// Errors produced while building a [`crate::index::MapIndex`].
#[derive(Debug, Error)]
pub enum MapError {
    #[error("segment references unknown intersection {0}")]
    UnknownIntersection(IntersectionId),

    #[error("segment has fewer than two distinct endpoints after curve points")]
    DegenerateSegment,

    #[error("street {0} has no member segments")]
    EmptyStreet(String),
}

pub type MapResult<T> = Result<T, MapError>;
