//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into dense `Vec` tables via `id.0 as usize`, but callers
//! should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Dense index of an intersection. Max ~4.3 billion intersections.
    pub struct IntersectionId(u32);
}

typed_id! {
    /// Dense index of a street segment.
    pub struct SegmentId(u32);
}

typed_id! {
    /// Dense index of a named street (a set of segments sharing a name).
    pub struct StreetId(u32);
}

typed_id! {
    /// Dense index of a closed or open feature polygon (park, lake, building, …).
    pub struct FeatureId(u32);
}

typed_id! {
    /// Dense index of a point of interest.
    pub struct PoiId(u32);
}

typed_id! {
    /// Index of a delivery within a single courier planning request.
    pub struct DeliveryId(u32);
}

typed_id! {
    /// OSM node id, as assigned by OpenStreetMap — sparse, not dense, and not
    /// safe to use as a `Vec` index. Use `MapIndex`'s node lookup table.
    pub struct OsmNodeId(i64);
}

typed_id! {
    /// OSM way id. See [`OsmNodeId`] for the same sparseness caveat.
    pub struct OsmWayId(i64);
}
