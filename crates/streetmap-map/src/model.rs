//! Entity types making up the static road-map data model.
//!
//! These are plain data: all derived structure (adjacency, per-street
//! segment/intersection sets, the name index, OSM lookup tables) lives in
//! [`crate::index::MapIndex`], built once from these entities by
//! [`crate::index::MapIndexBuilder`].

use streetmap_core::{GeoPoint, IntersectionId, OsmNodeId, OsmWayId, StreetId};

/// A graph node: a geographic point where one or more segments meet.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub pos: GeoPoint,
    pub name: String,
}

/// A directed-or-bidirectional edge between two intersections.
///
/// `curve_points` are intermediate shape points between `from` and `to`,
/// ordered from `from` to `to`; empty for a straight segment.
#[derive(Clone, Debug)]
pub struct StreetSegment {
    pub from: IntersectionId,
    pub to: IntersectionId,
    pub street_id: StreetId,
    pub one_way: bool,
    /// Speed limit in metres/second.
    pub speed_limit_mps: f64,
    pub curve_points: Vec<GeoPoint>,
}

impl StreetSegment {
    /// All shape points from `from` to `to`, in traversal order, including
    /// the curve points but not the intersection endpoints themselves.
    pub fn curve_points(&self) -> &[GeoPoint] {
        &self.curve_points
    }
}

/// A named collection of segments, e.g. "Main Street".
#[derive(Clone, Debug)]
pub struct Street {
    pub name: String,
    pub segments: Vec<streetmap_core::SegmentId>,
    pub intersections: Vec<IntersectionId>,
}

/// An OSM node as loaded from the underlying database: an id, a position,
/// and a flat tag list (duplicates allowed; first match wins on lookup).
#[derive(Clone, Debug)]
pub struct OsmNode {
    pub osm_id: OsmNodeId,
    pub pos: GeoPoint,
    pub tags: Vec<(String, String)>,
}

/// An OSM way: an ordered sequence of member node OSM ids.
#[derive(Clone, Debug)]
pub struct OsmWay {
    pub osm_id: OsmWayId,
    pub node_osm_ids: Vec<OsmNodeId>,
}

/// Coarse classification of a map feature's geometry type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FeatureType {
    Park,
    Beach,
    Lake,
    River,
    Greenspace,
    Island,
    Building,
    Unknown,
}

/// A closed or open boundary, e.g. a park outline or a building footprint.
#[derive(Clone, Debug)]
pub struct Feature {
    pub feature_type: FeatureType,
    pub points: Vec<GeoPoint>,
    pub name: Option<String>,
}

/// A point of interest: a typed, optionally named location.
#[derive(Clone, Debug)]
pub struct Poi {
    pub poi_type: String,
    pub pos: GeoPoint,
    pub name: Option<String>,
}
