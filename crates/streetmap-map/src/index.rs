//! The map index: derived tables built once from the raw entities, then
//! read-only for the lifetime of the map — an owned value held by the
//! caller rather than process-wide state.
//!
//! Built incrementally through [`MapIndexBuilder`], which derives every
//! lookup table (adjacency, per-street segment lists, the street-name
//! index, the heuristic speed constant) exactly once in `build()`.

use std::collections::HashMap;

use streetmap_core::{
    FeatureId, IntersectionId, OsmNodeId, OsmWayId, PoiId, SegmentId, StreetId,
};

use crate::model::{Feature, Intersection, OsmNode, OsmWay, Poi, Street, StreetSegment};

/// Minimum value (m/s) the A* heuristic's "fastest plausible speed" constant
/// is clamped to, equivalent to 100 km/h.
pub const MIN_HEURISTIC_SPEED_MPS: f64 = 100_000.0 / 3_600.0;

/// All derived, queryable state for one loaded map.
///
/// Built once by [`MapIndexBuilder::build`], then shared read-only across
/// the query layer, A*, and the multi-target Dijkstra matrix step. Dropped
/// like any other owned value — there is no separate teardown step.
pub struct MapIndex {
    pub(crate) intersections: Vec<Intersection>,
    pub(crate) segments: Vec<StreetSegment>,
    pub(crate) streets: Vec<Street>,
    pub(crate) osm_nodes: Vec<OsmNode>,
    pub(crate) osm_node_lookup: HashMap<OsmNodeId, usize>,
    pub(crate) osm_ways: Vec<OsmWay>,
    pub(crate) osm_way_lookup: HashMap<OsmWayId, usize>,
    pub(crate) features: Vec<Feature>,
    pub(crate) pois: Vec<Poi>,

    /// `adjacency[i]` = deduplicated, one-way-legal neighbours of intersection `i`.
    pub(crate) adjacency: Vec<Vec<IntersectionId>>,
    /// `segments_of_intersection[i]` = every segment incident to `i`.
    pub(crate) segments_of_intersection: Vec<Vec<SegmentId>>,
    /// Length in metres, indexed by `SegmentId`.
    pub(crate) segment_length_m: Vec<f64>,
    /// Travel time in seconds, indexed by `SegmentId`.
    pub(crate) segment_travel_time_s: Vec<f64>,
    /// `(normalized name, street id)`, sorted by key, stable on ties —
    /// supports prefix search via `partition_point`.
    pub(crate) street_name_index: Vec<(String, StreetId)>,

    /// Fastest speed limit present on the map (m/s), clamped to at least
    /// [`MIN_HEURISTIC_SPEED_MPS`]. Used as the A* heuristic's divisor so the
    /// heuristic stays admissible regardless of what the map actually
    /// contains.
    pub(crate) fastest_plausible_mps: f64,
}

impl MapIndex {
    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn street_count(&self) -> usize {
        self.streets.len()
    }

    pub(crate) fn intersection(&self, id: IntersectionId) -> &Intersection {
        &self.intersections[id.index()]
    }

    pub(crate) fn segment(&self, id: SegmentId) -> &StreetSegment {
        &self.segments[id.index()]
    }

    pub(crate) fn street(&self, id: StreetId) -> &Street {
        &self.streets[id.index()]
    }

    pub(crate) fn intersection_pos(&self, id: IntersectionId) -> streetmap_core::GeoPoint {
        self.intersection(id).pos
    }

    pub(crate) fn segment_raw(&self, id: SegmentId) -> &StreetSegment {
        self.segment(id)
    }

    /// Divisor for the A* heuristic: the fastest speed limit present on the
    /// map, clamped to at least [`MIN_HEURISTIC_SPEED_MPS`].
    pub(crate) fn fastest_plausible_speed_mps(&self) -> f64 {
        self.fastest_plausible_mps
    }
}

/// Builds a [`MapIndex`] incrementally. Accepts entities in any order except
/// that a segment's `street_id` must come from a prior [`add_street`](Self::add_street)
/// call, and a segment's endpoints from prior [`add_intersection`](Self::add_intersection)
/// calls.
pub struct MapIndexBuilder {
    intersections: Vec<Intersection>,
    street_names: Vec<String>,
    segments: Vec<StreetSegment>,
    osm_nodes: Vec<OsmNode>,
    osm_ways: Vec<OsmWay>,
    features: Vec<Feature>,
    pois: Vec<Poi>,
}

impl MapIndexBuilder {
    pub fn new() -> Self {
        Self {
            intersections: Vec::new(),
            street_names: Vec::new(),
            segments: Vec::new(),
            osm_nodes: Vec::new(),
            osm_ways: Vec::new(),
            features: Vec::new(),
            pois: Vec::new(),
        }
    }

    pub fn with_capacity(intersections: usize, segments: usize) -> Self {
        Self {
            intersections: Vec::with_capacity(intersections),
            street_names: Vec::new(),
            segments: Vec::with_capacity(segments),
            osm_nodes: Vec::new(),
            osm_ways: Vec::new(),
            features: Vec::new(),
            pois: Vec::new(),
        }
    }

    pub fn add_intersection(&mut self, pos: streetmap_core::GeoPoint, name: impl Into<String>) -> IntersectionId {
        let id = IntersectionId(self.intersections.len() as u32);
        self.intersections.push(Intersection { pos, name: name.into() });
        id
    }

    pub fn add_street(&mut self, name: impl Into<String>) -> StreetId {
        let id = StreetId(self.street_names.len() as u32);
        self.street_names.push(name.into());
        id
    }

    /// Add a street segment. `curve_points` run from `from` to `to`,
    /// excluding the intersection endpoints themselves.
    pub fn add_segment(
        &mut self,
        from: IntersectionId,
        to: IntersectionId,
        street_id: StreetId,
        one_way: bool,
        speed_limit_mps: f64,
        curve_points: Vec<streetmap_core::GeoPoint>,
    ) -> SegmentId {
        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(StreetSegment {
            from,
            to,
            street_id,
            one_way,
            speed_limit_mps,
            curve_points,
        });
        id
    }

    pub fn add_osm_node(&mut self, osm_id: OsmNodeId, pos: streetmap_core::GeoPoint, tags: Vec<(String, String)>) {
        self.osm_nodes.push(OsmNode { osm_id, pos, tags });
    }

    pub fn add_osm_way(&mut self, osm_id: OsmWayId, node_osm_ids: Vec<OsmNodeId>) {
        self.osm_ways.push(OsmWay { osm_id, node_osm_ids });
    }

    pub fn add_feature(
        &mut self,
        feature_type: crate::model::FeatureType,
        points: Vec<streetmap_core::GeoPoint>,
        name: Option<String>,
    ) -> FeatureId {
        let id = FeatureId(self.features.len() as u32);
        self.features.push(Feature { feature_type, points, name });
        id
    }

    pub fn add_poi(&mut self, poi_type: impl Into<String>, pos: streetmap_core::GeoPoint, name: Option<String>) -> PoiId {
        let id = PoiId(self.pois.len() as u32);
        self.pois.push(Poi { poi_type: poi_type.into(), pos, name });
        id
    }

    pub fn intersection_pos(&self, id: IntersectionId) -> streetmap_core::GeoPoint {
        self.intersections[id.index()].pos
    }

    /// Validate, then consume the builder and derive every lookup table the
    /// index needs. Rejects segments referencing an out-of-range
    /// intersection, segments with fewer than two distinct endpoints once
    /// curve points are folded in, and streets with no member segments —
    /// the malformed-input cases [`crate::error::MapError`] exists for.
    ///
    /// Prefer this over [`Self::build`] whenever the entities come from an
    /// untrusted loader rather than being constructed in-process (e.g.
    /// tests), since those are exactly the callers that can hand the
    /// builder a dangling reference.
    pub fn try_build(self) -> crate::error::MapResult<MapIndex> {
        use crate::error::MapError;

        let n_intersections = self.intersections.len();
        for seg in &self.segments {
            if seg.from.index() >= n_intersections {
                return Err(MapError::UnknownIntersection(seg.from));
            }
            if seg.to.index() >= n_intersections {
                return Err(MapError::UnknownIntersection(seg.to));
            }
            // A cul-de-sac (from == to) is a legal zero-length loop segment
            // (spec.md §3); only a non-positive speed limit is degenerate.
            if seg.speed_limit_mps <= 0.0 {
                return Err(MapError::DegenerateSegment);
            }
        }
        for (idx, name) in self.street_names.iter().enumerate() {
            let street_id = StreetId(idx as u32);
            if !self.segments.iter().any(|s| s.street_id == street_id) {
                return Err(MapError::EmptyStreet(name.clone()));
            }
        }

        Ok(self.build())
    }

    /// Consume the builder and derive every lookup table the index needs.
    ///
    /// Infallible: assumes the caller already has well-formed entities (the
    /// common case for in-process construction, e.g. tests and synthetic
    /// maps). Loaders fed untrusted or external data should call
    /// [`Self::try_build`] instead.
    pub fn build(self) -> MapIndex {
        let n_intersections = self.intersections.len();
        let n_streets = self.street_names.len();

        // ── Segment length & travel time ───────────────────────────────
        let mut segment_length_m = Vec::with_capacity(self.segments.len());
        let mut segment_travel_time_s = Vec::with_capacity(self.segments.len());
        for seg in &self.segments {
            let mut points = Vec::with_capacity(seg.curve_points.len() + 2);
            points.push(self.intersections[seg.from.index()].pos);
            points.extend_from_slice(&seg.curve_points);
            points.push(self.intersections[seg.to.index()].pos);

            let length: f64 = points
                .windows(2)
                .map(|w| w[0].distance_m(w[1]))
                .sum();
            segment_length_m.push(length);
            segment_travel_time_s.push(length / seg.speed_limit_mps);
        }

        // ── Adjacency & segments-of-intersection ───────────────────────
        let mut adjacency: Vec<Vec<IntersectionId>> = vec![Vec::new(); n_intersections];
        let mut segments_of_intersection: Vec<Vec<SegmentId>> = vec![Vec::new(); n_intersections];

        for (idx, seg) in self.segments.iter().enumerate() {
            let seg_id = SegmentId(idx as u32);

            segments_of_intersection[seg.from.index()].push(seg_id);
            if seg.to != seg.from {
                segments_of_intersection[seg.to.index()].push(seg_id);
            }

            if seg.from == seg.to {
                // Cul-de-sac: added once, regardless of one-way flag.
                push_unique(&mut adjacency[seg.from.index()], seg.from);
                continue;
            }

            // Traveling from → to is always legal.
            push_unique(&mut adjacency[seg.from.index()], seg.to);
            // Traveling to → from is legal only if the segment isn't one-way.
            if !seg.one_way {
                push_unique(&mut adjacency[seg.to.index()], seg.from);
            }
        }

        // ── Streets: segments + unique intersections, one pass ─────────
        let mut streets: Vec<Street> = self
            .street_names
            .iter()
            .map(|name| Street {
                name: name.clone(),
                segments: Vec::new(),
                intersections: Vec::new(),
            })
            .collect();

        for (idx, seg) in self.segments.iter().enumerate() {
            let seg_id = SegmentId(idx as u32);
            let street = &mut streets[seg.street_id.index()];
            street.segments.push(seg_id);
            push_unique(&mut street.intersections, seg.from);
            push_unique(&mut street.intersections, seg.to);
        }
        let _ = n_streets;

        // ── Street-name prefix index ────────────────────────────────────
        let mut street_name_index: Vec<(String, StreetId)> = self
            .street_names
            .iter()
            .enumerate()
            .map(|(i, name)| (normalize_street_name(name), StreetId(i as u32)))
            .collect();
        street_name_index.sort_by(|a, b| a.0.cmp(&b.0));

        // ── OSM lookup tables ────────────────────────────────────────────
        let osm_node_lookup: HashMap<OsmNodeId, usize> = self
            .osm_nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.osm_id, i))
            .collect();
        let osm_way_lookup: HashMap<OsmWayId, usize> = self
            .osm_ways
            .iter()
            .enumerate()
            .map(|(i, w)| (w.osm_id, i))
            .collect();

        // ── Heuristic speed constant ─────────────────────────────────────
        let fastest_plausible_mps = self
            .segments
            .iter()
            .map(|s| s.speed_limit_mps)
            .fold(MIN_HEURISTIC_SPEED_MPS, f64::max);

        log::debug!(
            "map index built: {} intersections, {} segments, {} streets",
            n_intersections,
            self.segments.len(),
            streets.len(),
        );

        MapIndex {
            intersections: self.intersections,
            segments: self.segments,
            streets,
            osm_nodes: self.osm_nodes,
            osm_node_lookup,
            osm_ways: self.osm_ways,
            osm_way_lookup,
            features: self.features,
            pois: self.pois,
            adjacency,
            segments_of_intersection,
            segment_length_m,
            segment_travel_time_s,
            street_name_index,
            fastest_plausible_mps,
        }
    }
}

impl Default for MapIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn push_unique(v: &mut Vec<IntersectionId>, id: IntersectionId) {
    if !v.contains(&id) {
        v.push(id);
    }
}

/// Lowercase, whitespace-stripped form used as the street-name index key.
pub(crate) fn normalize_street_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
