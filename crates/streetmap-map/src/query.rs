//! Pure queries over a built [`MapIndex`].
//!
//! None of these return `Result`: failure is always in-band — an empty
//! vector, an empty string, `0.0`, or [`NO_ANGLE`]. `MapError`/`Result` is
//! reserved for build-time failures.

use std::collections::HashSet;

use streetmap_core::{GeoPoint, IntersectionId, OsmNodeId, OsmWayId, PoiId, SegmentId, StreetId};

use crate::index::{normalize_street_name, MapIndex};

/// Sentinel returned by [`MapIndex::turn_angle`] when no angle can be
/// computed: no shared intersection, or the turn is illegal under one-way
/// constraints. Outside `acos`'s `[0, pi]` range, so it can never be
/// confused with a real answer.
pub const NO_ANGLE: f64 = -1.0;

/// Axis-aligned lat/lon bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl MapIndex {
    // ── Adjacency / incidence ───────────────────────────────────────────

    pub fn adjacent_intersections(&self, i: IntersectionId) -> &[IntersectionId] {
        &self.adjacency[i.index()]
    }

    pub fn segments_of_intersection(&self, i: IntersectionId) -> &[SegmentId] {
        &self.segments_of_intersection[i.index()]
    }

    pub fn segments_of_street(&self, s: StreetId) -> &[SegmentId] {
        &self.street(s).segments
    }

    pub fn intersections_of_street(&self, s: StreetId) -> &[IntersectionId] {
        &self.street(s).intersections
    }

    /// Intersections common to both streets, deduplicated. Each street's own
    /// intersection list is already a unique set, so this is a set
    /// intersection that preserves `a`'s order.
    pub fn intersections_of_two_streets(&self, a: StreetId, b: StreetId) -> Vec<IntersectionId> {
        let b_set: HashSet<IntersectionId> = self.street(b).intersections.iter().copied().collect();
        self.street(a)
            .intersections
            .iter()
            .copied()
            .filter(|i| b_set.contains(i))
            .collect()
    }

    // ── Lengths & travel times ───────────────────────────────────────────

    pub fn street_segment_length(&self, seg: SegmentId) -> f64 {
        self.segment_length_m[seg.index()]
    }

    pub fn street_segment_travel_time(&self, seg: SegmentId) -> f64 {
        self.segment_travel_time_s[seg.index()]
    }

    /// Sum of member segment lengths (spec "length consistency" property).
    pub fn street_length(&self, s: StreetId) -> f64 {
        self.street(s)
            .segments
            .iter()
            .map(|&seg| self.street_segment_length(seg))
            .sum()
    }

    /// Min/max over every member segment's endpoints and curve points.
    pub fn street_bounding_box(&self, s: StreetId) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        for &seg_id in &self.street(s).segments {
            let seg = self.segment(seg_id);
            let mut extend = |p: GeoPoint| {
                bbox = Some(match bbox {
                    None => BoundingBox { min: p, max: p },
                    Some(b) => BoundingBox {
                        min: GeoPoint::new(b.min.lat.min(p.lat), b.min.lon.min(p.lon)),
                        max: GeoPoint::new(b.max.lat.max(p.lat), b.max.lon.max(p.lon)),
                    },
                });
            };
            extend(self.intersection(seg.from).pos);
            extend(self.intersection(seg.to).pos);
            for &p in &seg.curve_points {
                extend(p);
            }
        }
        bbox
    }

    // ── Nearest-neighbour queries ─────────────────────────────────────────

    /// Nearest intersection to `p` by [`GeoPoint::distance_m`]. Linear scan,
    /// ties broken by lowest id (first encountered) — spec §4.3 mandates
    /// this exact tie-break, which a spatial index's approximate ordering
    /// can't guarantee; see DESIGN.md.
    pub fn closest_intersection(&self, p: GeoPoint) -> Option<IntersectionId> {
        let mut best: Option<(IntersectionId, f64)> = None;
        for (idx, isect) in self.intersections.iter().enumerate() {
            let d = p.distance_m(isect.pos);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((IntersectionId(idx as u32), d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Nearest POI of `poi_type` to `p`. Same tie-break rule as
    /// [`closest_intersection`](Self::closest_intersection).
    pub fn closest_poi(&self, p: GeoPoint, poi_type: &str) -> Option<PoiId> {
        let mut best: Option<(PoiId, f64)> = None;
        for (idx, poi) in self.pois.iter().enumerate() {
            if poi.poi_type != poi_type {
                continue;
            }
            let d = p.distance_m(poi.pos);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((PoiId(idx as u32), d));
            }
        }
        best.map(|(id, _)| id)
    }

    // ── OSM lookups ───────────────────────────────────────────────────────

    /// Sum of distances between consecutive member nodes. `0.0` if the way
    /// id is unknown or fewer than two of its nodes resolve.
    pub fn way_length(&self, way_id: OsmWayId) -> f64 {
        let Some(&way_idx) = self.osm_way_lookup.get(&way_id) else {
            return 0.0;
        };
        let way = &self.osm_ways[way_idx];
        way.node_osm_ids
            .windows(2)
            .filter_map(|w| {
                let a = self.osm_node_lookup.get(&w[0])?;
                let b = self.osm_node_lookup.get(&w[1])?;
                Some(self.osm_nodes[*a].pos.distance_m(self.osm_nodes[*b].pos))
            })
            .sum()
    }

    /// First matching tag value for `key` on node `node_id`. Empty string if
    /// the node or the key is missing.
    pub fn node_tag_value(&self, node_id: OsmNodeId, key: &str) -> String {
        let Some(&idx) = self.osm_node_lookup.get(&node_id) else {
            return String::new();
        };
        self.osm_nodes[idx]
            .tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    // ── Street-name prefix search ────────────────────────────────────────

    /// Street ids whose normalized name starts with `prefix` (case- and
    /// whitespace-insensitive on both sides). Empty prefix returns an empty
    /// result.
    pub fn street_ids_from_partial_street_name(&self, prefix: &str) -> Vec<StreetId> {
        if prefix.trim().is_empty() {
            return Vec::new();
        }
        let key = normalize_street_name(prefix);
        let start = self.street_name_index.partition_point(|(k, _)| k.as_str() < key.as_str());

        let mut result = Vec::new();
        for (k, id) in &self.street_name_index[start..] {
            if !k.starts_with(&key) {
                break;
            }
            result.push(*id);
        }
        result
    }

    // ── Feature area ──────────────────────────────────────────────────────

    pub fn feature_area(&self, feature_id: streetmap_core::FeatureId) -> f64 {
        streetmap_core::geo::polygon_area(&self.features[feature_id.index()].points)
    }

    // ── Turn angle (spec §4.1) ────────────────────────────────────────────

    /// Angle in radians between the segment traveled into a shared
    /// intersection (`src`) and the segment traveled out of it (`dst`), or
    /// [`NO_ANGLE`] if there is no shared intersection or the implied turn
    /// is illegal under one-way constraints.
    pub fn turn_angle(&self, src: SegmentId, dst: SegmentId) -> f64 {
        let s = self.segment(src);
        let d = self.segment(dst);

        let shared = if s.to == d.from || s.to == d.to {
            s.to
        } else if s.from == d.from || s.from == d.to {
            s.from
        } else {
            return NO_ANGLE;
        };

        // Entering `src` at its `from` end means traveling to→from, illegal
        // if `src` is one-way.
        if shared == s.from && s.one_way {
            return NO_ANGLE;
        }
        // Exiting `dst` at its `to` end means traveling to→from, illegal if
        // `dst` is one-way.
        if shared == d.to && d.one_way {
            return NO_ANGLE;
        }

        let src_far = closest_approach_point(self, s, shared);
        let dst_far = closest_approach_point(self, d, shared);
        let shared_pos = self.intersection(shared).pos;

        let lat_avg_rad = ((src_far.lat + shared_pos.lat + dst_far.lat) / 3.0).to_radians();
        let (sx, sy) = src_far.project(lat_avg_rad);
        let (cx, cy) = shared_pos.project(lat_avg_rad);
        let (dx, dy) = dst_far.project(lat_avg_rad);

        // Approach vector (into the intersection), departure vector (out of it).
        let u = (cx - sx, cy - sy);
        let v = (dx - cx, dy - cy);
        let mag_u = (u.0 * u.0 + u.1 * u.1).sqrt();
        let mag_v = (v.0 * v.0 + v.1 * v.1).sqrt();
        if mag_u == 0.0 || mag_v == 0.0 {
            return NO_ANGLE;
        }

        let cos_theta = ((u.0 * v.0 + u.1 * v.1) / (mag_u * mag_v)).clamp(-1.0, 1.0);
        cos_theta.acos()
    }
}

/// The point used as a segment's "closest approach" to `shared`: the
/// adjacent curve point if the segment has curve geometry, otherwise the
/// opposite intersection.
fn closest_approach_point(index: &MapIndex, seg: &crate::model::StreetSegment, shared: IntersectionId) -> GeoPoint {
    if seg.curve_points.is_empty() {
        let opposite = if shared == seg.from { seg.to } else { seg.from };
        index.intersection(opposite).pos
    } else if shared == seg.from {
        seg.curve_points[0]
    } else {
        *seg.curve_points.last().unwrap()
    }
}
