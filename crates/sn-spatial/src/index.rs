//! Nearest-neighbour indexes backed by an R-tree (`rstar`).
//!
//! Two indexes live here:
//!
//! - [`SpatialIndex`] — points keyed by an id (network nodes).  Supports
//!   incremental insertion while a network is being snapped together, then
//!   read-only `nearest` / `within_radius` queries once the network is built.
//! - [`SegmentIndex`] — every segment of every street polyline keyed by its
//!   `EdgeId`.  Answers "which street is closest to this point", used for gap
//!   analysis and street lookup.
//!
//! # Determinism
//!
//! R-tree iteration order among equidistant entries is an artefact of tree
//! shape.  Both indexes re-sort candidates by `(distance, id)` so equal
//! distances always resolve to the lowest id.

use std::collections::BTreeSet;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use sn_core::{EdgeId, NodeId, PlanarPoint};

use crate::network::NetworkGraph;

// ── Point entries ────────────────────────────────────────────────────────────

/// Entry stored in the point R-tree: a projected `[x, y]` and its id.
#[derive(Clone, Debug)]
struct IndexedPoint<I> {
    point: [f64; 2],
    id:    I,
}

impl<I> RTreeObject for IndexedPoint<I> {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl<I> PointDistance for IndexedPoint<I> {
    /// Squared Euclidean distance in the projected plane.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── SpatialIndex ─────────────────────────────────────────────────────────────

/// Point index mapping projected positions to ids.
///
/// Query points with a non-finite coordinate match nothing.
#[derive(Clone, Debug)]
pub struct SpatialIndex<I = NodeId> {
    tree: RTree<IndexedPoint<I>>,
}

impl<I: Copy + Ord> SpatialIndex<I> {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load from `(id, point)` pairs.  O(n log n), faster than
    /// repeated [`insert`](Self::insert).
    pub fn bulk_load(entries: impl IntoIterator<Item = (I, PlanarPoint)>) -> Self {
        let entries: Vec<IndexedPoint<I>> = entries
            .into_iter()
            .map(|(id, p)| IndexedPoint { point: p.as_array(), id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn insert(&mut self, id: I, point: PlanarPoint) {
        self.tree.insert(IndexedPoint { point: point.as_array(), id });
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Up to `k` entries closest to `point`, by ascending distance, ties
    /// broken by lowest id.  Empty index → empty `Vec`.
    pub fn nearest(&self, point: PlanarPoint, k: usize) -> Vec<(I, f64)> {
        if k == 0 || !point.is_finite() {
            return Vec::new();
        }

        // Pull candidates until the k-th distance is passed, so every entry
        // tied with the k-th is seen before sorting by id.
        let mut hits: Vec<(I, f64)> = Vec::with_capacity(k);
        let mut cutoff = f64::INFINITY;
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&point.as_array()) {
            if hits.len() >= k && d2 > cutoff {
                break;
            }
            hits.push((entry.id, d2));
            if hits.len() == k {
                cutoff = d2;
            }
        }

        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits.truncate(k);
        hits.into_iter().map(|(id, d2)| (id, d2.sqrt())).collect()
    }

    /// All ids at distance `<= radius` from `point`.
    pub fn within_radius(&self, point: PlanarPoint, radius: f64) -> BTreeSet<I> {
        if !point.is_finite() || !(radius >= 0.0) {
            return BTreeSet::new();
        }
        self.tree
            .locate_within_distance(point.as_array(), radius * radius)
            .map(|e| e.id)
            .collect()
    }
}

impl<I: Copy + Ord> Default for SpatialIndex<I> {
    fn default() -> Self {
        Self::new()
    }
}

// ── Segment entries ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct IndexedSegment {
    a:    [f64; 2],
    b:    [f64; 2],
    edge: EdgeId,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.a, self.b)
    }
}

impl PointDistance for IndexedSegment {
    /// Squared distance from `point` to the closest point on the segment.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.b[0] - self.a[0];
        let dy = self.b[1] - self.a[1];
        let len2 = dx * dx + dy * dy;
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((point[0] - self.a[0]) * dx + (point[1] - self.a[1]) * dy) / len2).clamp(0.0, 1.0)
        };
        let cx = self.a[0] + t * dx - point[0];
        let cy = self.a[1] + t * dy - point[1];
        cx * cx + cy * cy
    }
}

// ── SegmentIndex ─────────────────────────────────────────────────────────────

/// Index over the raw street polylines of a network, one entry per segment.
#[derive(Clone, Debug, Default)]
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    /// Index every segment of every edge geometry in `graph`.
    pub fn from_graph(graph: &NetworkGraph) -> Self {
        let segments: Vec<IndexedSegment> = graph
            .edges
            .iter()
            .enumerate()
            .flat_map(|(i, edge)| {
                let id = EdgeId(i as u32);
                edge.geometry
                    .polyline
                    .windows(2)
                    .map(move |w| IndexedSegment { a: w[0].as_array(), b: w[1].as_array(), edge: id })
            })
            .collect();
        Self { tree: RTree::bulk_load(segments) }
    }

    /// Number of indexed segments.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The edge whose geometry passes closest to `point`, with that
    /// distance.  Ties resolve to the lowest `EdgeId`.
    pub fn nearest_edge(&self, point: PlanarPoint) -> Option<(EdgeId, f64)> {
        if !point.is_finite() {
            return None;
        }
        let mut best: Option<(EdgeId, f64)> = None;
        for (seg, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&point.as_array()) {
            match best {
                None => best = Some((seg.edge, d2)),
                Some((_, best_d2)) if d2 > best_d2 => break,
                Some((best_edge, best_d2)) => {
                    if seg.edge < best_edge {
                        best = Some((seg.edge, best_d2));
                    }
                }
            }
        }
        best.map(|(edge, d2)| (edge, d2.sqrt()))
    }

    /// Every edge with at least one segment within `radius` of `point`.
    pub fn edges_within(&self, point: PlanarPoint, radius: f64) -> BTreeSet<EdgeId> {
        if !point.is_finite() || !(radius >= 0.0) {
            return BTreeSet::new();
        }
        self.tree
            .locate_within_distance(point.as_array(), radius * radius)
            .map(|s| s.edge)
            .collect()
    }
}
