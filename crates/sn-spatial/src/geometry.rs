//! Street geometry records and validation/repair.
//!
//! Raw records arrive from an ingestion source as [`StreetRecord`]s whose
//! geometry may be a single polyline or several disconnected parts.
//! [`repair`] turns one record into zero or more clean [`StreetGeometry`]
//! parts ready for snapping.
//!
//! # Repair rules
//!
//! 1. Vertices with a non-finite coordinate are dropped.
//! 2. Consecutive duplicate vertices are collapsed into one.
//! 3. A part left with fewer than two vertices is unusable.
//! 4. A part whose length overflows to infinity is unusable.
//!
//! Self-intersecting polylines (loops, cul-de-sacs drawn as rings) are valid
//! streets and pass through unchanged; only the vertex list is cleaned.
//!
//! # Multi-part records
//!
//! Under [`MultiPartPolicy::SplitParts`] every usable part becomes its own
//! geometry (`part` = position in the source record).  Under
//! [`MultiPartPolicy::FirstPartOnly`] everything after the first part is
//! discarded, which loses street segments; the count is reported so the
//! loss is visible.

use sn_core::geo::polyline_length;
use sn_core::{MultiPartPolicy, PlanarPoint, StreetId};

use crate::{SpatialError, SpatialResult};

/// Geometry as delivered by the ingestion source, in projected coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum RawGeometry {
    LineString(Vec<PlanarPoint>),
    MultiLineString(Vec<Vec<PlanarPoint>>),
}

impl RawGeometry {
    /// An empty geometry.  Used by loaders for records whose geometry is
    /// missing or of an unsupported type, so they surface as degenerate.
    pub fn empty() -> Self {
        RawGeometry::LineString(Vec::new())
    }

    fn parts(&self) -> &[Vec<PlanarPoint>] {
        match self {
            RawGeometry::LineString(line) => std::slice::from_ref(line),
            RawGeometry::MultiLineString(lines) => lines,
        }
    }
}

/// One street as read from the source data.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetRecord {
    pub id:       StreetId,
    pub geometry: RawGeometry,
}

impl StreetRecord {
    /// Convenience for the common single-polyline case.
    pub fn line(id: i64, points: Vec<PlanarPoint>) -> Self {
        Self { id: StreetId(id), geometry: RawGeometry::LineString(points) }
    }
}

/// A clean, single-part street polyline.
///
/// Retained by its edge for path-geometry reconstruction.  `polyline` runs
/// from the edge's source node to its target node.
#[derive(Clone, Debug, PartialEq)]
pub struct StreetGeometry {
    pub id:       StreetId,
    /// Position of this part in the source record (0 for single lines).
    pub part:     u32,
    pub polyline: Vec<PlanarPoint>,
    /// Sum of consecutive-vertex distances, projected units.
    pub length:   f64,
}

impl StreetGeometry {
    /// Build from an already-clean polyline, computing its length.
    pub fn new(id: StreetId, part: u32, polyline: Vec<PlanarPoint>) -> Self {
        let length = polyline_length(&polyline);
        Self { id, part, polyline, length }
    }

    #[inline]
    pub fn first(&self) -> PlanarPoint {
        self.polyline[0]
    }

    #[inline]
    pub fn last(&self) -> PlanarPoint {
        self.polyline[self.polyline.len() - 1]
    }
}

/// Result of repairing one record.
#[derive(Clone, Debug)]
pub struct Repaired {
    pub parts:         Vec<StreetGeometry>,
    /// `true` if any vertex was dropped or collapsed.
    pub modified:      bool,
    /// Parts discarded as unusable or by `FirstPartOnly`.
    pub dropped_parts: usize,
}

/// Validate and repair one street record.
///
/// Fails with [`SpatialError::DegenerateGeometry`] when no part has two
/// usable vertices and a finite length.
pub fn repair(record: &StreetRecord, policy: MultiPartPolicy) -> SpatialResult<Repaired> {
    let all = record.geometry.parts();
    let considered = match policy {
        MultiPartPolicy::SplitParts => all,
        MultiPartPolicy::FirstPartOnly => &all[..all.len().min(1)],
    };

    let mut parts = Vec::with_capacity(considered.len());
    let mut modified = false;
    let mut dropped_parts = all.len() - considered.len();
    let mut best_points = 0;

    for (i, raw) in considered.iter().enumerate() {
        let (clean, changed) = clean_polyline(raw);
        modified |= changed;
        best_points = best_points.max(clean.len());
        if clean.len() < 2 {
            dropped_parts += 1;
            continue;
        }
        let part = StreetGeometry::new(record.id, i as u32, clean);
        if !part.length.is_finite() {
            dropped_parts += 1;
            continue;
        }
        parts.push(part);
    }

    if parts.is_empty() {
        return Err(SpatialError::DegenerateGeometry { street: record.id, points: best_points });
    }
    Ok(Repaired { parts, modified, dropped_parts })
}

/// Drop non-finite vertices and collapse consecutive duplicates.
fn clean_polyline(points: &[PlanarPoint]) -> (Vec<PlanarPoint>, bool) {
    let mut out: Vec<PlanarPoint> = Vec::with_capacity(points.len());
    for &p in points {
        if !p.is_finite() {
            continue;
        }
        if out.last() == Some(&p) {
            continue;
        }
        out.push(p);
    }
    let changed = out.len() != points.len();
    (out, changed)
}
