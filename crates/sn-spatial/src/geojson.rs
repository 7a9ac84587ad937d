//! GeoJSON street loader — enabled with the `geojson` Cargo feature (default).
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use sn_spatial::geojson::{load_streets_path, StreetSource};
//!
//! let streets = load_streets_path(Path::new("streets.geojson"), &StreetSource::default())?;
//! let built = TopologyBuilder::new(1.0).build(&streets)?;
//! ```
//!
//! # What is loaded
//!
//! A `FeatureCollection` of `LineString` / `MultiLineString` features.  Only
//! the first two values of each position are read.
//!
//! The street id comes from the `id_property` property (default
//! `OBJECTID`), else the feature's top-level `id`, else its position in the
//! collection.  Integer-valued floats and numeric strings are accepted.
//!
//! Features with no geometry, another geometry type, short positions or
//! out-of-domain coordinates are kept as empty records so the topology
//! build counts them as degenerate instead of losing them silently.  A
//! document that is not valid GeoJSON fails the whole load.
//!
//! # Coordinates
//!
//! By default positions are taken to be projected already.  Set
//! [`StreetSource::projector`] to project geographic `[lon, lat]` positions
//! on load.

use std::io::Read;
use std::path::Path;

use ::geojson::feature::Id;
use ::geojson::{Feature, GeoJson, LineStringType, Value};
use tracing::{info, warn};

use sn_core::{GeoPoint, PlanarPoint, Projector, StreetId};

use crate::geometry::{RawGeometry, StreetRecord};
use crate::{SpatialError, SpatialResult};

/// Loader options.
#[derive(Clone, Copy)]
pub struct StreetSource<'a> {
    /// Feature property holding the street id.
    pub id_property: &'a str,
    /// `Some` if positions are geographic and must be projected.
    pub projector:   Option<&'a dyn Projector>,
}

impl Default for StreetSource<'_> {
    fn default() -> Self {
        Self { id_property: "OBJECTID", projector: None }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load street records from a GeoJSON file.
pub fn load_streets_path(path: &Path, source: &StreetSource<'_>) -> SpatialResult<Vec<StreetRecord>> {
    let file = std::fs::File::open(path)?;
    load_streets_reader(std::io::BufReader::new(file), source)
}

/// Like [`load_streets_path`] but accepts any `Read` source.
pub fn load_streets_reader<R: Read>(reader: R, source: &StreetSource<'_>) -> SpatialResult<Vec<StreetRecord>> {
    let collection = match GeoJson::from_reader(reader).map_err(|e| SpatialError::GeoJson(e.to_string()))? {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(not_a_collection("Feature")),
        GeoJson::Geometry(_) => return Err(not_a_collection("Geometry")),
    };

    let records: Vec<StreetRecord> = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            let id = street_id(&f, source.id_property, i);
            let geometry = match f.geometry {
                Some(g) => decode_geometry(g.value, source.projector).unwrap_or_else(|reason| {
                    warn!(street = id.0, %reason, "unusable street geometry");
                    RawGeometry::empty()
                }),
                None => RawGeometry::empty(),
            };
            StreetRecord { id, geometry }
        })
        .collect();

    info!(streets = records.len(), "street features loaded");
    Ok(records)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn not_a_collection(found: &str) -> SpatialError {
    SpatialError::GeoJson(format!("expected a FeatureCollection, found a {found}"))
}

fn street_id(feature: &Feature, id_property: &str, position: usize) -> StreetId {
    feature
        .property(id_property)
        .and_then(integer_value)
        .or_else(|| match feature.id.as_ref()? {
            Id::Number(n) => integer_number(n),
            Id::String(s) => s.trim().parse().ok(),
        })
        .map(StreetId)
        .unwrap_or(StreetId(position as i64))
}

fn integer_value(v: &serde_json::Value) -> Option<i64> {
    match v {
        serde_json::Value::Number(n) => integer_number(n),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer_number(n: &serde_json::Number) -> Option<i64> {
    n.as_i64()
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15).map(|f| f as i64))
}

fn decode_geometry(value: Value, projector: Option<&dyn Projector>) -> Result<RawGeometry, String> {
    match value {
        Value::LineString(line) => Ok(RawGeometry::LineString(decode_line(line, projector)?)),
        Value::MultiLineString(lines) => {
            let parts = lines
                .into_iter()
                .map(|l| decode_line(l, projector))
                .collect::<Result<_, _>>()?;
            Ok(RawGeometry::MultiLineString(parts))
        }
        Value::Point(_) => Err(unsupported("Point")),
        Value::MultiPoint(_) => Err(unsupported("MultiPoint")),
        Value::Polygon(_) => Err(unsupported("Polygon")),
        Value::MultiPolygon(_) => Err(unsupported("MultiPolygon")),
        Value::GeometryCollection(_) => Err(unsupported("GeometryCollection")),
    }
}

fn unsupported(kind: &str) -> String {
    format!("unsupported geometry type {kind}")
}

fn decode_line(positions: LineStringType, projector: Option<&dyn Projector>) -> Result<Vec<PlanarPoint>, String> {
    positions
        .into_iter()
        .map(|pos| {
            let [a, b] = match pos.as_slice() {
                [a, b, ..] => [*a, *b],
                _ => return Err(format!("position has {} value(s), need 2", pos.len())),
            };
            match projector {
                None => Ok(PlanarPoint::new(a, b)),
                Some(p) => p.to_projected(GeoPoint::new(a, b)).map_err(|e| e.to_string()),
            }
        })
        .collect()
}
