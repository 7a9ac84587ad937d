//! Serialisable query results.
//!
//! Every coordinate here is geographic.  Points inside `geometry` arrays are
//! `[longitude, latitude]`, the GeoJSON axis order; named fields spell out
//! `latitude` / `longitude`.

use serde::Serialize;

/// One address matching a geocode query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeocodeHit {
    pub label:     String,
    pub latitude:  f64,
    pub longitude: f64,
}

/// The network node nearest to a query point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnappedNode {
    pub node_id:   u32,
    pub latitude:  f64,
    pub longitude: f64,
    /// Ground distance from the query point to the node, metres.
    pub distance:  f64,
}

/// The street passing closest to a query point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestStreet {
    pub street_id: i64,
    pub edge_id:   u32,
    pub distance:  f64,
}

/// A computed route.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    /// Source street ids in travel order.  A street split into several
    /// parts can appear more than once.
    pub edge_ids:   Vec<i64>,
    /// One `[lon, lat]` polyline per edge, oriented in travel direction.
    pub geometry:   Vec<Vec<[f64; 2]>>,
    pub total_cost: f64,
    pub node_path:  Vec<u32>,
}

/// Result of routing between two address queries.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FindPathResponse {
    pub start: GeocodeHit,
    pub end:   GeocodeHit,
    pub route: RouteResponse,
}
