//! The query façade.
//!
//! [`RoutingService`] owns everything a query needs: the street graph, its
//! segment index, the address index, the projection, and a router.  Build
//! one with [`ServiceBuilder`](crate::ServiceBuilder); afterwards all
//! methods take `&self` and the service can be shared behind an `Arc`.
//!
//! Coordinates cross this boundary in geographic form only.  Inputs are
//! projected on the way in, node positions and route geometry are
//! converted back on the way out.

use tracing::debug;

use sn_address::{Address, AddressIndex};
use sn_core::{GeoPoint, NetworkConfig, NodeId, PlanarPoint, Projector, TransverseMercator};
use sn_spatial::{
    BuildReport, DijkstraRouter, GraphAnalysis, NetworkGraph, Router, SegmentIndex, SpatialError,
};

use crate::response::{FindPathResponse, GeocodeHit, NearestStreet, RouteResponse, SnappedNode};
use crate::{ServiceError, ServiceResult};

/// Geocoding, snapping and routing over one loaded dataset.
pub struct RoutingService<R: Router = DijkstraRouter> {
    pub(crate) config:    NetworkConfig,
    pub(crate) projector: TransverseMercator,
    pub(crate) graph:     NetworkGraph,
    pub(crate) segments:  SegmentIndex,
    pub(crate) addresses: AddressIndex,
    pub(crate) router:    R,
    pub(crate) report:    BuildReport,
    pub(crate) analysis:  GraphAnalysis,
}

impl<R: Router> RoutingService<R> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn addresses(&self) -> &AddressIndex {
        &self.addresses
    }

    /// Summary of the topology build this service was created from.
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Network diagnostics computed at build time.
    pub fn analysis(&self) -> &GraphAnalysis {
        &self.analysis
    }

    // ── Addresses ─────────────────────────────────────────────────────────

    /// Every address whose label contains `text` (case-insensitive), in
    /// load order.
    pub fn geocode(&self, text: &str) -> ServiceResult<Vec<GeocodeHit>> {
        let hits = self.addresses.search(text)?;
        Ok(hits.into_iter().map(geocode_hit).collect())
    }

    /// Labels of matching addresses, at most `suggest_limit` of them.
    pub fn suggest(&self, text: &str) -> ServiceResult<Vec<String>> {
        let hits = self.addresses.search(text)?;
        Ok(hits
            .into_iter()
            .take(self.config.suggest_limit)
            .map(|a| a.label.clone())
            .collect())
    }

    // ── Network ───────────────────────────────────────────────────────────

    /// The network node nearest to a geographic point.
    pub fn snap_to_network(&self, latitude: f64, longitude: f64) -> ServiceResult<SnappedNode> {
        let query = self.project(latitude, longitude)?;
        let (node, distance) = self.graph.nearest_node(query).ok_or_else(|| self.empty_network())?;
        let at = self.projector.to_geographic(self.graph.node(node)?)?;
        debug!(latitude, longitude, node = node.0, distance, "snapped to network");
        Ok(SnappedNode { node_id: node.0, latitude: at.lat, longitude: at.lon, distance })
    }

    /// The street passing closest to a geographic point.
    pub fn nearest_street(&self, latitude: f64, longitude: f64) -> ServiceResult<NearestStreet> {
        let query = self.project(latitude, longitude)?;
        let (edge, distance) = self.segments.nearest_edge(query).ok_or_else(|| self.empty_network())?;
        let street = self.graph.edges[edge.index()].street();
        Ok(NearestStreet { street_id: street.0, edge_id: edge.0, distance })
    }

    /// Cheapest path between two network nodes.
    pub fn route(&self, start: NodeId, end: NodeId) -> ServiceResult<RouteResponse> {
        let path = self.router.shortest_path(&self.graph, start, end)?;
        let geometry = path
            .geometry(&self.graph)
            .into_iter()
            .map(|line| self.to_lon_lat(&line))
            .collect::<ServiceResult<_>>()?;
        debug!(start = start.0, end = end.0, edges = path.steps.len(), cost = path.total_cost, "route");
        Ok(RouteResponse {
            edge_ids:   path.street_ids(&self.graph).into_iter().map(|s| s.0).collect(),
            geometry,
            total_cost: path.total_cost,
            node_path:  path.node_path().into_iter().map(|n| n.0).collect(),
        })
    }

    /// Geocode both texts, snap the first hit of each to the network, and
    /// route between the two nodes.
    pub fn find_path(&self, start_text: &str, end_text: &str) -> ServiceResult<FindPathResponse> {
        let start = self.first_hit(start_text)?;
        let end = self.first_hit(end_text)?;
        let from = self.snap_to_network(start.location.lat, start.location.lon)?;
        let to = self.snap_to_network(end.location.lat, end.location.lon)?;
        let route = self.route(NodeId(from.node_id), NodeId(to.node_id))?;
        Ok(FindPathResponse { start: geocode_hit(start), end: geocode_hit(end), route })
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn first_hit(&self, text: &str) -> ServiceResult<&Address> {
        self.addresses
            .search(text)?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NoMatch(text.to_owned()))
    }

    fn empty_network(&self) -> ServiceError {
        SpatialError::EmptyInput { skipped: self.report.skipped }.into()
    }

    fn project(&self, latitude: f64, longitude: f64) -> ServiceResult<PlanarPoint> {
        let p = GeoPoint::checked(longitude, latitude)?;
        Ok(self.projector.to_projected(p)?)
    }

    fn to_lon_lat(&self, line: &[PlanarPoint]) -> ServiceResult<Vec<[f64; 2]>> {
        line.iter()
            .map(|&p| -> ServiceResult<[f64; 2]> {
                let g = self.projector.to_geographic(p)?;
                Ok([g.lon, g.lat])
            })
            .collect()
    }
}

fn geocode_hit(a: &Address) -> GeocodeHit {
    GeocodeHit { label: a.label.clone(), latitude: a.location.lat, longitude: a.location.lon }
}
