//! Fluent builder for constructing a [`RoutingService`].

use tracing::info;

use sn_address::{Address, AddressIndex};
use sn_core::NetworkConfig;
use sn_spatial::{analyze, Built, DijkstraRouter, Router, SegmentIndex, StreetRecord, TopologyBuilder};

use crate::{RoutingService, ServiceResult};

/// Fluent builder for [`RoutingService<R>`].
///
/// # Inputs
///
/// | Method            | Default                              |
/// |-------------------|--------------------------------------|
/// | `new(config)`     | required; router is `DijkstraRouter` |
/// | `.router(r)`      | `DijkstraRouter`                     |
/// | `.addresses(v)`   | no addresses (every geocode misses)  |
/// | `.streets(v)`     | none, which fails the build          |
///
/// Street records are in projected coordinates; use the GeoJSON loader
/// with a projector for geographic sources.
///
/// # Example
///
/// ```rust,ignore
/// let service = ServiceBuilder::new(NetworkConfig::default())
///     .addresses(load_addresses_csv(path)?)
///     .streets(streets)
///     .build()?;
/// let hits = service.geocode("main")?;
/// ```
pub struct ServiceBuilder<R: Router = DijkstraRouter> {
    config:    NetworkConfig,
    router:    R,
    addresses: Option<Vec<Address>>,
    streets:   Option<Vec<StreetRecord>>,
}

impl ServiceBuilder<DijkstraRouter> {
    pub fn new(config: NetworkConfig) -> Self {
        Self { config, router: DijkstraRouter, addresses: None, streets: None }
    }
}

impl<R: Router> ServiceBuilder<R> {
    /// Replace the routing algorithm.
    pub fn router<R2: Router>(self, router: R2) -> ServiceBuilder<R2> {
        ServiceBuilder {
            config:    self.config,
            router,
            addresses: self.addresses,
            streets:   self.streets,
        }
    }

    pub fn addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = Some(addresses);
        self
    }

    pub fn streets(mut self, streets: Vec<StreetRecord>) -> Self {
        self.streets = Some(streets);
        self
    }

    /// Validate the configuration, build topology and indexes, and return a
    /// ready-to-query [`RoutingService`].
    ///
    /// Degenerate streets are skipped and listed in
    /// [`RoutingService::report`]; the build fails only if no street is
    /// usable.
    pub fn build(self) -> ServiceResult<RoutingService<R>> {
        self.config.validate()?;

        // ── Street network ────────────────────────────────────────────────
        let streets = self.streets.unwrap_or_default();
        let Built { graph, report } = TopologyBuilder::from_config(&self.config).build(&streets)?;
        let segments = SegmentIndex::from_graph(&graph);

        let analysis = analyze(&graph, &segments, self.config.snapping_tolerance);
        info!(
            dead_ends = analysis.dead_ends.len(),
            isolated_edges = analysis.isolated_edges.len(),
            rings = analysis.rings.len(),
            potential_gaps = analysis.potential_gaps.len(),
            components = analysis.components,
            "street network analysed"
        );

        // ── Addresses ─────────────────────────────────────────────────────
        let mut addresses = AddressIndex::from_config(&self.config);
        addresses.load(self.addresses.unwrap_or_default());

        Ok(RoutingService {
            projector: self.config.projection.clone(),
            config: self.config,
            graph,
            segments,
            addresses,
            router: self.router,
            report,
            analysis,
        })
    }
}
