//! Topology construction: raw street geometries → routable [`NetworkGraph`].
//!
//! # Pipeline
//!
//! ```text
//! StreetRecord[] ──① repair──▶ StreetGeometry[] ──② snap endpoints──▶ nodes
//!                                               └─③ one edge per part─▶ NetworkGraph
//! ```
//!
//! ① Validation/repair ([`geometry::repair`](crate::geometry::repair)) has no
//!   shared state and runs on Rayon with the `parallel` feature.
//!
//! ② Snapping is a read-then-write sequence on the node index and always
//!   runs single-threaded, in input order: for each part, its first point
//!   then its last point.  A point within `snapping_tolerance` of an existing
//!   node reuses it (nearest wins, ties → lowest id); otherwise a new node is
//!   allocated.  The same input order therefore always yields the same node
//!   numbering.  Points snap to existing nodes only, never transitively to
//!   one another: with tolerance 1, endpoints at x = 0, 0.9 and 1.7 give
//!   two nodes, and the endpoints at 0.9 and 1.7 land on different ones
//!   although they are 0.8 apart.
//!
//! ③ Each part becomes one two-way edge costed at its polyline length.
//!
//! # Failure policy
//!
//! Degenerate records are skipped, counted, and sampled in the
//! [`BuildReport`]; they never abort the batch.  The build fails with
//! [`SpatialError::EmptyInput`] only when nothing usable remains.

use tracing::{debug, info, warn};

use sn_core::{MultiPartPolicy, NetworkConfig, StreetId};

use crate::geometry::{repair, Repaired, StreetRecord};
use crate::network::{NetworkGraph, NetworkGraphBuilder};
use crate::{SpatialError, SpatialResult};

/// How many skipped records are kept verbatim in a [`BuildReport`].
pub const SKIPPED_SAMPLE_LIMIT: usize = 10;

/// A street record rejected during a build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedStreet {
    pub street: StreetId,
    /// Usable vertices in the best part after repair.  Below 2 unless every
    /// part's length overflowed.
    pub points: usize,
}

/// Summary of a topology build.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildReport {
    /// Records handed to the builder.
    pub streets_in:    usize,
    /// Records that produced at least one edge.
    pub streets_used:  usize,
    pub nodes_out:     usize,
    pub edges_out:     usize,
    /// Records whose vertex list was cleaned.
    pub repaired:      usize,
    /// Parts discarded (unusable, or cut by `FirstPartOnly`).
    pub dropped_parts: usize,
    /// Edges whose endpoints snapped to the same node.
    pub self_loops:    usize,
    /// Records rejected as degenerate.
    pub skipped:       usize,
    /// First [`SKIPPED_SAMPLE_LIMIT`] rejected records.
    pub skipped_sample: Vec<SkippedStreet>,
}

/// A successfully built graph together with its build summary.
#[derive(Debug)]
pub struct Built {
    pub graph:  NetworkGraph,
    pub report: BuildReport,
}

/// One-shot batch builder.
///
/// ```
/// use sn_core::PlanarPoint;
/// use sn_spatial::{StreetRecord, TopologyBuilder};
///
/// let streets = vec![
///     StreetRecord::line(1, vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(10.0, 0.0)]),
///     StreetRecord::line(2, vec![PlanarPoint::new(10.4, 0.0), PlanarPoint::new(10.0, 8.0)]),
/// ];
/// let built = TopologyBuilder::new(1.0).build(&streets).unwrap();
/// assert_eq!(built.graph.node_count(), 3); // (10,0) and (10.4,0) share a node
/// ```
#[derive(Clone, Debug)]
pub struct TopologyBuilder {
    tolerance: f64,
    policy:    MultiPartPolicy,
}

impl TopologyBuilder {
    /// Builder with the given snapping tolerance and the default
    /// [`MultiPartPolicy::SplitParts`].
    pub fn new(snapping_tolerance: f64) -> Self {
        Self { tolerance: snapping_tolerance, policy: MultiPartPolicy::default() }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self { tolerance: config.snapping_tolerance, policy: config.multipart }
    }

    pub fn multipart(mut self, policy: MultiPartPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Build a graph from `records`.
    pub fn build(&self, records: &[StreetRecord]) -> SpatialResult<Built> {
        let repaired = self.repair_all(records);

        let mut report = BuildReport { streets_in: records.len(), ..BuildReport::default() };
        let mut builder = NetworkGraphBuilder::new();

        for (record, outcome) in records.iter().zip(repaired) {
            let Repaired { parts, modified, dropped_parts } = match outcome {
                Ok(r) => r,
                Err(SpatialError::DegenerateGeometry { street, points }) => {
                    warn!(street = street.0, points, "skipping degenerate street geometry");
                    report.skipped += 1;
                    if report.skipped_sample.len() < SKIPPED_SAMPLE_LIMIT {
                        report.skipped_sample.push(SkippedStreet { street, points });
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            report.streets_used += 1;
            report.repaired += usize::from(modified);
            report.dropped_parts += dropped_parts;
            if dropped_parts > 0 {
                debug!(street = record.id.0, dropped_parts, "street parts discarded");
            }

            for part in parts {
                let source = builder.snap_node(part.first(), self.tolerance);
                let target = builder.snap_node(part.last(), self.tolerance);
                if source == target {
                    report.self_loops += 1;
                }
                builder.add_edge(source, target, part)?;
            }
        }

        if builder.edge_count() == 0 {
            return Err(SpatialError::EmptyInput { skipped: report.skipped });
        }

        let graph = builder.build();
        report.nodes_out = graph.node_count();
        report.edges_out = graph.edge_count();

        info!(
            streets = report.streets_in,
            nodes = report.nodes_out,
            edges = report.edges_out,
            skipped = report.skipped,
            repaired = report.repaired,
            self_loops = report.self_loops,
            "street topology built"
        );

        Ok(Built { graph, report })
    }

    #[cfg(not(feature = "parallel"))]
    fn repair_all(&self, records: &[StreetRecord]) -> Vec<SpatialResult<Repaired>> {
        records.iter().map(|r| repair(r, self.policy)).collect()
    }

    #[cfg(feature = "parallel")]
    fn repair_all(&self, records: &[StreetRecord]) -> Vec<SpatialResult<Repaired>> {
        use rayon::prelude::*;
        // Indexed collect keeps input order, which snapping depends on.
        records.par_iter().map(|r| repair(r, self.policy)).collect()
    }
}
