//! Post-build network diagnostics.
//!
//! Flags the usual data-quality problems of street centreline datasets:
//!
//! | Finding          | Meaning                                                    |
//! |------------------|------------------------------------------------------------|
//! | dead end         | node with exactly one edge end                             |
//! | isolated edge    | edge whose two (distinct) endpoints are both dead ends     |
//! | ring             | self-loop edge (both ends snapped to one node)             |
//! | potential gap    | dead end within tolerance of an edge it is not part of     |
//! | components       | number of connected components                             |
//!
//! A potential gap usually means a street was digitised to touch another
//! one mid-segment, where endpoint snapping cannot join them.

use std::collections::BTreeSet;

use sn_core::{EdgeId, NodeId};

use crate::index::SegmentIndex;
use crate::network::NetworkGraph;

/// Diagnostics for one network.  All lists are sorted by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphAnalysis {
    pub dead_ends:      Vec<NodeId>,
    pub isolated_edges: Vec<EdgeId>,
    pub rings:          Vec<EdgeId>,
    pub potential_gaps: Vec<NodeId>,
    pub components:     usize,
}

/// Analyse `graph`; `segments` must have been built from the same graph.
pub fn analyze(graph: &NetworkGraph, segments: &SegmentIndex, tolerance: f64) -> GraphAnalysis {
    let degree = |n: NodeId| graph.degree(n).unwrap_or(0);

    let dead_ends: Vec<NodeId> = (0..graph.node_count() as u32)
        .map(NodeId)
        .filter(|&n| degree(n) == 1)
        .collect();

    let mut isolated_edges = Vec::new();
    let mut rings = Vec::new();
    for (i, e) in graph.edges.iter().enumerate() {
        let id = EdgeId(i as u32);
        if e.is_loop() {
            rings.push(id);
        } else if degree(e.source) == 1 && degree(e.target) == 1 {
            isolated_edges.push(id);
        }
    }

    let potential_gaps = dead_ends
        .iter()
        .copied()
        .filter(|&n| {
            let incident: BTreeSet<EdgeId> = graph
                .neighbors(n)
                .map(|ts| ts.iter().map(|t| t.edge).collect())
                .unwrap_or_default();
            segments
                .edges_within(graph.node_pos[n.index()], tolerance)
                .iter()
                .any(|e| !incident.contains(e))
        })
        .collect();

    GraphAnalysis {
        dead_ends,
        isolated_edges,
        rings,
        potential_gaps,
        components: count_components(graph),
    }
}

/// Union-find over edge endpoints.
fn count_components(graph: &NetworkGraph) -> usize {
    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    let mut parent: Vec<usize> = (0..graph.node_count()).collect();
    let mut components = graph.node_count();
    for e in &graph.edges {
        let a = find(&mut parent, e.source.index());
        let b = find(&mut parent, e.target.index());
        if a != b {
            parent[a.max(b)] = a.min(b);
            components -= 1;
        }
    }
    components
}
