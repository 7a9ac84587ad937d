//! Unit tests for sn-spatial.
//!
//! All tests use hand-crafted street sets in projected metres.

#[cfg(test)]
mod helpers {
    use sn_core::PlanarPoint;

    use crate::{Built, StreetRecord, TopologyBuilder};

    pub fn p(x: f64, y: f64) -> PlanarPoint {
        PlanarPoint::new(x, y)
    }

    pub fn line(id: i64, pts: &[(f64, f64)]) -> StreetRecord {
        StreetRecord::line(id, pts.iter().map(|&(x, y)| p(x, y)).collect())
    }

    pub fn build(records: &[StreetRecord]) -> Built {
        TopologyBuilder::new(1.0).build(records).unwrap()
    }

    /// A(0,0)=N0, B(3,0)=N1, C(3,4)=N2.
    /// Edges: 0 = AB (street 1, cost 3), 1 = BC (street 2, cost 4),
    /// 2 = AC (street 3, cost 5).
    pub fn triangle() -> Vec<StreetRecord> {
        vec![
            line(1, &[(0.0, 0.0), (3.0, 0.0)]),
            line(2, &[(3.0, 0.0), (3.0, 4.0)]),
            line(3, &[(0.0, 0.0), (3.0, 4.0)]),
        ]
    }

    /// N0(0,0) ─10─ N1(10,0) ─10─ N2(20,0) ─10─ N3(20,10)
    ///  └──────────── 110 (via (0,50), (20,50)) ──────┘
    pub fn detour() -> Vec<StreetRecord> {
        vec![
            line(10, &[(0.0, 0.0), (10.0, 0.0)]),
            line(11, &[(10.0, 0.0), (20.0, 0.0)]),
            line(12, &[(20.0, 0.0), (20.0, 10.0)]),
            line(13, &[(0.0, 0.0), (0.0, 50.0), (20.0, 50.0), (20.0, 10.0)]),
        ]
    }
}

// ── Geometry repair ──────────────────────────────────────────────────────────

#[cfg(test)]
mod geometry {
    use sn_core::{MultiPartPolicy, StreetId};

    use super::helpers::p;
    use crate::geometry::repair;
    use crate::{RawGeometry, SpatialError, StreetRecord};

    #[test]
    fn drops_non_finite_and_duplicate_vertices() {
        let rec = StreetRecord::line(1, vec![p(0.0, 0.0), p(0.0, 0.0), p(f64::NAN, 1.0), p(2.0, 0.0)]);
        let r = repair(&rec, MultiPartPolicy::SplitParts).unwrap();
        assert!(r.modified);
        assert_eq!(r.parts.len(), 1);
        assert_eq!(r.parts[0].polyline, vec![p(0.0, 0.0), p(2.0, 0.0)]);
        assert_eq!(r.parts[0].length, 2.0);
    }

    #[test]
    fn clean_line_is_untouched() {
        let rec = StreetRecord::line(1, vec![p(0.0, 0.0), p(5.0, 5.0), p(0.0, 5.0), p(5.0, 0.0)]);
        let r = repair(&rec, MultiPartPolicy::SplitParts).unwrap();
        // Self-intersecting but a valid street.
        assert!(!r.modified);
        assert_eq!(r.parts[0].polyline.len(), 4);
    }

    #[test]
    fn single_point_is_degenerate() {
        let rec = StreetRecord::line(7, vec![p(1.0, 1.0)]);
        let err = repair(&rec, MultiPartPolicy::SplitParts).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::DegenerateGeometry { street: StreetId(7), points: 1 }
        ));
    }

    #[test]
    fn overflowing_length_is_degenerate() {
        let rec = StreetRecord::line(8, vec![p(-1.0e308, 0.0), p(1.0e308, 0.0)]);
        let err = repair(&rec, MultiPartPolicy::SplitParts).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::DegenerateGeometry { street: StreetId(8), points: 2 }
        ));
    }

    #[test]
    fn split_parts_keeps_every_usable_part() {
        let rec = StreetRecord {
            id:       StreetId(3),
            geometry: RawGeometry::MultiLineString(vec![
                vec![p(0.0, 0.0), p(1.0, 0.0)],
                vec![p(5.0, 5.0)],
                vec![p(2.0, 0.0), p(4.0, 0.0)],
            ]),
        };
        let r = repair(&rec, MultiPartPolicy::SplitParts).unwrap();
        assert_eq!(r.parts.len(), 2);
        assert_eq!(r.parts[0].part, 0);
        assert_eq!(r.parts[1].part, 2);
        assert_eq!(r.dropped_parts, 1);
    }

    #[test]
    fn first_part_only_discards_the_rest() {
        let rec = StreetRecord {
            id:       StreetId(3),
            geometry: RawGeometry::MultiLineString(vec![
                vec![p(0.0, 0.0), p(1.0, 0.0)],
                vec![p(2.0, 0.0), p(4.0, 0.0)],
                vec![p(6.0, 0.0), p(8.0, 0.0)],
            ]),
        };
        let r = repair(&rec, MultiPartPolicy::FirstPartOnly).unwrap();
        assert_eq!(r.parts.len(), 1);
        assert_eq!(r.dropped_parts, 2);
    }

    #[test]
    fn first_part_only_with_bad_first_part_is_degenerate() {
        let rec = StreetRecord {
            id:       StreetId(4),
            geometry: RawGeometry::MultiLineString(vec![
                vec![p(0.0, 0.0)],
                vec![p(2.0, 0.0), p(4.0, 0.0)],
            ]),
        };
        assert!(repair(&rec, MultiPartPolicy::FirstPartOnly).is_err());
    }
}

// ── Spatial indexes ──────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use std::collections::BTreeSet;

    use sn_core::{EdgeId, NodeId};

    use super::helpers::{build, p, triangle};
    use crate::{SegmentIndex, SpatialIndex};

    fn three_points() -> SpatialIndex<u32> {
        let mut idx = SpatialIndex::new();
        idx.insert(5, p(1.0, 0.0));
        idx.insert(2, p(-1.0, 0.0));
        idx.insert(9, p(0.0, 3.0));
        idx
    }

    #[test]
    fn empty_index_returns_nothing() {
        let idx: SpatialIndex<NodeId> = SpatialIndex::new();
        assert!(idx.is_empty());
        assert!(idx.nearest(p(0.0, 0.0), 3).is_empty());
        assert!(idx.within_radius(p(0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn nearest_orders_by_distance_then_id() {
        let idx = three_points();
        assert_eq!(idx.nearest(p(0.0, 0.0), 1), vec![(2, 1.0)]);
        assert_eq!(idx.nearest(p(0.0, 0.0), 2), vec![(2, 1.0), (5, 1.0)]);
        assert_eq!(idx.nearest(p(0.0, 0.0), 10), vec![(2, 1.0), (5, 1.0), (9, 3.0)]);
        assert!(idx.nearest(p(0.0, 0.0), 0).is_empty());
    }

    #[test]
    fn within_radius_is_inclusive() {
        let idx = three_points();
        assert_eq!(idx.within_radius(p(0.0, 0.0), 1.0), BTreeSet::from([2, 5]));
        assert!(idx.within_radius(p(0.0, 0.0), 0.5).is_empty());
    }

    #[test]
    fn non_finite_query_matches_nothing() {
        let idx = three_points();
        assert!(idx.nearest(p(f64::NAN, 0.0), 1).is_empty());
        assert!(idx.within_radius(p(0.0, f64::INFINITY), 5.0).is_empty());
    }

    #[test]
    fn bulk_load_matches_incremental() {
        let idx = SpatialIndex::bulk_load([(5u32, p(1.0, 0.0)), (2, p(-1.0, 0.0)), (9, p(0.0, 3.0))]);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.nearest(p(0.0, 0.0), 2), three_points().nearest(p(0.0, 0.0), 2));
    }

    #[test]
    fn every_node_is_its_own_nearest() {
        let built = build(&triangle());
        for (i, &pos) in built.graph.node_pos.iter().enumerate() {
            let hit = built.graph.spatial_index().nearest(pos, 1);
            assert_eq!(hit, vec![(NodeId(i as u32), 0.0)]);
        }
    }

    #[test]
    fn segment_index_finds_nearest_street() {
        let built = build(&triangle());
        let segs = SegmentIndex::from_graph(&built.graph);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs.nearest_edge(p(1.5, -0.5)), Some((EdgeId(0), 0.5)));
        assert_eq!(segs.nearest_edge(p(3.0, 2.0)), Some((EdgeId(1), 0.0)));
        // (3,0) touches AB and BC: lowest id wins.
        assert_eq!(segs.nearest_edge(p(3.0, 0.0)).map(|h| h.0), Some(EdgeId(0)));
        assert_eq!(segs.edges_within(p(3.0, 0.0), 0.1), BTreeSet::from([EdgeId(0), EdgeId(1)]));
    }
}

// ── Network graph ────────────────────────────────────────────────────────────

#[cfg(test)]
mod network {
    use sn_core::{EdgeId, NodeId, StreetId};

    use super::helpers::{build, p, triangle};
    use crate::{NetworkGraph, NetworkGraphBuilder, SpatialError, StreetGeometry};

    fn geom(id: i64) -> StreetGeometry {
        StreetGeometry::new(StreetId(id), 0, vec![p(0.0, 0.0), p(1.0, 0.0)])
    }

    #[test]
    fn empty_build() {
        let net = NetworkGraph::empty();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
        assert!(net.nearest_node(p(0.0, 0.0)).is_none());
    }

    #[test]
    fn edge_to_unknown_node_rejected() {
        let mut b = NetworkGraphBuilder::new();
        let a = b.add_node(p(0.0, 0.0));
        let err = b.add_edge(a, NodeId(9), geom(1)).unwrap_err();
        assert!(matches!(err, SpatialError::NodeNotFound(NodeId(9))));
    }

    #[test]
    fn negative_or_nan_cost_rejected() {
        let mut b = NetworkGraphBuilder::new();
        let a = b.add_node(p(0.0, 0.0));
        let c = b.add_node(p(1.0, 0.0));
        assert!(matches!(
            b.add_edge_with_cost(a, c, -1.0, geom(1)),
            Err(SpatialError::InvalidCost(_))
        ));
        assert!(b.add_edge_with_cost(a, c, f64::NAN, geom(1)).is_err());
        assert!(b.add_edge_with_cost(a, c, 0.0, geom(1)).is_ok());
    }

    #[test]
    fn neighbors_are_sorted_and_bidirectional() {
        let net = build(&triangle()).graph;
        let a: Vec<_> = net.neighbors(NodeId(0)).unwrap().iter().map(|t| (t.to, t.edge, t.reversed)).collect();
        assert_eq!(a, vec![(NodeId(1), EdgeId(0), false), (NodeId(2), EdgeId(2), false)]);

        let c: Vec<_> = net.neighbors(NodeId(2)).unwrap().iter().map(|t| (t.to, t.edge, t.reversed)).collect();
        assert_eq!(c, vec![(NodeId(0), EdgeId(2), true), (NodeId(1), EdgeId(1), true)]);

        for t in net.neighbors(NodeId(1)).unwrap() {
            assert_eq!(t.from, NodeId(1));
        }
    }

    #[test]
    fn neighbors_of_unknown_node_fail() {
        let net = build(&triangle()).graph;
        assert!(matches!(net.neighbors(NodeId(3)), Err(SpatialError::NodeNotFound(NodeId(3)))));
        assert!(net.node(NodeId(3)).is_err());
    }

    #[test]
    fn self_loop_counts_twice_in_degree() {
        let mut b = NetworkGraphBuilder::new();
        let a = b.add_node(p(0.0, 0.0));
        b.add_edge(a, a, geom(1)).unwrap();
        let net = b.build();
        assert_eq!(net.degree(a).unwrap(), 2);
        assert!(net.edges[0].is_loop());
    }

    #[test]
    fn nearest_node_snaps_query_points() {
        let net = build(&triangle()).graph;
        assert_eq!(net.nearest_node(p(0.4, 0.1)).map(|h| h.0), Some(NodeId(0)));
        assert_eq!(net.nearest_node(p(2.9, 3.5)).map(|h| h.0), Some(NodeId(2)));
        let two: Vec<NodeId> = net.nearest_nodes(p(3.0, 0.0), 2).into_iter().map(|h| h.0).collect();
        assert_eq!(two, vec![NodeId(1), NodeId(0)]);
    }
}

// ── Topology construction ────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use proptest::prelude::*;
    use sn_core::{MultiPartPolicy, NetworkConfig, NodeId, StreetId};

    use super::helpers::{build, line, p, triangle};
    use crate::{RawGeometry, SkippedStreet, SpatialError, StreetRecord, TopologyBuilder};

    #[test]
    fn triangle_has_three_nodes_and_costed_edges() {
        let built = build(&triangle());
        assert_eq!(built.graph.node_count(), 3);
        let costs: Vec<f64> = built.graph.edges.iter().map(|e| e.cost).collect();
        assert_eq!(costs, vec![3.0, 4.0, 5.0]);
        assert_eq!(built.report.edges_out, 3);
        assert_eq!(built.report.nodes_out, 3);
        assert_eq!(built.report.skipped, 0);
    }

    #[test]
    fn close_endpoints_share_a_node() {
        let built = build(&[
            line(1, &[(0.0, 0.0), (10.0, 0.0)]),
            line(2, &[(10.5, 0.0), (20.0, 0.0)]),
            line(3, &[(21.5, 0.0), (30.0, 0.0)]),
        ]);
        let e = &built.graph.edges;
        assert_eq!(e[0].target, e[1].source);
        assert_ne!(e[1].target, e[2].source); // 1.5 apart
        assert_eq!(built.graph.node_count(), 5);
    }

    #[test]
    fn equidistant_snap_goes_to_lowest_id() {
        let built = build(&[
            line(1, &[(0.0, 0.0), (0.0, 10.0)]),     // N0, N1
            line(2, &[(1.5, 0.0), (1.5, 10.0)]),     // N2, N3
            line(3, &[(0.75, 0.0), (0.75, -10.0)]),  // tie N0/N2 → N0
            line(4, &[(1.0, 0.0), (1.0, -20.0)]),    // 1.0 from N0, 0.5 from N2 → N2
        ]);
        let e = &built.graph.edges;
        assert_eq!(e[2].source, NodeId(0));
        assert_eq!(e[3].source, NodeId(2));
    }

    #[test]
    fn degenerate_record_is_skipped_not_fatal() {
        let built = build(&[
            line(1, &[(0.0, 0.0), (10.0, 0.0)]),
            line(2, &[(5.0, 5.0)]),
        ]);
        assert_eq!(built.graph.edge_count(), 1);
        assert_eq!(built.report.skipped, 1);
        assert_eq!(built.report.skipped_sample, vec![SkippedStreet { street: StreetId(2), points: 1 }]);
    }

    #[test]
    fn infinite_length_record_is_skipped() {
        let built = build(&[
            line(1, &[(0.0, 0.0), (10.0, 0.0)]),
            line(2, &[(-1.0e308, 0.0), (1.0e308, 0.0)]),
        ]);
        assert_eq!(built.graph.edge_count(), 1);
        assert_eq!(built.report.skipped, 1);
        assert_eq!(built.report.skipped_sample, vec![SkippedStreet { street: StreetId(2), points: 2 }]);
    }

    #[test]
    fn snapping_targets_existing_nodes_not_chains() {
        let tol = 1.0;
        let built = TopologyBuilder::new(tol)
            .build(&[
                line(1, &[(0.0, 0.0), (0.0, 50.0)]),   // N0, N1
                line(2, &[(0.9, 0.0), (0.9, -50.0)]),  // 0.9 from N0 → N0, N2
                line(3, &[(1.7, 0.0), (1.7, 50.0)]),   // 1.7 from N0 → N3, N4
            ])
            .unwrap();
        let e = &built.graph.edges;
        assert_eq!(e[1].source, NodeId(0));
        // 0.8 from the second street's endpoint, but that endpoint never
        // became a node of its own.
        assert_eq!(e[2].source, NodeId(3));
        assert_eq!(built.graph.node_count(), 5);

        // Each endpoint still lies within tolerance of the node it joined.
        let ends = [(0.0, 0.0), (0.9, 0.0), (1.7, 0.0)];
        for (edge, (x, y)) in e.iter().zip(ends) {
            let node = built.graph.node_pos[edge.source.index()];
            assert!(node.distance(p(x, y)) <= tol);
        }
    }

    #[test]
    fn nothing_usable_is_empty_input() {
        let err = TopologyBuilder::new(1.0)
            .build(&[line(1, &[(0.0, 0.0)]), line(2, &[])])
            .unwrap_err();
        assert!(matches!(err, SpatialError::EmptyInput { skipped: 2 }));

        let err = TopologyBuilder::new(1.0).build(&[]).unwrap_err();
        assert!(matches!(err, SpatialError::EmptyInput { skipped: 0 }));
    }

    #[test]
    fn loop_is_kept_as_self_loop() {
        let built = build(&[line(1, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.5, 0.0)])]);
        assert_eq!(built.graph.node_count(), 1);
        assert!(built.graph.edges[0].is_loop());
        assert_eq!(built.report.self_loops, 1);
    }

    #[test]
    fn multi_part_street_becomes_several_edges() {
        let rec = StreetRecord {
            id:       StreetId(40),
            geometry: RawGeometry::MultiLineString(vec![
                vec![p(0.0, 0.0), p(10.0, 0.0)],
                vec![p(50.0, 0.0), p(60.0, 0.0)],
            ]),
        };
        let built = build(std::slice::from_ref(&rec));
        assert_eq!(built.graph.edge_count(), 2);
        assert!(built.graph.edges.iter().all(|e| e.street() == StreetId(40)));

        let lossy = TopologyBuilder::new(1.0)
            .multipart(MultiPartPolicy::FirstPartOnly)
            .build(&[rec])
            .unwrap();
        assert_eq!(lossy.graph.edge_count(), 1);
        assert_eq!(lossy.report.dropped_parts, 1);
    }

    #[test]
    fn from_config_uses_tolerance() {
        let config = NetworkConfig { snapping_tolerance: 5.0, ..NetworkConfig::default() };
        let built = TopologyBuilder::from_config(&config)
            .build(&[line(1, &[(0.0, 0.0), (10.0, 0.0)]), line(2, &[(14.0, 0.0), (30.0, 0.0)])])
            .unwrap();
        assert_eq!(built.graph.node_count(), 3);
    }

    #[test]
    fn rebuild_is_isomorphic() {
        let a = build(&triangle());
        let b = build(&triangle());
        assert_eq!(a.graph.node_count(), b.graph.node_count());
        assert_eq!(a.graph.node_pos, b.graph.node_pos);
        assert_eq!(a.graph.edges, b.graph.edges);
        assert_eq!(a.report, b.report);
    }

    proptest! {
        #[test]
        fn endpoints_closer_than_tolerance_snap_together(
            tol in 0.1f64..10.0,
            x in -1.0e5f64..1.0e5,
            y in -1.0e5f64..1.0e5,
            angle in 0.0f64..std::f64::consts::TAU,
            frac in 0.0f64..0.99,
        ) {
            let d = frac * tol;
            let qx = x + d * angle.cos();
            let qy = y + d * angle.sin();
            let built = TopologyBuilder::new(tol)
                .build(&[
                    line(1, &[(x, y), (x + 500.0, y)]),
                    line(2, &[(qx, qy), (qx, qy + 500.0)]),
                ])
                .unwrap();
            prop_assert_eq!(built.graph.edges[0].source, built.graph.edges[1].source);
        }
    }
}

// ── Dijkstra routing ─────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use sn_core::{EdgeId, NodeId, StreetId};

    use super::helpers::{build, detour, line, p, triangle};
    use crate::{DijkstraRouter, Router, SpatialError};

    #[test]
    fn same_node_is_trivial() {
        let net = build(&triangle()).graph;
        let path = DijkstraRouter.shortest_path(&net, NodeId(1), NodeId(1)).unwrap();
        assert!(path.is_trivial());
        assert_eq!(path.total_cost, 0.0);
        assert_eq!(path.node_path(), vec![NodeId(1)]);
    }

    #[test]
    fn triangle_prefers_direct_edge() {
        let net = build(&triangle()).graph;
        let path = DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(path.total_cost, 5.0);
        assert_eq!(path.edge_ids(), vec![EdgeId(2)]);
        assert_eq!(path.street_ids(&net), vec![StreetId(3)]);
        assert_eq!(path.node_path(), vec![NodeId(0), NodeId(2)]);
    }

    #[test]
    fn reverse_travel_flips_geometry() {
        let net = build(&triangle()).graph;
        let path = DijkstraRouter.shortest_path(&net, NodeId(2), NodeId(0)).unwrap();
        assert_eq!(path.total_cost, 5.0);
        assert!(path.steps[0].reversed);
        assert_eq!(path.geometry(&net), vec![vec![p(3.0, 4.0), p(0.0, 0.0)]]);
    }

    #[test]
    fn multi_edge_path_and_merged_geometry() {
        let net = build(&detour()).graph;
        let path = DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(3)).unwrap();
        assert_eq!(path.total_cost, 30.0);
        assert_eq!(path.node_path(), vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(path.edge_ids(), vec![EdgeId(0), EdgeId(1), EdgeId(2)]);
        assert_eq!(
            path.merged_geometry(&net),
            vec![p(0.0, 0.0), p(10.0, 0.0), p(20.0, 0.0), p(20.0, 10.0)]
        );
        let step_sum: f64 = path.steps.iter().map(|s| s.cost).sum();
        assert_eq!(step_sum, path.total_cost);
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let net = build(&[
            line(1, &[(0.0, 0.0), (10.0, 0.0)]),
            line(2, &[(100.0, 0.0), (110.0, 0.0)]),
        ])
        .graph;
        let err = DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(3)).unwrap_err();
        assert!(matches!(err, SpatialError::NoPathFound { from: NodeId(0), to: NodeId(3) }));
    }

    #[test]
    fn unknown_node_is_reported() {
        let net = build(&triangle()).graph;
        let err = DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(42)).unwrap_err();
        assert!(matches!(err, SpatialError::NodeNotFound(NodeId(42))));
        // Checked even when start == end.
        assert!(DijkstraRouter.shortest_path(&net, NodeId(42), NodeId(42)).is_err());
    }

    #[test]
    fn self_loop_never_shortens_a_path() {
        let mut streets = triangle();
        streets.push(line(9, &[(0.0, 0.0), (-5.0, 0.0), (-5.0, -5.0), (0.0, 0.0)]));
        let net = build(&streets).graph;
        let path = DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(path.edge_ids(), vec![EdgeId(2)]);
        assert_eq!(path.total_cost, 5.0);
    }

    #[test]
    fn equal_cost_tie_is_reproducible() {
        // Square A(0,0) B(10,0) C(10,10) D(0,10): A→B→C and A→D→C both cost 20.
        let net = build(&[
            line(1, &[(0.0, 0.0), (10.0, 0.0)]),   // A=N0, B=N1
            line(2, &[(10.0, 0.0), (10.0, 10.0)]), // C=N2
            line(3, &[(0.0, 0.0), (0.0, 10.0)]),   // D=N3
            line(4, &[(0.0, 10.0), (10.0, 10.0)]),
        ])
        .graph;
        let first = DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(2)).unwrap();
        assert_eq!(first.total_cost, 20.0);
        // B has the lower id, so it settles first and claims C.
        assert_eq!(first.node_path(), vec![NodeId(0), NodeId(1), NodeId(2)]);
        for _ in 0..5 {
            assert_eq!(DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(2)).unwrap(), first);
        }
    }

    #[test]
    fn concurrent_queries_share_one_graph() {
        let net = build(&detour()).graph;
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| DijkstraRouter.shortest_path(&net, NodeId(0), NodeId(3)).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap().total_cost, 30.0);
            }
        });
    }
}

// ── Graph analysis ───────────────────────────────────────────────────────────

#[cfg(test)]
mod analysis {
    use sn_core::{EdgeId, NodeId};

    use super::helpers::{build, line, triangle};
    use crate::{analyze, SegmentIndex};

    #[test]
    fn closed_triangle_is_clean() {
        let net = build(&triangle()).graph;
        let a = analyze(&net, &SegmentIndex::from_graph(&net), 1.0);
        assert!(a.dead_ends.is_empty());
        assert!(a.isolated_edges.is_empty());
        assert!(a.rings.is_empty());
        assert!(a.potential_gaps.is_empty());
        assert_eq!(a.components, 1);
    }

    #[test]
    fn side_street_touching_mid_segment_is_a_gap() {
        let net = build(&[
            line(1, &[(0.0, 0.0), (20.0, 0.0)]),   // N0, N1
            line(2, &[(10.0, 0.5), (10.0, 10.0)]), // N2, N3
        ])
        .graph;
        let a = analyze(&net, &SegmentIndex::from_graph(&net), 1.0);
        assert_eq!(a.dead_ends, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(a.isolated_edges, vec![EdgeId(0), EdgeId(1)]);
        assert_eq!(a.potential_gaps, vec![NodeId(2)]);
        assert_eq!(a.components, 2);
    }

    #[test]
    fn loop_is_reported_as_ring() {
        let net = build(&[line(1, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)])]).graph;
        let a = analyze(&net, &SegmentIndex::from_graph(&net), 1.0);
        assert_eq!(a.rings, vec![EdgeId(0)]);
        assert!(a.dead_ends.is_empty());
        assert_eq!(a.components, 1);
    }
}

// ── GeoJSON loading ──────────────────────────────────────────────────────────

#[cfg(all(test, feature = "geojson"))]
mod geojson {
    use std::io::{Cursor, Write};

    use sn_core::{StreetId, TransverseMercator};

    use crate::geojson::{load_streets_path, load_streets_reader, StreetSource};
    use crate::{RawGeometry, SpatialError, TopologyBuilder};

    const STREETS: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        { "type": "Feature", "properties": { "OBJECTID": 11 },
          "geometry": { "type": "LineString", "coordinates": [[0, 0], [10, 0, 3.5]] } },
        { "type": "Feature", "properties": { "OBJECTID": "12" },
          "geometry": { "type": "MultiLineString", "coordinates": [[[10, 0], [10, 10]], [[30, 0], [40, 0]]] } },
        { "type": "Feature", "properties": { "OBJECTID": 13 }, "geometry": null },
        { "type": "Feature", "properties": { "OBJECTID": 14.0 },
          "geometry": { "type": "Point", "coordinates": [5, 5] } },
        { "type": "Feature", "id": 99, "properties": null,
          "geometry": { "type": "LineString", "coordinates": [[10, 10], [20, 10]] } }
      ]
    }"#;

    #[test]
    fn loads_ids_and_geometries() {
        let recs = load_streets_reader(Cursor::new(STREETS), &StreetSource::default()).unwrap();
        let ids: Vec<StreetId> = recs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![StreetId(11), StreetId(12), StreetId(13), StreetId(14), StreetId(99)]);
        assert!(matches!(&recs[1].geometry, RawGeometry::MultiLineString(parts) if parts.len() == 2));
        assert_eq!(recs[2].geometry, RawGeometry::empty());
        assert_eq!(recs[3].geometry, RawGeometry::empty());
    }

    #[test]
    fn unusable_features_surface_as_skipped() {
        let recs = load_streets_reader(Cursor::new(STREETS), &StreetSource::default()).unwrap();
        let built = TopologyBuilder::new(1.0).build(&recs).unwrap();
        assert_eq!(built.report.skipped, 2);
        assert_eq!(built.graph.edge_count(), 4);
    }

    #[test]
    fn rejects_non_collection() {
        let err = load_streets_reader(
            Cursor::new(r#"{ "type": "Feature", "features": [] }"#),
            &StreetSource::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SpatialError::GeoJson(_)));
        assert!(load_streets_reader(Cursor::new("not json"), &StreetSource::default()).is_err());
    }

    #[test]
    fn string_feature_id_and_polygon() {
        let json = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "id": "77", "properties": {},
              "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] } },
            { "type": "Feature", "properties": { "OBJECTID": "n/a" },
              "geometry": { "type": "LineString", "coordinates": [[0, 0], [5, 0]] } }
        ] }"#;
        let recs = load_streets_reader(Cursor::new(json), &StreetSource::default()).unwrap();
        assert_eq!(recs[0].id, StreetId(77));
        assert_eq!(recs[0].geometry, RawGeometry::empty());
        // Unparsable property and no feature id: falls back to position.
        assert_eq!(recs[1].id, StreetId(1));
        assert!(matches!(&recs[1].geometry, RawGeometry::LineString(l) if l.len() == 2));
    }

    #[test]
    fn projects_geographic_input() {
        let tm = TransverseMercator::mtm_zone7();
        let source = StreetSource { projector: Some(&tm), ..StreetSource::default() };
        let json = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "OBJECTID": 1 },
              "geometry": { "type": "LineString", "coordinates": [[-71.20, 46.80], [-71.21, 46.80]] } },
            { "type": "Feature", "properties": { "OBJECTID": 2 },
              "geometry": { "type": "LineString", "coordinates": [[10.0, 46.0], [10.1, 46.0]] } }
        ] }"#;
        let recs = load_streets_reader(Cursor::new(json), &source).unwrap();
        let built = TopologyBuilder::new(1.0).build(&recs).unwrap();
        // 0.01° of longitude at 46.8°N ≈ 763 m.
        let len = built.graph.edges[0].cost;
        assert!((700.0..820.0).contains(&len), "got {len}");
        // Far outside the projection band → skipped, not fatal.
        assert_eq!(built.report.skipped, 1);
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STREETS.as_bytes()).unwrap();
        let recs = load_streets_path(file.path(), &StreetSource::default()).unwrap();
        assert_eq!(recs.len(), 5);
    }
}
