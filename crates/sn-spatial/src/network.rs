//! Street network representation and builder.
//!
//! # Data layout
//!
//! Each street part is stored once as an [`Edge`] record indexed by
//! `EdgeId`.  Streets are two-way: an edge is traversable source→target and
//! target→source at the same cost.  Both traversals are listed in a
//! **Compressed Sparse Row** adjacency array:
//!
//! ```text
//! adj[ adj_start[n] .. adj_start[n+1] ]   // traversals leaving node n
//! ```
//!
//! so [`NetworkGraph::neighbors`] is a contiguous slice, no allocation.
//! Within a node the traversals are sorted by `(to, edge, reversed)`; the
//! router relies on this fixed order for reproducible tie-breaking.
//!
//! A self-loop edge contributes two traversals to its node (one each way).
//!
//! # Spatial index
//!
//! An R-tree over node positions ([`SpatialIndex`]) answers nearest-node
//! queries.  The builder maintains it incrementally so topology construction
//! can snap against it; `build()` hands the same tree to the graph.
//!
//! # Mutability
//!
//! A built `NetworkGraph` is immutable.  Any change means building a new one.

use sn_core::{EdgeId, NodeId, PlanarPoint, StreetId};

use crate::geometry::StreetGeometry;
use crate::index::SpatialIndex;
use crate::{SpatialError, SpatialResult};

// ── Edge & Traversal ──────────────────────────────────────────────────────────

/// One street part connecting two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub source:   NodeId,
    pub target:   NodeId,
    /// Traversal cost in either direction.  Always finite and `>= 0`.
    pub cost:     f64,
    /// Polyline from `source` to `target`.
    pub geometry: StreetGeometry,
}

impl Edge {
    /// Source-data id of the street this edge was built from.
    #[inline]
    pub fn street(&self) -> StreetId {
        self.geometry.id
    }

    #[inline]
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// One direction of travel along an edge, as seen from `from`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Traversal {
    pub edge:     EdgeId,
    pub from:     NodeId,
    pub to:       NodeId,
    /// `true` when travelling target→source (against the geometry order).
    pub reversed: bool,
}

// ── NetworkGraph ──────────────────────────────────────────────────────────────

/// Undirected street graph with CSR adjacency and a node R-tree.
///
/// `node_pos` and `edges` are `pub` for direct indexed access.  Do not
/// construct directly; use [`NetworkGraphBuilder`] or
/// [`TopologyBuilder`](crate::TopologyBuilder).
#[derive(Debug)]
pub struct NetworkGraph {
    /// Projected position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<PlanarPoint>,

    /// Edge records.  Indexed by `EdgeId`.
    pub edges: Vec<Edge>,

    /// CSR row pointer.  Length = `node_count + 1`.
    adj_start: Vec<u32>,
    adj:       Vec<Traversal>,

    node_idx: SpatialIndex<NodeId>,
}

impl NetworkGraph {
    /// A graph with no nodes or edges.  Every query against it misses.
    pub fn empty() -> Self {
        NetworkGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    pub fn node(&self, node: NodeId) -> SpatialResult<PlanarPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(edge.index())
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Traversals leaving `node`, in `(to, edge, reversed)` order.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> SpatialResult<&[Traversal]> {
        if !self.contains_node(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
        let start = self.adj_start[node.index()] as usize;
        let end = self.adj_start[node.index() + 1] as usize;
        Ok(&self.adj[start..end])
    }

    /// Number of edge ends at `node`; a self-loop counts twice.
    pub fn degree(&self, node: NodeId) -> SpatialResult<usize> {
        self.neighbors(node).map(<[Traversal]>::len)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `pos` and its distance.  `None` only for an
    /// empty graph.
    pub fn nearest_node(&self, pos: PlanarPoint) -> Option<(NodeId, f64)> {
        self.node_idx.nearest(pos, 1).into_iter().next()
    }

    /// Up to `k` nearest nodes, ascending distance, ties by lowest id.
    pub fn nearest_nodes(&self, pos: PlanarPoint, k: usize) -> Vec<(NodeId, f64)> {
        self.node_idx.nearest(pos, k)
    }

    pub fn spatial_index(&self) -> &SpatialIndex<NodeId> {
        &self.node_idx
    }
}

// ── NetworkGraphBuilder ───────────────────────────────────────────────────────

/// Construct a [`NetworkGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes are numbered sequentially from 0 in insertion order and indexed
/// as they are added, so [`snap_node`](Self::snap_node) can look for an
/// existing node before allocating a new one.
///
/// # Example
///
/// ```
/// use sn_core::{PlanarPoint, StreetId};
/// use sn_spatial::{NetworkGraphBuilder, StreetGeometry};
///
/// let mut b = NetworkGraphBuilder::new();
/// let a = b.add_node(PlanarPoint::new(0.0, 0.0));
/// let c = b.add_node(PlanarPoint::new(3.0, 4.0));
/// let line = vec![PlanarPoint::new(0.0, 0.0), PlanarPoint::new(3.0, 4.0)];
/// b.add_edge(a, c, StreetGeometry::new(StreetId(7), 0, line)).unwrap();
/// let net = b.build();
/// assert_eq!(net.edge_count(), 1);
/// assert_eq!(net.edges[0].cost, 5.0);
/// ```
#[derive(Default)]
pub struct NetworkGraphBuilder {
    nodes:    Vec<PlanarPoint>,
    edges:    Vec<Edge>,
    node_idx: SpatialIndex<NodeId>,
}

impl NetworkGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: PlanarPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.node_idx.insert(id, pos);
        id
    }

    /// Return the node nearest to `pos` if it lies within `tolerance`,
    /// otherwise add a new node at `pos`.
    ///
    /// Among several nodes within tolerance the nearest wins; exact ties go
    /// to the lowest id.
    pub fn snap_node(&mut self, pos: PlanarPoint, tolerance: f64) -> NodeId {
        match self.node_idx.nearest(pos, 1).first() {
            Some(&(id, dist)) if dist <= tolerance => id,
            _ => self.add_node(pos),
        }
    }

    /// Add a two-way edge costed at the geometry's length.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        geometry: StreetGeometry,
    ) -> SpatialResult<EdgeId> {
        let cost = geometry.length;
        self.add_edge_with_cost(source, target, cost, geometry)
    }

    /// Add a two-way edge with an explicit cost.
    ///
    /// Fails on unknown nodes and on a negative or non-finite cost.
    pub fn add_edge_with_cost(
        &mut self,
        source: NodeId,
        target: NodeId,
        cost: f64,
        geometry: StreetGeometry,
    ) -> SpatialResult<EdgeId> {
        for n in [source, target] {
            if n.index() >= self.nodes.len() {
                return Err(SpatialError::NodeNotFound(n));
            }
        }
        if !(cost >= 0.0 && cost.is_finite()) {
            return Err(SpatialError::InvalidCost(cost));
        }
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge { source, target, cost, geometry });
        Ok(id)
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Option<PlanarPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Consume the builder and produce a [`NetworkGraph`].
    ///
    /// Time complexity: O(E log E) for the per-node adjacency sort.  The
    /// node R-tree is moved over as-is.
    pub fn build(self) -> NetworkGraph {
        let node_count = self.nodes.len();

        // Count traversals per node: each edge leaves its source forward and
        // its target reversed.
        let mut adj_start = vec![0u32; node_count + 1];
        for e in &self.edges {
            adj_start[e.source.index() + 1] += 1;
            adj_start[e.target.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }

        let placeholder = Traversal {
            edge:     EdgeId::INVALID,
            from:     NodeId::INVALID,
            to:       NodeId::INVALID,
            reversed: false,
        };
        let mut adj = vec![placeholder; adj_start[node_count] as usize];
        let mut cursor: Vec<u32> = adj_start[..node_count].to_vec();

        for (i, e) in self.edges.iter().enumerate() {
            let edge = EdgeId(i as u32);
            let slot = &mut cursor[e.source.index()];
            adj[*slot as usize] = Traversal { edge, from: e.source, to: e.target, reversed: false };
            *slot += 1;
            let slot = &mut cursor[e.target.index()];
            adj[*slot as usize] = Traversal { edge, from: e.target, to: e.source, reversed: true };
            *slot += 1;
        }

        for n in 0..node_count {
            let (start, end) = (adj_start[n] as usize, adj_start[n + 1] as usize);
            adj[start..end].sort_unstable_by_key(|t| (t.to, t.edge, t.reversed));
        }
        debug_assert_eq!(adj.len(), self.edges.len() * 2);

        NetworkGraph {
            node_pos: self.nodes,
            edges: self.edges,
            adj_start,
            adj,
            node_idx: self.node_idx,
        }
    }
}
