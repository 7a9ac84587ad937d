//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The service calls routing through the [`Router`] trait, so applications
//! can swap in A* or contraction hierarchies without touching the rest of
//! the stack.  [`DijkstraRouter`] is the default.
//!
//! # Determinism
//!
//! When several paths share the minimum cost the result is fixed by:
//!
//! 1. heap order — entries pop by ascending `(cost, NodeId)`, so among equal
//!    costs the lowest node id is settled first;
//! 2. adjacency order — each node's traversals are scanned in
//!    `(to, edge, reversed)` order;
//! 3. strict relaxation — a node's predecessor changes only on a strictly
//!    smaller cost, so the first predecessor to reach the minimum keeps it.
//!
//! # Preconditions
//!
//! Edge costs are non-negative; [`NetworkGraphBuilder`](crate::NetworkGraphBuilder)
//! refuses anything else.  Self-loops therefore never improve a distance and
//! need no special casing.
//!
//! All working state (distance table, heap, predecessors) is local to one
//! call, so a router can be shared across threads freely.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use sn_core::{EdgeId, NodeId, PlanarPoint, StreetId};

use crate::network::{NetworkGraph, Traversal};
use crate::{SpatialError, SpatialResult};

// ── Path ─────────────────────────────────────────────────────────────────────

/// One edge traversed in a path, in travel direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathStep {
    pub edge:     EdgeId,
    pub from:     NodeId,
    pub to:       NodeId,
    /// `true` when the edge was walked against its geometry order.
    pub reversed: bool,
    pub cost:     f64,
}

/// The result of a shortest-path query.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub start:      NodeId,
    pub end:        NodeId,
    /// Edges to traverse in order, from `start` to `end`.
    pub steps:      Vec<PathStep>,
    pub total_cost: f64,
}

impl Path {
    /// `true` if start and end are the same node (no edges, zero cost).
    pub fn is_trivial(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.steps.iter().map(|s| s.edge).collect()
    }

    /// Source-data street ids along the path.  A street split into several
    /// parts may appear more than once.
    pub fn street_ids(&self, graph: &NetworkGraph) -> Vec<StreetId> {
        self.steps.iter().map(|s| graph.edges[s.edge.index()].street()).collect()
    }

    /// Nodes visited, `start` first and `end` last.
    pub fn node_path(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.steps.len() + 1);
        nodes.push(self.start);
        nodes.extend(self.steps.iter().map(|s| s.to));
        nodes
    }

    /// Per-edge polylines, each oriented in travel direction.
    pub fn geometry(&self, graph: &NetworkGraph) -> Vec<Vec<PlanarPoint>> {
        self.steps
            .iter()
            .map(|s| {
                let mut line = graph.edges[s.edge.index()].geometry.polyline.clone();
                if s.reversed {
                    line.reverse();
                }
                line
            })
            .collect()
    }

    /// All edge polylines joined into one, dropping the repeated vertex
    /// where consecutive edges meet exactly.
    pub fn merged_geometry(&self, graph: &NetworkGraph) -> Vec<PlanarPoint> {
        let mut out: Vec<PlanarPoint> = Vec::new();
        for line in self.geometry(graph) {
            let skip = usize::from(out.last().is_some() && out.last() == line.first());
            out.extend_from_slice(&line[skip..]);
        }
        out
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; one router instance serves every
/// concurrent query.
pub trait Router: Send + Sync {
    /// Compute the cheapest path from `from` to `to`.
    ///
    /// - `from == to` → `Ok` with an empty, zero-cost path.
    /// - unknown id → [`SpatialError::NodeNotFound`].
    /// - unreachable → [`SpatialError::NoPathFound`].
    fn shortest_path(&self, graph: &NetworkGraph, from: NodeId, to: NodeId) -> SpatialResult<Path>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-source Dijkstra, stopping as soon as the target is settled.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn shortest_path(&self, graph: &NetworkGraph, from: NodeId, to: NodeId) -> SpatialResult<Path> {
        dijkstra(graph, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry.  `Ord` is reversed so `BinaryHeap` pops the smallest
/// `(cost, node)` first.
#[derive(Copy, Clone, Debug)]
struct State {
    cost: f64,
    node: NodeId,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

fn dijkstra(graph: &NetworkGraph, from: NodeId, to: NodeId) -> SpatialResult<Path> {
    for n in [from, to] {
        if !graph.contains_node(n) {
            return Err(SpatialError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Path { start: from, end: to, steps: Vec::new(), total_cost: 0.0 });
    }

    let n = graph.node_count();
    // dist[v] = best known cost to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = traversal that reached v.
    let mut prev: Vec<Option<Traversal>> = vec![None; n];

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for t in graph.neighbors(node)? {
            let next = cost + graph.edges[t.edge.index()].cost;
            if next < dist[t.to.index()] {
                dist[t.to.index()] = next;
                prev[t.to.index()] = Some(*t);
                heap.push(State { cost: next, node: t.to });
            }
        }
    }

    Err(SpatialError::NoPathFound { from, to })
}

fn reconstruct(
    graph: &NetworkGraph,
    prev: &[Option<Traversal>],
    from: NodeId,
    to: NodeId,
    total_cost: f64,
) -> Path {
    let mut steps = Vec::new();
    let mut cur = to;
    while cur != from {
        // Every settled node other than `from` has a predecessor.
        let Some(t) = prev[cur.index()] else { break };
        steps.push(PathStep {
            edge:     t.edge,
            from:     t.from,
            to:       t.to,
            reversed: t.reversed,
            cost:     graph.edges[t.edge.index()].cost,
        });
        cur = t.from;
    }
    steps.reverse();
    Path { start: from, end: to, steps, total_cost }
}
