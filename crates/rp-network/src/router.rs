//! Routing traits and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The planner calls routing through the [`Router`] trait and prices edges
//! through the [`EdgeWeight`] trait, so either can be swapped (A*, a
//! different cost model) without touching the planning loop.
//!
//! # Cost units
//!
//! Costs are `f64` in whatever unit the weight function produces.  Weights
//! must be finite and non-negative; Dijkstra is wrong otherwise.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rp_core::{EdgeId, NodeId};

use crate::network::{EdgeAttrs, EdgeRef, RoadNetwork};
use crate::NetworkError;

// ── EdgeWeight ────────────────────────────────────────────────────────────────

/// Traversal cost of a single edge.
pub trait EdgeWeight: Send + Sync {
    /// Cost of traversing an edge with these attributes.  Must be finite
    /// and `>= 0`.
    fn cost(&self, attrs: &EdgeAttrs) -> f64;
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the start node, an ordered list of edge
/// slots, and the total weighted cost.
#[derive(Debug, Clone)]
pub struct Route {
    pub origin: NodeId,
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    pub total_cost: f64,
}

impl Route {
    /// A zero-length route that stays at `node`.
    pub fn trivial(node: NodeId) -> Self {
        Self { origin: node, edges: Vec::new(), total_cost: 0.0 }
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Visited nodes in order, origin first.  Never has two equal
    /// consecutive entries unless the graph has self-loops.
    pub fn nodes(&self, network: &RoadNetwork) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.edges.len() + 1);
        nodes.push(self.origin);
        nodes.extend(self.edges.iter().map(|e| network.edge_to[e.index()]));
        nodes
    }

    /// `(from, to, key)` of every edge in order.
    pub fn edge_refs(&self, network: &RoadNetwork) -> Vec<EdgeRef> {
        self.edges.iter().map(|&e| network.edge_ref(e)).collect()
    }

    pub fn destination(&self, network: &RoadNetwork) -> NodeId {
        self.edges
            .last()
            .map_or(self.origin, |e| network.edge_to[e.index()])
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
pub trait Router: Send + Sync {
    /// Compute the cheapest route from `from` to `to` over live edges.
    ///
    /// `from == to` yields a trivial route rather than an error.
    ///
    /// # Errors
    /// - [`NetworkError::NodeNotFound`] if either node is not in the network.
    /// - [`NetworkError::NoRoute`] if `to` is unreachable.
    fn route<W: EdgeWeight + ?Sized>(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: &W,
    ) -> Result<Route, NetworkError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR multigraph.
///
/// Parallel edges are all relaxed, so the cheapest key between a pair wins;
/// among equal costs the first slot wins.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route<W: EdgeWeight + ?Sized>(
        &self,
        network: &RoadNetwork,
        from: NodeId,
        to: NodeId,
        weight: &W,
    ) -> Result<Route, NetworkError> {
        dijkstra(network, from, to, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Total order over `f64` costs for the heap.
#[derive(Copy, Clone, PartialEq, Debug)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn dijkstra<W: EdgeWeight + ?Sized>(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    weight: &W,
) -> Result<Route, NetworkError> {
    for node in [from, to] {
        if !network.contains_node(node) {
            return Err(NetworkError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Route::trivial(from));
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let Some(attrs) = network.edge_attrs(edge) else { continue };
            let step = weight.cost(attrs);
            debug_assert!(step.is_finite() && step >= 0.0, "invalid edge cost {step}");

            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + step;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(NetworkError::NoRoute { from, to })
}

fn reconstruct(
    network: &RoadNetwork,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_cost: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "broken predecessor chain");
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();
    Route { origin: from, edges, total_cost }
}
