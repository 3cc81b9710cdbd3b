//! Road multigraph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edge slots occupy:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are sorted by source node with a *stable* sort, so within one node
//! the slots keep insertion order.  Dijkstra relaxes edges in slot order,
//! which makes tie-breaking between equal-cost paths deterministic.
//!
//! # Multigraph keys
//!
//! Parallel edges between the same ordered pair `(from, to)` are told apart
//! by an [`EdgeKey`].  The triple `(from, to, key)` is an [`EdgeRef`] and
//! names exactly one slot for the lifetime of the network.
//!
//! # Removal
//!
//! Topology (the CSR arrays) is fixed at build time.  Removing an edge
//! vacates its slot and hands the attributes back to the caller as a
//! [`RemovedEdge`]; restoring refills the same slot, so key and attributes
//! come back identical.  Prefer [`RoadNetwork::scoped_removal`], which
//! restores automatically.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest `NodeId`.  Used
//! to snap route anchors and population centroids to road nodes.

use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::{FxHashMap, FxHashSet};

use rp_core::{EdgeId, EdgeKey, GeoPoint, NodeId, SnapMetric};

use crate::{NetworkError, NetworkResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[lat, lon]` point with
/// the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── EdgeRef / EdgeAttrs ───────────────────────────────────────────────────────

/// Identity of one directed edge: endpoint pair plus parallel-edge key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeRef {
    pub from: NodeId,
    pub to:   NodeId,
    pub key:  EdgeKey,
}

impl EdgeRef {
    #[inline]
    pub fn new(from: NodeId, to: NodeId, key: EdgeKey) -> Self {
        Self { from, to, key }
    }

    /// The same key in the opposite direction.  Only meaningful for edges
    /// added with [`RoadNetworkBuilder::add_road`].
    #[inline]
    pub fn reversed(self) -> Self {
        Self { from: self.to, to: self.from, key: self.key }
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}#{}", self.from.0, self.to.0, self.key.0)
    }
}

/// Mutable per-edge attributes.
///
/// Both are optional: a missing length or density is treated as `1` by the
/// planner's weight function.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeAttrs {
    /// Physical length in metres.
    pub length_m: Option<f32>,
    /// Population density served by this segment.
    pub density:  Option<f32>,
}

impl EdgeAttrs {
    /// Attributes with a known length and no density.
    pub fn from_length(length_m: f32) -> Self {
        Self { length_m: Some(length_m), density: None }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = Some(density);
        self
    }
}

/// An edge taken out of the network, carrying everything needed to put it
/// back into its original slot.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a removed edge must be restored with RoadNetwork::restore_edge"]
pub struct RemovedEdge {
    id:    EdgeId,
    edge:  EdgeRef,
    attrs: EdgeAttrs,
}

impl RemovedEdge {
    pub fn edge(&self) -> EdgeRef {
        self.edge
    }

    pub fn attrs(&self) -> &EdgeAttrs {
        &self.attrs
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus a spatial index for node
/// snapping.
///
/// Topology fields are `pub` for direct indexed access on hot paths.  Edge
/// attributes and liveness are private: they change only through
/// [`remove_edge`](Self::remove_edge), [`restore_edge`](Self::restore_edge)
/// and the attribute setters.  Do not construct directly; use
/// [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Optional population attached to each node.  Indexed by `NodeId`.
    pub node_population: Vec<Option<f32>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing slots of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge topology (indexed by EdgeId = slot) ──────────────────────────
    pub edge_from: Vec<NodeId>,
    pub edge_to:   Vec<NodeId>,
    pub edge_key:  Vec<EdgeKey>,

    // ── Edge state ────────────────────────────────────────────────────────
    edge_attrs: Vec<EdgeAttrs>,
    edge_live:  Vec<bool>,
    edge_index: FxHashMap<EdgeRef, EdgeId>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().assemble()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of edge slots, live or removed.
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Number of edges currently present.
    pub fn live_edge_count(&self) -> usize {
        self.edge_live.iter().filter(|&&live| live).count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all live outgoing edges from `node`,
    /// in insertion order.
    ///
    /// # Panics
    /// Panics if `node` is not in the network.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end)
            .filter(|&i| self.edge_live[i])
            .map(|i| EdgeId(i as u32))
    }

    /// Number of live outgoing edges of `node`.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_edges(node).count()
    }

    /// Destination nodes reachable over one live edge from `node`.  A
    /// neighbour appears once per parallel edge.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(node).map(|e| self.edge_to[e.index()])
    }

    // ── Edge lookup ───────────────────────────────────────────────────────

    #[inline]
    pub fn is_live(&self, edge: EdgeId) -> bool {
        self.edge_live[edge.index()]
    }

    /// The `(from, to, key)` identity stored in slot `edge`.
    #[inline]
    pub fn edge_ref(&self, edge: EdgeId) -> EdgeRef {
        let i = edge.index();
        EdgeRef::new(self.edge_from[i], self.edge_to[i], self.edge_key[i])
    }

    /// Attributes of the live edge in slot `edge`, or `None` if the slot is
    /// currently vacant.
    #[inline]
    pub fn edge_attrs(&self, edge: EdgeId) -> Option<&EdgeAttrs> {
        self.edge_live[edge.index()].then(|| &self.edge_attrs[edge.index()])
    }

    /// Slot of `edge`, whether or not it is currently live.
    pub fn find_edge(&self, edge: &EdgeRef) -> Option<EdgeId> {
        self.edge_index.get(edge).copied()
    }

    /// Attributes of a live edge by identity.
    pub fn attrs_of(&self, edge: &EdgeRef) -> Option<&EdgeAttrs> {
        self.find_edge(edge).and_then(|id| self.edge_attrs(id))
    }

    /// `true` if `edge` exists and is not removed.
    pub fn contains_edge(&self, edge: &EdgeRef) -> bool {
        self.find_edge(edge).is_some_and(|id| self.is_live(id))
    }

    /// All live edges between `from` and `to`, in insertion order.
    pub fn edges_between(&self, from: NodeId, to: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(from).filter(move |e| self.edge_to[e.index()] == to)
    }

    fn live_slot(&self, edge: &EdgeRef) -> NetworkResult<EdgeId> {
        match self.find_edge(edge) {
            Some(id) if self.is_live(id) => Ok(id),
            _ => Err(NetworkError::EdgeNotFound(*edge)),
        }
    }

    // ── Attribute updates ─────────────────────────────────────────────────

    pub fn set_edge_density(&mut self, edge: &EdgeRef, density: Option<f32>) -> NetworkResult<()> {
        let id = self.live_slot(edge)?;
        self.edge_attrs[id.index()].density = density;
        Ok(())
    }

    pub fn set_edge_length(&mut self, edge: &EdgeRef, length_m: Option<f32>) -> NetworkResult<()> {
        let id = self.live_slot(edge)?;
        self.edge_attrs[id.index()].length_m = length_m;
        Ok(())
    }

    // ── Removal / restoration ─────────────────────────────────────────────

    /// Take `edge` out of the network.  The returned [`RemovedEdge`] must be
    /// handed back to [`restore_edge`](Self::restore_edge) before the
    /// network is used for anything else.
    ///
    /// # Errors
    /// [`NetworkError::EdgeNotFound`] if the edge does not exist or is
    /// already removed.
    pub fn remove_edge(&mut self, edge: &EdgeRef) -> NetworkResult<RemovedEdge> {
        let id = self.live_slot(edge)?;
        self.edge_live[id.index()] = false;
        Ok(RemovedEdge {
            id,
            edge: *edge,
            attrs: std::mem::take(&mut self.edge_attrs[id.index()]),
        })
    }

    /// Put a removed edge back into its original slot.
    ///
    /// # Errors
    /// [`NetworkError::EdgeAlreadyPresent`] if the slot is live, which means
    /// the same edge was restored twice.
    pub fn restore_edge(&mut self, removed: RemovedEdge) -> NetworkResult<()> {
        if self.edge_live[removed.id.index()] {
            return Err(NetworkError::EdgeAlreadyPresent(removed.edge));
        }
        self.refill(removed);
        Ok(())
    }

    /// Restore without the liveness check.  Only for `EdgeRemovalGuard`,
    /// which owns every `RemovedEdge` it refills.
    pub(crate) fn refill(&mut self, removed: RemovedEdge) {
        let i = removed.id.index();
        debug_assert!(!self.edge_live[i], "refilling live slot {}", removed.edge);
        self.edge_attrs[i] = removed.attrs;
        self.edge_live[i] = true;
    }

    /// Every live edge with its attributes, sorted by identity.
    ///
    /// Two snapshots compare equal iff the networks hold the same edges
    /// with the same keys and attributes.
    pub fn edge_snapshot(&self) -> Vec<(EdgeRef, EdgeAttrs)> {
        let mut snapshot: Vec<(EdgeRef, EdgeAttrs)> = (0..self.edge_count())
            .filter(|&i| self.edge_live[i])
            .map(|i| (self.edge_ref(EdgeId(i as u32)), self.edge_attrs[i]))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest road node to `pos`.
    ///
    /// Returns `None` if the network has no nodes or `pos` is not finite.
    pub fn snap_to_node(&self, pos: GeoPoint, metric: SnapMetric) -> Option<NodeId> {
        if !pos.is_finite() {
            return None;
        }
        match metric {
            SnapMetric::Planar => self
                .spatial_idx
                .nearest_neighbor(&[pos.lat, pos.lon])
                .map(|e| e.id),
            SnapMetric::Haversine => self
                .node_pos
                .iter()
                .enumerate()
                .map(|(i, &p)| (i, pos.distance_m(p)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(i, _)| NodeId(i as u32)),
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Attach `population` to the road node nearest `pos`, adding to any
    /// population already recorded there.  Returns the node, or `None` for
    /// an empty network.
    pub fn attach_population(
        &mut self,
        pos: GeoPoint,
        population: f32,
        metric: SnapMetric,
    ) -> Option<NodeId> {
        let node = self.snap_to_node(pos, metric)?;
        let slot = &mut self.node_population[node.index()];
        *slot = Some(slot.unwrap_or(0.0) + population);
        Some(node)
    }

    /// Set every live edge's density to the mean population of its
    /// populated endpoints.  Edges with no populated endpoint are left
    /// untouched.
    pub fn derive_edge_density(&mut self) {
        for i in 0..self.edge_count() {
            if !self.edge_live[i] {
                continue;
            }
            let ends = [
                self.node_population[self.edge_from[i].index()],
                self.node_population[self.edge_to[i].index()],
            ];
            let (sum, n) = ends
                .iter()
                .flatten()
                .fold((0.0f32, 0u32), |(s, n), &p| (s + p, n + 1));
            if n > 0 {
                self.edge_attrs[i].density = Some(sum / n as f32);
            }
        }
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rp_core::GeoPoint;
/// use rp_network::{EdgeAttrs, RoadNetworkBuilder};
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(7.07, 125.61));
/// let c = b.add_node(GeoPoint::new(7.08, 125.62));
/// b.add_road(a, c, EdgeAttrs::from_length(1_200.0));
/// let net = b.build().unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:       Vec<GeoPoint>,
    populations: Vec<Option<f32>>,
    raw_edges:   Vec<RawEdge>,
    next_key:    FxHashMap<(NodeId, NodeId), u32>,
}

struct RawEdge {
    edge:  EdgeRef,
    attrs: EdgeAttrs,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes:       Vec::new(),
            populations: Vec::new(),
            raw_edges:   Vec::new(),
            next_key:    FxHashMap::default(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:       Vec::with_capacity(nodes),
            populations: Vec::with_capacity(nodes),
            raw_edges:   Vec::with_capacity(edges),
            next_key:    FxHashMap::default(),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        self.push_node(pos, None)
    }

    pub fn add_node_with_population(&mut self, pos: GeoPoint, population: f32) -> NodeId {
        self.push_node(pos, Some(population))
    }

    fn push_node(&mut self, pos: GeoPoint, population: Option<f32>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.populations.push(population);
        id
    }

    /// Add a **directed** edge with the next free key for `(from, to)`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) -> EdgeKey {
        let key = EdgeKey(self.peek_key(from, to));
        self.add_keyed_edge(EdgeRef::new(from, to, key), attrs);
        key
    }

    /// Add a directed edge with an explicit key.  Later automatic keys for
    /// the same pair start above it.
    pub fn add_keyed_edge(&mut self, edge: EdgeRef, attrs: EdgeAttrs) {
        let next = self.next_key.entry((edge.from, edge.to)).or_insert(0);
        *next = (*next).max(edge.key.0.saturating_add(1));
        self.raw_edges.push(RawEdge { edge, attrs });
    }

    /// Convenience: add edges in **both directions** sharing one key, for an
    /// undirected road segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) -> EdgeKey {
        let key = EdgeKey(self.peek_key(a, b).max(self.peek_key(b, a)));
        self.add_keyed_edge(EdgeRef::new(a, b, key), attrs);
        self.add_keyed_edge(EdgeRef::new(b, a, key), attrs);
        key
    }

    fn peek_key(&self, from: NodeId, to: NodeId) -> u32 {
        self.next_key.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Validate and produce a [`RoadNetwork`].
    ///
    /// # Errors
    /// - [`NetworkError::NodeNotFound`] if an edge references an unknown node.
    /// - [`NetworkError::DuplicateEdge`] if a `(from, to, key)` triple was
    ///   added twice.
    pub fn build(self) -> NetworkResult<RoadNetwork> {
        let node_count = self.nodes.len();
        let mut seen: FxHashSet<EdgeRef> = FxHashSet::default();
        for raw in &self.raw_edges {
            for node in [raw.edge.from, raw.edge.to] {
                if node.index() >= node_count {
                    return Err(NetworkError::NodeNotFound(node));
                }
            }
            if !seen.insert(raw.edge) {
                return Err(NetworkError::DuplicateEdge(raw.edge));
            }
        }
        Ok(self.assemble())
    }

    /// Sort edges, build the CSR arrays and bulk-load the R-tree.  Inputs
    /// must already be validated.
    fn assemble(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable: parallel edges keep insertion order within a source node.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.edge.from.0);

        let edge_from:  Vec<NodeId>    = raw.iter().map(|e| e.edge.from).collect();
        let edge_to:    Vec<NodeId>    = raw.iter().map(|e| e.edge.to).collect();
        let edge_key:   Vec<EdgeKey>   = raw.iter().map(|e| e.edge.key).collect();
        let edge_attrs: Vec<EdgeAttrs> = raw.iter().map(|e| e.attrs).collect();
        let edge_index: FxHashMap<EdgeRef, EdgeId> = raw
            .iter()
            .enumerate()
            .map(|(i, e)| (e.edge, EdgeId(i as u32)))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.edge.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.lat, pos.lon],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadNetwork {
            node_pos: self.nodes,
            node_population: self.populations,
            node_out_start,
            edge_from,
            edge_to,
            edge_key,
            edge_attrs,
            edge_live: vec![true; edge_count],
            edge_index,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
