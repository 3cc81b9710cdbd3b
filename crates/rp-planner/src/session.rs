//! The planning session: per-route pathfinding, conflict rerouting, and
//! occupancy commit.
//!
//! # Per-route cycle
//!
//! ```text
//! for request in requests (input order):
//!   ① Resolve   — endpoints from explicit coords or the farthest pair of
//!                 the geometry, snapped to the nearest network nodes.
//!   ② Route     — cheapest path start→end under the edge weight.
//!   ③ Check     — find edges of the candidate already at max_per_edge.
//!   ④ Detour    — remove them (one at a time, or all at once depending on
//!                 ConflictPolicy) inside a removal scope and go back to ②.
//!                 The scope restores every removed edge when the leg ends,
//!                 success or failure.
//!   ⑤ Return    — round trips plan end→start the same way, counting the
//!                 outbound edges as already claimed.
//!   ⑥ Commit    — record all edges in the capacity tracker at once.
//! ```
//!
//! A route that fails at any step is reported and skipped; it commits
//! nothing and leaves the network exactly as it found it.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use rp_core::{ConflictPolicy, NodeId, PlannerConfig, SnapMetric};
use rp_network::{
    DijkstraRouter, EdgeRef, EdgeWeight, NetworkError, RoadNetwork, Router,
};

use crate::{
    CapacityTracker, DensityWeight, NoopObserver, PlanError, PlanObserver, PlanReport,
    PlanResult, PlannedRoute, RouteFailure, RouteRequest,
};

// ── Endpoint resolution ───────────────────────────────────────────────────────

/// Map a request to its start and end network nodes.
///
/// # Errors
/// - [`PlanError::MissingEndpoints`] for an empty geometry.
/// - [`PlanError::NodeNotFound`] if a coordinate has no nearest node (the
///   network is empty).
pub fn resolve_endpoints(
    network: &RoadNetwork,
    request: &RouteRequest,
    metric: SnapMetric,
) -> PlanResult<(NodeId, NodeId)> {
    let (start, end) = request
        .anchors
        .endpoints()
        .ok_or_else(|| PlanError::MissingEndpoints { route: request.id.clone() })?;

    let snap = |pos| {
        network
            .snap_to_node(pos, metric)
            .ok_or_else(|| PlanError::NodeNotFound { route: request.id.clone(), pos })
    };
    Ok((snap(start)?, snap(end)?))
}

// ── PlanningSession ───────────────────────────────────────────────────────────

/// Owns the network and the occupancy table for one planning run.
///
/// Routes must go through one session sequentially: every call takes
/// `&mut self`, so a route's temporary edge removals can never be seen by
/// another route.
pub struct PlanningSession<R: Router = DijkstraRouter, W: EdgeWeight = DensityWeight> {
    config:   PlannerConfig,
    network:  RoadNetwork,
    capacity: CapacityTracker,
    router:   R,
    weight:   W,
}

impl PlanningSession<DijkstraRouter, DensityWeight> {
    /// A session with Dijkstra and the density weight built from `config`.
    pub fn new(config: PlannerConfig, network: RoadNetwork) -> PlanResult<Self> {
        let weight = DensityWeight::new(config.min_density);
        SessionBuilder::new(config, network, DijkstraRouter, weight).build()
    }
}

impl<R: Router, W: EdgeWeight> PlanningSession<R, W> {
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn capacity(&self) -> &CapacityTracker {
        &self.capacity
    }

    /// End the session and hand the (fully restored) network back.
    pub fn into_network(self) -> RoadNetwork {
        self.network
    }

    /// End the session, keeping the occupancy table alongside the network.
    pub fn into_parts(self) -> (RoadNetwork, CapacityTracker) {
        (self.network, self.capacity)
    }

    /// Plan and commit a single route.
    pub fn plan_route(&mut self, request: &RouteRequest) -> PlanResult<PlannedRoute> {
        self.plan_route_with(request, &mut NoopObserver)
    }

    /// Like [`plan_route`](Self::plan_route), reporting conflicts to `observer`.
    pub fn plan_route_with(
        &mut self,
        request: &RouteRequest,
        observer: &mut dyn PlanObserver,
    ) -> PlanResult<PlannedRoute> {
        let (start, end) = resolve_endpoints(&self.network, request, self.config.snap_metric)?;
        self.plan_resolved(request, start, end, observer)
    }

    /// Plan every request in order.  Failures are collected, never fatal.
    pub fn plan_all<O: PlanObserver>(
        &mut self,
        requests: &[RouteRequest],
        observer: &mut O,
    ) -> PlanReport {
        let resolved = self.resolve_all(requests);
        let mut report = PlanReport::default();

        for (index, (request, ends)) in requests.iter().zip(resolved).enumerate() {
            observer.on_route_start(index, request);

            let outcome = ends
                .and_then(|(start, end)| self.plan_resolved(request, start, end, observer));

            match outcome {
                Ok(route) => {
                    observer.on_route_planned(&route);
                    report.planned.push(route);
                }
                Err(err) => {
                    let failure = RouteFailure::new(request, &err);
                    warn!(route = %request.id, reason = %failure.reason, "route dropped: {err}");
                    observer.on_route_failed(&failure);
                    report.failed.push(failure);
                }
            }
        }

        info!(
            planned = report.planned.len(),
            failed = report.failed.len(),
            occupied_edges = self.capacity.occupied().count(),
            peak = self.capacity.peak(),
            "planning session complete"
        );
        observer.on_session_end(&report);
        report
    }

    #[cfg(not(feature = "parallel"))]
    fn resolve_all(&self, requests: &[RouteRequest]) -> Vec<PlanResult<(NodeId, NodeId)>> {
        let metric = self.config.snap_metric;
        requests
            .iter()
            .map(|r| resolve_endpoints(&self.network, r, metric))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn resolve_all(&self, requests: &[RouteRequest]) -> Vec<PlanResult<(NodeId, NodeId)>> {
        use rayon::prelude::*;

        let metric = self.config.snap_metric;
        requests
            .par_iter()
            .map(|r| resolve_endpoints(&self.network, r, metric))
            .collect()
    }

    fn plan_resolved(
        &mut self,
        request: &RouteRequest,
        start: NodeId,
        end: NodeId,
        observer: &mut dyn PlanObserver,
    ) -> PlanResult<PlannedRoute> {
        let mut planner = LegPlanner {
            network:  &mut self.network,
            capacity: &self.capacity,
            router:   &self.router,
            weight:   &self.weight,
            policy:   self.config.conflict_policy,
            request,
            claimed:  FxHashMap::default(),
            reroutes: 0,
        };

        let mut circuit = planner.plan_leg(start, end, observer)?;
        if request.round_trip {
            let back = planner.plan_leg(end, start, observer)?;
            circuit.nodes.extend(back.nodes.into_iter().skip(1));
            circuit.edges.extend(back.edges);
            circuit.cost += back.cost;
        }
        let reroutes = planner.reroutes;

        self.capacity.record_all(&circuit.edges)?;

        let coords = circuit
            .nodes
            .iter()
            .map(|n| self.network.node_pos[n.index()])
            .collect();

        debug!(
            route = %request.id,
            edges = circuit.edges.len(),
            cost = circuit.cost,
            reroutes,
            "route committed"
        );

        Ok(PlannedRoute {
            id:         request.id.clone(),
            name:       request.name.clone(),
            nodes:      circuit.nodes,
            coords,
            edges:      circuit.edges,
            total_cost: circuit.cost,
            reroutes,
            round_trip: request.round_trip,
        })
    }
}

// ── Leg planning ──────────────────────────────────────────────────────────────

/// One conflict-free path between two nodes.
struct Leg {
    nodes: Vec<NodeId>,
    edges: Vec<EdgeRef>,
    cost:  f64,
}

/// Split borrows of a session for the duration of one route.
struct LegPlanner<'a, R: Router, W: EdgeWeight> {
    network:  &'a mut RoadNetwork,
    capacity: &'a CapacityTracker,
    router:   &'a R,
    weight:   &'a W,
    policy:   ConflictPolicy,
    request:  &'a RouteRequest,
    /// Edges already used by earlier legs of this route, not yet committed.
    claimed:  FxHashMap<EdgeRef, u32>,
    reroutes: usize,
}

/// `true` if `edge` cannot take this route on top of what is committed and
/// what the route itself has already claimed.
fn is_saturated(
    capacity: &CapacityTracker,
    claimed: &FxHashMap<EdgeRef, u32>,
    edge: &EdgeRef,
) -> bool {
    let pending = claimed.get(edge).copied().unwrap_or(0);
    capacity.would_exceed(edge, pending)
}

impl<R: Router, W: EdgeWeight> LegPlanner<'_, R, W> {
    /// Cheapest path `from → to` avoiding saturated edges.
    ///
    /// Saturated edges are removed through a scoped guard, so the network
    /// is restored on every return from this function.
    fn plan_leg(
        &mut self,
        from: NodeId,
        to: NodeId,
        observer: &mut dyn PlanObserver,
    ) -> PlanResult<Leg> {
        let LegPlanner { network, capacity, router, weight, policy, request, claimed, reroutes } =
            self;
        let mut guard = network.scoped_removal();

        loop {
            let route = router
                .route(&guard, from, to, *weight)
                .map_err(|err| match err {
                    NetworkError::NoRoute { from, to } => PlanError::NoPathFound {
                        route: request.id.clone(),
                        from,
                        to,
                    },
                    other => PlanError::Network(other),
                })?;
            let edges = route.edge_refs(&guard);

            let mut saturated = edges
                .iter()
                .filter(|e| is_saturated(capacity, claimed, e))
                .copied();
            let blocked: Vec<EdgeRef> = match *policy {
                ConflictPolicy::Incremental => saturated.next().into_iter().collect(),
                ConflictPolicy::AllAtOnce => saturated.collect(),
            };

            if blocked.is_empty() {
                for &edge in &edges {
                    *claimed.entry(edge).or_insert(0) += 1;
                }
                return Ok(Leg {
                    nodes: route.nodes(&guard),
                    edges,
                    cost: route.total_cost,
                });
            }

            for edge in blocked {
                debug!(
                    route = %request.id,
                    %edge,
                    count = capacity.count(&edge),
                    "edge at capacity, rerouting"
                );
                observer.on_conflict(request, edge);
                guard.remove(&edge)?;
                *reroutes += 1;
            }
        }
    }
}

// ── SessionBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`PlanningSession<R, W>`].
///
/// # Required inputs
///
/// - [`PlannerConfig`] — capacity, density floor, snap metric, policy
/// - [`RoadNetwork`] — from the network provider
/// - `R: Router` — e.g. [`DijkstraRouter`]
/// - `W: EdgeWeight` — e.g. [`DensityWeight`]
///
/// # Optional inputs
///
/// | Method               | Default                 |
/// |----------------------|-------------------------|
/// | `.preoccupied(v)`    | Empty occupancy table   |
///
/// # Example
///
/// ```rust,ignore
/// let mut session = SessionBuilder::new(config, network, DijkstraRouter, LengthWeight)
///     .preoccupied(existing_edges)
///     .build()?;
/// ```
pub struct SessionBuilder<R: Router, W: EdgeWeight> {
    config:      PlannerConfig,
    network:     RoadNetwork,
    router:      R,
    weight:      W,
    preoccupied: Vec<EdgeRef>,
}

impl<R: Router, W: EdgeWeight> SessionBuilder<R, W> {
    pub fn new(config: PlannerConfig, network: RoadNetwork, router: R, weight: W) -> Self {
        Self { config, network, router, weight, preoccupied: Vec::new() }
    }

    /// Edges already carrying routes before this session starts (one entry
    /// per route).  They count against `max_per_edge` like planned routes.
    pub fn preoccupied(mut self, edges: Vec<EdgeRef>) -> Self {
        self.preoccupied = edges;
        self
    }

    /// Validate the configuration and seed the occupancy table.
    ///
    /// # Errors
    /// - [`PlanError::Config`] for an invalid [`PlannerConfig`].
    /// - [`PlanError::Network`] if a preoccupied edge is not in the network.
    /// - [`PlanError::Capacity`] if preoccupied edges already exceed capacity.
    pub fn build(self) -> PlanResult<PlanningSession<R, W>> {
        self.config.validate()?;

        for edge in &self.preoccupied {
            if !self.network.contains_edge(edge) {
                return Err(NetworkError::EdgeNotFound(*edge).into());
            }
        }
        let mut capacity = CapacityTracker::new(self.config.max_per_edge);
        capacity.record_all(&self.preoccupied)?;

        info!(
            nodes = self.network.node_count(),
            edges = self.network.live_edge_count(),
            max_per_edge = self.config.max_per_edge,
            policy = %self.config.conflict_policy,
            "planning session ready"
        );

        Ok(PlanningSession {
            config:   self.config,
            network:  self.network,
            capacity,
            router:   self.router,
            weight:   self.weight,
        })
    }
}
