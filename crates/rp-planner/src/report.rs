//! Planning results handed to downstream export/rendering.

use std::fmt;

use rp_core::{GeoPoint, NodeId};
use rp_network::{EdgeRef, NetworkError};

use crate::{PlanError, RouteRequest};

// ── PlannedRoute ──────────────────────────────────────────────────────────────

/// A successfully planned and committed route.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlannedRoute {
    pub id:   String,
    pub name: String,
    /// Visited nodes in order.  A round trip starts and ends on the same node.
    pub nodes: Vec<NodeId>,
    /// `(lat, lon)` of every entry in `nodes`.
    pub coords: Vec<GeoPoint>,
    /// Committed edges in traversal order.
    pub edges: Vec<EdgeRef>,
    pub total_cost: f64,
    /// Edges removed to get around saturated segments.
    pub reroutes: usize,
    pub round_trip: bool,
}

impl PlannedRoute {
    /// `true` when start and end snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── RouteFailure ──────────────────────────────────────────────────────────────

/// Why a route could not be planned.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FailureReason {
    /// An endpoint could not be mapped to a network node.
    NodeNotFound,
    /// Start and end are disconnected, possibly after rerouting removals.
    NoPath,
    /// The route's geometry was empty.
    NoEndpoints,
    /// Anything else; indicates a bug rather than bad input.
    Internal,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::NodeNotFound => "node-not-found",
            FailureReason::NoPath       => "no-path",
            FailureReason::NoEndpoints  => "no-endpoints",
            FailureReason::Internal     => "internal",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&PlanError> for FailureReason {
    fn from(err: &PlanError) -> Self {
        match err {
            PlanError::MissingEndpoints { .. } => FailureReason::NoEndpoints,
            PlanError::NodeNotFound { .. }
            | PlanError::Network(NetworkError::NodeNotFound(_)) => FailureReason::NodeNotFound,
            PlanError::NoPathFound { .. }
            | PlanError::Network(NetworkError::NoRoute { .. }) => FailureReason::NoPath,
            PlanError::Capacity(_) | PlanError::Network(_) | PlanError::Config(_) => {
                FailureReason::Internal
            }
        }
    }
}

/// A route that was dropped from the session.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RouteFailure {
    pub id:     String,
    pub name:   String,
    pub reason: FailureReason,
    /// Human-readable error message.
    pub detail: String,
}

impl RouteFailure {
    pub fn new(request: &RouteRequest, err: &PlanError) -> Self {
        Self {
            id:     request.id.clone(),
            name:   request.name.clone(),
            reason: FailureReason::from(err),
            detail: err.to_string(),
        }
    }
}

// ── PlanReport ────────────────────────────────────────────────────────────────

/// Outcome of a whole planning session, in request order.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PlanReport {
    pub planned: Vec<PlannedRoute>,
    pub failed:  Vec<RouteFailure>,
}

impl PlanReport {
    pub fn planned_route(&self, id: &str) -> Option<&PlannedRoute> {
        self.planned.iter().find(|r| r.id == id)
    }

    pub fn failure(&self, id: &str) -> Option<&RouteFailure> {
        self.failed.iter().find(|f| f.id == id)
    }

    /// `true` if every request was planned.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
