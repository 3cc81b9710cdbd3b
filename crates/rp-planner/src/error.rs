use thiserror::Error;

use rp_core::{CoreError, GeoPoint, NodeId};
use rp_network::NetworkError;

use crate::CapacityExceeded;

/// Errors produced while planning.
///
/// Per-route errors are turned into [`RouteFailure`](crate::RouteFailure)
/// records by [`PlanningSession::plan_all`](crate::PlanningSession::plan_all);
/// they never abort a session.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("route {route}: no endpoints could be derived from its geometry")]
    MissingEndpoints { route: String },

    #[error("route {route}: no network node near {pos}")]
    NodeNotFound { route: String, pos: GeoPoint },

    #[error("route {route}: no path from {from} to {to}")]
    NoPathFound { route: String, from: NodeId, to: NodeId },

    #[error(transparent)]
    Capacity(#[from] CapacityExceeded),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Config(#[from] CoreError),
}

pub type PlanResult<T> = Result<T, PlanError>;
