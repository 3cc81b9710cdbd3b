//! Network-subsystem error type.

use thiserror::Error;

use rp_core::NodeId;

use crate::EdgeRef;

/// Errors produced by `rp-network`.
#[derive(Debug, Error, PartialEq)]
pub enum NetworkError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found in network")]
    EdgeNotFound(EdgeRef),

    #[error("edge {0} is already present")]
    EdgeAlreadyPresent(EdgeRef),

    #[error("edge {0} was added more than once")]
    DuplicateEdge(EdgeRef),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
