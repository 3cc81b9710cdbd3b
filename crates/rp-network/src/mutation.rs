//! Scoped edge removal.
//!
//! Conflict resolution removes edges to force a detour and must put every
//! one of them back before the next route is planned.  [`EdgeRemovalGuard`]
//! holds the only mutable borrow of the network for the duration of the
//! detour, so no other computation can observe it half-mutated, and
//! restores every removed edge when it goes out of scope.

use std::ops::Deref;

use crate::{EdgeRef, NetworkResult, RemovedEdge, RoadNetwork};

impl RoadNetwork {
    /// Begin a removal scope.  All edges removed through the returned guard
    /// are restored, in reverse removal order, when it is dropped.
    pub fn scoped_removal(&mut self) -> EdgeRemovalGuard<'_> {
        EdgeRemovalGuard { network: self, removed: Vec::new() }
    }
}

/// Exclusive handle on a [`RoadNetwork`] that undoes its own removals.
///
/// Derefs to `RoadNetwork` for read-only use (routing, lookups) while edges
/// are out.
pub struct EdgeRemovalGuard<'a> {
    network: &'a mut RoadNetwork,
    removed: Vec<RemovedEdge>,
}

impl EdgeRemovalGuard<'_> {
    /// Remove `edge` for the lifetime of this guard.
    ///
    /// # Errors
    /// [`NetworkError::EdgeNotFound`](crate::NetworkError::EdgeNotFound) if
    /// the edge is absent or already removed.
    pub fn remove(&mut self, edge: &EdgeRef) -> NetworkResult<()> {
        let removed = self.network.remove_edge(edge)?;
        self.removed.push(removed);
        Ok(())
    }

    /// Number of edges currently held out.
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Identities of the edges currently held out, in removal order.
    pub fn removed(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.removed.iter().map(RemovedEdge::edge)
    }
}

impl Deref for EdgeRemovalGuard<'_> {
    type Target = RoadNetwork;

    fn deref(&self) -> &RoadNetwork {
        self.network
    }
}

impl Drop for EdgeRemovalGuard<'_> {
    fn drop(&mut self) {
        while let Some(removed) = self.removed.pop() {
            self.network.refill(removed);
        }
    }
}
