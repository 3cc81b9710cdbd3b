//! Per-edge occupancy table.
//!
//! Counts how many committed routes traverse each directed edge.  The
//! count of an edge never exceeds `max_per_edge`: a [`record`] that would
//! overflow is refused and leaves the table unchanged.  Nothing is ever
//! released — occupancy only accumulates over a planning session.
//!
//! [`record`]: CapacityTracker::record

use rustc_hash::FxHashMap;
use thiserror::Error;

use rp_network::EdgeRef;

/// Signal that an edge cannot take another route.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("edge {edge} is at capacity ({count}/{max})")]
pub struct CapacityExceeded {
    pub edge:  EdgeRef,
    pub count: u32,
    pub max:   u32,
}

/// Occupancy counts keyed by edge identity.
#[derive(Clone, Debug)]
pub struct CapacityTracker {
    max_per_edge: u32,
    counts:       FxHashMap<EdgeRef, u32>,
}

impl CapacityTracker {
    pub fn new(max_per_edge: u32) -> Self {
        Self { max_per_edge, counts: FxHashMap::default() }
    }

    #[inline]
    pub fn max_per_edge(&self) -> u32 {
        self.max_per_edge
    }

    /// Committed routes on `edge`.  0 for edges never recorded.
    #[inline]
    pub fn count(&self, edge: &EdgeRef) -> u32 {
        self.counts.get(edge).copied().unwrap_or(0)
    }

    /// `true` if `edge` cannot take one more route.
    #[inline]
    pub fn is_over_capacity(&self, edge: &EdgeRef) -> bool {
        self.count(edge) >= self.max_per_edge
    }

    /// Like [`is_over_capacity`](Self::is_over_capacity) but also counts
    /// `pending` uses claimed by a route that is not committed yet.
    #[inline]
    pub fn would_exceed(&self, edge: &EdgeRef, pending: u32) -> bool {
        self.count(edge).saturating_add(pending) >= self.max_per_edge
    }

    /// Add one route to `edge` and return the new count.
    ///
    /// # Errors
    /// [`CapacityExceeded`] if the edge is already full; the count is left
    /// unchanged.
    pub fn record(&mut self, edge: EdgeRef) -> Result<u32, CapacityExceeded> {
        let max = self.max_per_edge;
        let count = self.counts.entry(edge).or_insert(0);
        if *count >= max {
            return Err(CapacityExceeded { edge, count: *count, max });
        }
        *count += 1;
        Ok(*count)
    }

    /// Record every edge in `edges`, or none of them.
    ///
    /// Repeated entries count once each.
    ///
    /// # Errors
    /// [`CapacityExceeded`] naming the first edge that would overflow; the
    /// table is left unchanged.
    pub fn record_all(&mut self, edges: &[EdgeRef]) -> Result<(), CapacityExceeded> {
        let mut claimed: FxHashMap<EdgeRef, u32> = FxHashMap::default();
        for &edge in edges {
            let pending = claimed.entry(edge).or_insert(0);
            if self.would_exceed(&edge, *pending) {
                return Err(CapacityExceeded {
                    edge,
                    count: self.count(&edge) + *pending,
                    max:   self.max_per_edge,
                });
            }
            *pending += 1;
        }
        for (edge, n) in claimed {
            *self.counts.entry(edge).or_insert(0) += n;
        }
        Ok(())
    }

    /// Every edge with a non-zero count.
    pub fn occupied(&self) -> impl Iterator<Item = (EdgeRef, u32)> + '_ {
        self.counts
            .iter()
            .filter(|&(_, &n)| n > 0)
            .map(|(&e, &n)| (e, n))
    }

    /// Sum of all counts.
    pub fn total_occupancy(&self) -> u64 {
        self.counts.values().map(|&n| n as u64).sum()
    }

    /// Highest count on any edge, 0 when empty.
    pub fn peak(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }
}
