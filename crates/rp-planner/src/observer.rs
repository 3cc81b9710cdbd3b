//! Planning observer trait for progress reporting and data collection.

use rp_network::EdgeRef;

use crate::{PlanReport, PlannedRoute, RouteFailure, RouteRequest};

/// Callbacks invoked by [`PlanningSession::plan_all`][crate::PlanningSession::plan_all]
/// at key points of the planning loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — conflict counter
///
/// ```rust,ignore
/// struct ConflictCounter(usize);
///
/// impl PlanObserver for ConflictCounter {
///     fn on_conflict(&mut self, _request: &RouteRequest, _edge: EdgeRef) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait PlanObserver {
    /// Called before request number `index` is planned.
    fn on_route_start(&mut self, _index: usize, _request: &RouteRequest) {}

    /// Called each time a saturated edge is removed to force a detour.
    fn on_conflict(&mut self, _request: &RouteRequest, _edge: EdgeRef) {}

    /// Called after a route's edges were committed.
    fn on_route_planned(&mut self, _route: &PlannedRoute) {}

    /// Called when a route is dropped.
    fn on_route_failed(&mut self, _failure: &RouteFailure) {}

    /// Called once after the last request.
    fn on_session_end(&mut self, _report: &PlanReport) {}
}

/// A [`PlanObserver`] that does nothing.
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}
