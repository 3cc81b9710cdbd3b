//! Planner configuration.
//!
//! Typically built by the application (or deserialised with the `serde`
//! feature) and handed to the planning session builder, which calls
//! [`PlannerConfig::validate`] before any route is planned.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SnapMetric ────────────────────────────────────────────────────────────────

/// Distance used when snapping a coordinate to its nearest road node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SnapMetric {
    /// Squared lat/lon distance via the R-tree index.  O(log N).
    #[default]
    Planar,
    /// Great-circle distance over every node.  O(N).
    Haversine,
}

// ── ConflictPolicy ────────────────────────────────────────────────────────────

/// How a saturated path is rerouted.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ConflictPolicy {
    /// Remove the first saturated edge of the candidate path, recompute,
    /// repeat.
    #[default]
    Incremental,
    /// Remove every saturated edge of the candidate path at once, recompute,
    /// repeat.
    AllAtOnce,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::Incremental => "incremental",
            ConflictPolicy::AllAtOnce   => "all_at_once",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Top-level planning-session configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Maximum number of routes allowed to share one directed edge.
    pub max_per_edge: u32,

    /// Floor applied to edge population density before it divides the
    /// edge length.  Must be finite and strictly positive.
    pub min_density: f32,

    /// Metric used to snap route anchors to network nodes.
    pub snap_metric: SnapMetric,

    /// Rerouting strategy when a candidate path crosses a saturated edge.
    pub conflict_policy: ConflictPolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_per_edge:    1,
            min_density:     1.0,
            snap_metric:     SnapMetric::Planar,
            conflict_policy: ConflictPolicy::Incremental,
        }
    }
}

impl PlannerConfig {
    /// Reject configurations that would break planning invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_per_edge == 0 {
            return Err(CoreError::Config(
                "max_per_edge must be at least 1".into(),
            ));
        }
        if !self.min_density.is_finite() || self.min_density <= 0.0 {
            return Err(CoreError::Config(format!(
                "min_density must be finite and > 0, got {}",
                self.min_density
            )));
        }
        Ok(())
    }

    pub fn with_max_per_edge(mut self, max_per_edge: u32) -> Self {
        self.max_per_edge = max_per_edge;
        self
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    pub fn with_snap_metric(mut self, metric: SnapMetric) -> Self {
        self.snap_metric = metric;
        self
    }
}
