//! `rp-core` — foundational types for the `rp` route-planning workspace.
//!
//! Every other `rp-*` crate depends on this one.  It has no `rp-*`
//! dependencies and a single required external one (`thiserror`), plus
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `EdgeId`, `EdgeKey`                         |
//! | [`geo`]      | `GeoPoint`, planar and haversine distance             |
//! | [`config`]   | `PlannerConfig`, `SnapMetric`, `ConflictPolicy`       |
//! | [`error`]    | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ConflictPolicy, PlannerConfig, SnapMetric};
pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, EdgeKey, NodeId};
