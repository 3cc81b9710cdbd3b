//! `rp-planner` — capacitated multi-route path planning.
//!
//! Routes are planned one at a time, in input order, over a shared
//! [`RoadNetwork`](rp_network::RoadNetwork).  Each route takes the cheapest
//! path under the density-aware [`DensityWeight`]; if that path crosses an
//! edge already carrying `max_per_edge` routes, the edge is removed for the
//! duration of this route's search and the path is recomputed.  Removed
//! edges are restored before the next route starts.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`weight`]     | `DensityWeight`, `LengthWeight`                           |
//! | [`capacity`]   | `CapacityTracker`, `CapacityExceeded`                     |
//! | [`endpoints`]  | `select_endpoints` — farthest pair of a geometry          |
//! | [`request`]    | `RouteRequest`, `RouteAnchors`                            |
//! | [`report`]     | `PlannedRoute`, `RouteFailure`, `FailureReason`, `PlanReport` |
//! | [`observer`]   | `PlanObserver` trait, `NoopObserver`                      |
//! | [`session`]    | `PlanningSession`, `SessionBuilder`                       |
//! | [`error`]      | `PlanError`, `PlanResult<T>`                              |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Resolves route endpoints on Rayon's thread pool.          |
//! | `serde`    | Derives `Serialize`/`Deserialize` on requests and reports.|
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rp_core::PlannerConfig;
//! use rp_planner::{NoopObserver, PlanningSession, RouteRequest};
//!
//! let mut session = PlanningSession::new(PlannerConfig::default(), network)?;
//! let report = session.plan_all(&requests, &mut NoopObserver);
//! for route in &report.planned {
//!     println!("{}: {} stops", route.name, route.coords.len());
//! }
//! ```

pub mod capacity;
pub mod endpoints;
pub mod error;
pub mod observer;
pub mod report;
pub mod request;
pub mod session;
pub mod weight;


pub use capacity::{CapacityExceeded, CapacityTracker};
pub use endpoints::select_endpoints;
pub use error::{PlanError, PlanResult};
pub use observer::{NoopObserver, PlanObserver};
pub use report::{FailureReason, PlanReport, PlannedRoute, RouteFailure};
pub use request::{RouteAnchors, RouteRequest};
pub use session::{resolve_endpoints, PlanningSession, SessionBuilder};
pub use weight::{DensityWeight, LengthWeight};
