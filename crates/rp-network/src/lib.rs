//! `rp-network` — weighted road multigraph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`network`]  | `RoadNetwork` (CSR multigraph + R-tree), `RoadNetworkBuilder`, `EdgeRef`, `EdgeAttrs` |
//! | [`mutation`] | `EdgeRemovalGuard` — remove edges, restore on drop           |
//! | [`router`]   | `Router` and `EdgeWeight` traits, `Route`, `DijkstraRouter`  |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod mutation;
pub mod network;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use mutation::EdgeRemovalGuard;
pub use network::{EdgeAttrs, EdgeRef, RemovedEdge, RoadNetwork, RoadNetworkBuilder};
pub use router::{DijkstraRouter, EdgeWeight, Route, Router};
