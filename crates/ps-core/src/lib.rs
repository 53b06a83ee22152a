//! `ps-core` — foundational types for the parking-lot simulator.
//!
//! This crate is a dependency of every other `ps-*` crate.  It intentionally
//! has no `ps-*` dependencies and minimal external ones (`rand`, `rand_distr`
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `VehicleId`, `SpotId`, `NodeId`, `EdgeId`                |
//! | [`geom`]   | `Point2`, `Pose`, `normalize_angle`                      |
//! | [`path`]   | `ReferencePath`                                          |
//! | [`time`]   | `Tick`, `SimClock`                                       |
//! | [`config`] | `SimConfig`, `SpawnConfig`                               |
//! | [`rng`]    | `SimRng`                                                 |
//! | [`error`]  | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod path;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{SimConfig, SpawnConfig};
pub use error::{CoreError, CoreResult};
pub use geom::{Point2, Pose, normalize_angle};
pub use ids::{EdgeId, NodeId, SpotId, VehicleId};
pub use path::ReferencePath;
pub use rng::SimRng;
pub use time::{SimClock, Tick};
