//! `ps-agent` — the vehicle agent and everything it decides with.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`task`]        | `Task`, `TaskKind`, `CruiseTarget`                         |
//! | [`occupancy`]   | `OccupancyLedger`                                          |
//! | [`context`]     | `AgentContext<'a>`, `PeerSnapshot`                         |
//! | [`arbitration`] | `arbitrate`, `Arbitration`                                 |
//! | [`vehicle`]     | `Vehicle`, `VehicleStatus`                                 |
//! | [`intent`]      | `IntentPredictor` trait, `ProximityPredictor`, `predict_all` |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                             |
//!
//! # Design notes
//!
//! Vehicles are solved one after another in id order.  Each solve borrows
//! the occupancy ledger mutably through [`AgentContext`] and reads a peer
//! snapshot the simulator refreshes after every solve, so the outcome of a
//! tick depends only on spawn order, never on hash or thread order.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | `predict_all` runs on Rayon's thread pool.                 |
//! | `serde`    | Derives `Serialize`/`Deserialize` on tasks and predictors. |

pub mod arbitration;
pub mod context;
pub mod error;
pub mod intent;
pub mod occupancy;
pub mod task;
pub mod vehicle;


pub use arbitration::{Arbitration, arbitrate};
pub use context::{AgentContext, PeerSnapshot};
pub use error::{AgentError, AgentResult};
pub use intent::{IntentPrediction, IntentPredictor, ProximityPredictor, predict_all};
pub use occupancy::OccupancyLedger;
pub use task::{CruiseTarget, Task, TaskKind};
pub use vehicle::{Vehicle, VehicleStatus};
