//! `ps-sim` — fixed-tick driver for the parking-lot simulator.
//!
//! # Tick loop
//!
//! ```text
//! while time <= config.max_simulation_time:
//!   ⓪ Pause     — renderer not running: render, retry.
//!   ① Spawn     — one entering and one exiting vehicle whose time has
//!                 passed; reserve the spot (random free spot unless given).
//!                 No suitable spot, or the entry point still occupied:
//!                 the request waits for the next tick.
//!   ② Stop?     — both queues empty and no active vehicle: break.
//!   ③ Solve     — each active vehicle in spawn order; the peer snapshot is
//!                 refreshed after every solve.
//!   ④ Predict   — optional advisory intent predictor (parallel with the
//!                 `parallel` feature).
//!   ⑤ Advance   — time += tick_duration.
//!   ⑥ Draw      — every vehicle with its fill class, then render.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs intent prediction on Rayon's thread pool.          |
//! | `serde`    | Serde derives on configuration types.                   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ps_core::{SimConfig, SimRng};
//! use ps_sim::{HeadlessRenderer, SimBuilder};
//! use ps_spatial::{ArcManeuvers, DijkstraPlanner, LotLayout};
//!
//! let layout = LotLayout::default();
//! let lot = layout.lot()?;
//! let maneuvers = ArcManeuvers::new(&lot, layout.entry_lane(), layout.exit_lane(), 4.5, 0.15);
//! let planner = DijkstraPlanner::new(layout.graph(), 0.5);
//! let config = SimConfig::default();
//! let mut sim = SimBuilder::new(config.clone(), lot, planner, maneuvers, SimRng::new(config.seed))
//!     .build()?;
//! let stats = sim.run(&mut HeadlessRenderer)?;
//! ```

pub mod builder;
pub mod error;
pub mod render;
pub mod schedule;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use render::{Fill, HeadlessRenderer, Renderer};
pub use schedule::{SpawnRequest, SpawnSchedule};
pub use sim::{SimStats, Simulator};
