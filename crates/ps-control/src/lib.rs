//! `ps-control` — vehicle kinematics and closed-loop path tracking.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`state`]   | `VehicleState`, `VehicleBody`, `VehicleConfig`                |
//! | [`stanley`] | `StanleyParams`, `StanleyController`                          |
//! | [`error`]   | `ControlError`, `ControlResult<T>`                            |
//!
//! The controller is the only place vehicle kinematics are integrated.  It
//! is stateless between calls: the caller owns the `VehicleState` and the
//! tracked path index.

pub mod error;
pub mod stanley;
pub mod state;

#[cfg(test)]
mod tests;

pub use error::{ControlError, ControlResult};
pub use stanley::{StanleyController, StanleyParams};
pub use state::{VehicleBody, VehicleConfig, VehicleState};
