//! Agent-subsystem error type.

use thiserror::Error;

use ps_control::ControlError;
use ps_core::VehicleId;
use ps_spatial::SpatialError;

/// Errors produced by `ps-agent`.
///
/// Only [`Control`](Self::Control) and
/// [`UnresolvablePriority`](Self::UnresolvablePriority) ever escape
/// [`Vehicle::solve`][crate::Vehicle::solve]; planning failures turn the
/// vehicle `Failed` instead.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("collaborator returned an empty path for {0}")]
    EmptyPlan(crate::TaskKind),

    #[error("priority of {a} and {b} cannot be compared")]
    UnresolvablePriority { a: VehicleId, b: VehicleId },
}

pub type AgentResult<T> = Result<T, AgentError>;
