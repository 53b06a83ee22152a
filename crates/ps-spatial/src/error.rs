//! Spatial-subsystem error type.

use thiserror::Error;

use ps_core::{CoreError, NodeId, SpotId};

use crate::ManeuverKind;

/// Errors produced by `ps-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("waypoint graph has no nodes")]
    EmptyNetwork,

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("spot {0} not found in lot")]
    SpotNotFound(SpotId),

    #[error("no {kind:?} maneuver for spot {spot}")]
    ManeuverUnavailable { spot: SpotId, kind: ManeuverKind },

    #[error("spot data error: {0}")]
    Parse(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
