use thiserror::Error;

use ps_agent::AgentError;
use ps_core::{CoreError, VehicleId};
use ps_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    /// A vehicle hit an invariant violation (diverged state, incomparable
    /// priorities).  The run stops.
    #[error("vehicle {vehicle}: {source}")]
    Agent {
        vehicle: VehicleId,
        #[source]
        source:  AgentError,
    },
}

pub type SimResult<T> = Result<T, SimError>;
