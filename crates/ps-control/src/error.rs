use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("reference path is empty")]
    EmptyPath,

    #[error("vehicle state diverged: x={x} y={y} psi={psi} v={v}")]
    DivergedState { x: f64, y: f64, psi: f64, v: f64 },
}

pub type ControlResult<T> = Result<T, ControlError>;
