use thiserror::Error;

use crate::actions::ActionKind;
use crate::core::types::CityId;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("City not found: {0}")]
    CityNotFound(CityId),

    #[error("Unknown action kind: {0:?}")]
    UnknownActionKind(ActionKind),

    #[error("Invalid delta: {0}")]
    InvalidDelta(String),

    #[error("A resolution is already in progress")]
    ConcurrentResolutionRejected,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
