//! Unified error types surfaced by the runtime API.
use thiserror::Error;

use game_core::{EngineError, RegistryError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to parse archetype catalog")]
    Catalog(#[source] serde_json::Error),
}
