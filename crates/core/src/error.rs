//! Error types for engine setup paths
//!
//! Event dispatch itself never fails: a faulting script callback is logged
//! and skipped. Errors only surface while creating states, running script
//! chunks and loading configuration.

use ale_sdk::StateId;

use crate::config::ConfigError;

/// Error type for engine lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum AleError {
    /// The Lua runtime reported an error
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),

    /// Loading or saving the configuration failed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Operation requires an initialized engine
    #[error("ALE is not initialized")]
    NotInitialized,

    /// No execution context exists for the given id
    #[error("State not found: {0}")]
    StateNotFound(StateId),

    /// The id cannot name an execution context
    #[error("Invalid state id: {0}")]
    InvalidStateId(StateId),
}

/// Result type for engine lifecycle operations
pub type AleResult<T> = Result<T, AleError>;
