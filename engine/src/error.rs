//! Errors surfaced at the engine boundary.

use crate::config::ConfigError;

/// Failures reported by [`crate::Session`] and [`crate::Simulation`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A game was advanced or inspected before it was initialised.
    #[error("simulation has not been initialized")]
    NotInitialized,
    /// The game configuration was refused.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
