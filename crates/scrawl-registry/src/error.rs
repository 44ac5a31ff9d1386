//! Error types for the player registry.

use scrawl_protocol::PlayerId;

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The name is empty after trimming or longer than 20 characters.
    #[error("Name must be between 1 and 20 characters")]
    InvalidName,

    /// No player with this id is registered.
    #[error("Player {0} not found")]
    NotFound(PlayerId),
}

impl RegistryError {
    /// Stable machine-readable error kind for client error events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::NotFound(_) => "not_found",
        }
    }
}
