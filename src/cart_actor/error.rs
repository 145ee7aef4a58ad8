//! Error types for the Cart actor.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found: {0}")]
    NotFound(String),

    #[error("Invalid cart operation: {0}")]
    Validation(String),

    #[error("Cart store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<FrameworkError> for CartError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CartError::NotFound(id),
            e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                CartError::StoreUnavailable(e.to_string())
            }
            e => e
                .downcast_entity::<CartError>()
                .unwrap_or_else(|other| CartError::StoreUnavailable(other.to_string())),
        }
    }
}
