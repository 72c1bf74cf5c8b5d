//! Error types
//!
//! The simulation performs no I/O, so the only runtime failures are contract
//! violations by the caller. Settings loading adds the I/O and parse cases.

use thiserror::Error;

use crate::sim::EntityId;

/// Errors raised by the simulation core and its configuration layer
#[derive(Debug, Error)]
pub enum SimError {
    /// A call sequence that can't happen in a correct caller
    #[error("invalid state for entity {entity}: {reason}")]
    InvalidState { entity: EntityId, reason: &'static str },
    #[error("invalid settings: {0}")]
    Config(String),
    #[error("settings parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings read error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub fn invalid_state(entity: EntityId, reason: &'static str) -> Self {
        SimError::InvalidState { entity, reason }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
