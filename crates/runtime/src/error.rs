//! Runtime error type.

use combat_core::{CombatError, SetupError};

/// Errors surfaced while building or driving a battle session.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("no enemy template named '{key}'")]
    UnknownEnemy { key: String },

    #[error("battle setup failed: {0}")]
    Setup(#[from] SetupError),

    #[error("combat failed: {0}")]
    Combat(#[from] CombatError),
}
