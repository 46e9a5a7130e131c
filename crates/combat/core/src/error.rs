//! Error taxonomy for combat resolution.
//!
//! Runtime combat errors are classified by how the orchestrator recovers
//! from them: a forfeited turn, an AI re-selection, a forced no-op, or a
//! hard stop. Setup-time validation has its own error type so that a
//! battle never starts on bad input.

use crate::entity::EntityId;

/// Severity level of an error, used to pick a recovery strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The turn is lost but the battle continues.
    Recoverable,

    /// Content or programming error; the calling operation cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Consumable resource classes an action can run short of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResourceKind {
    Mana,
    Item,
}

/// Why an action was refused outright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IllegalActionReason {
    #[strum(serialize = "unknown item")]
    UnknownItem,
    #[strum(serialize = "unknown ability")]
    UnknownAbility,
    #[strum(serialize = "ability on cooldown")]
    AbilityOnCooldown,
}

/// Errors surfaced while resolving combat actions.
///
/// Recoverable errors end up in the battle log (a forfeited turn), so
/// the enum serializes along with the rest of the report.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    /// A stat name from content data did not match any known stat.
    #[error("unknown stat '{name}'")]
    UnknownStat { name: String },

    /// Mana or item count was too low for the chosen action.
    #[error("{actor} lacks {resource}: required {required}, available {available}")]
    InsufficientResource {
        actor: EntityId,
        resource: ResourceKind,
        required: i32,
        available: i32,
    },

    /// The action references a dead or nonexistent entity.
    #[error("{actor} targeted an invalid entity {target:?}")]
    InvalidTarget {
        actor: EntityId,
        target: Option<EntityId>,
    },

    /// The action is not permitted in the actor's current state.
    #[error("{actor} attempted an illegal action: {reason}")]
    IllegalAction {
        actor: EntityId,
        reason: IllegalActionReason,
    },
}

impl CombatError {
    /// Classifies the error for the orchestrator's recovery logic.
    ///
    /// `UnknownStat` indicates bad content and is fatal to the calling
    /// operation; everything else costs at most the current turn.
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownStat { .. } => ErrorSeverity::Fatal,
            Self::InsufficientResource { .. }
            | Self::InvalidTarget { .. }
            | Self::IllegalAction { .. } => ErrorSeverity::Recoverable,
        }
    }
}

/// Validation errors raised before any combat state is mutated.
///
/// `CombatEngine::new` checks its full input up front; if any of these
/// fire, no battle exists and no participant has been touched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("combat requires at least one {side}")]
    EmptySide { side: &'static str },

    #[error("too many participants: {count} (max {max})")]
    TooManyParticipants { count: usize, max: usize },

    #[error("duplicate entity id {id}")]
    DuplicateId { id: EntityId },

    #[error("malformed growth table: {reason}")]
    MalformedGrowthTable { reason: &'static str },

    #[error("entity {id} has malformed stats: {reason}")]
    MalformedStats { id: EntityId, reason: &'static str },
}
