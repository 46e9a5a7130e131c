//! Action and turn data model.
//!
//! A [`CombatAction`] is a pure description of intent; resolving it never
//! happens here. [`TurnRecord`]s accumulate into the battle log, and a
//! finished battle is summarized by a [`CombatReport`].

use crate::entity::{EntityId, LootDrop};
use crate::env::{AbilityHandle, ItemHandle};
use crate::error::CombatError;

/// One combatant's declared intent for its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    /// Basic attack against one opponent.
    Attack { target: EntityId },
    /// Take a defensive stance until the actor's next turn.
    Defend,
    /// Use an inventory item on a target (self included).
    UseItem { item: ItemHandle, target: EntityId },
    /// Attempt to escape the battle.
    Flee,
    /// Use a special ability on a target.
    Special {
        ability: AbilityHandle,
        target: EntityId,
    },
}

impl CombatAction {
    /// The entity this action is aimed at, if any.
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Self::Attack { target }
            | Self::UseItem { target, .. }
            | Self::Special { target, .. } => Some(*target),
            Self::Defend | Self::Flee => None,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Attack { .. } => "attack",
            Self::Defend => "defend",
            Self::UseItem { .. } => "use_item",
            Self::Flee => "flee",
            Self::Special { .. } => "special",
        }
    }
}

/// What actually happened when an action resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    /// An attack or damaging ability landed.
    Hit {
        target: EntityId,
        damage: i32,
        critical: bool,
    },
    /// The actor entered a defensive stance.
    Defended,
    /// An item was used and consumed.
    ItemUsed {
        item: ItemHandle,
        target: EntityId,
        healing: i32,
        mana: i32,
        damage: i32,
    },
    /// A non-damaging ability resolved.
    AbilityUsed {
        ability: AbilityHandle,
        target: EntityId,
        healing: i32,
    },
    /// Flee roll, with the chance that was rolled against.
    FleeAttempt {
        chance_permille: i32,
        success: bool,
    },
    /// The actor was stunned; a no-op was substituted.
    Stunned,
    /// The action failed a recoverable check and the turn was lost.
    Forfeited { error: CombatError },
}

impl ActionOutcome {
    /// Damage this outcome dealt, for log aggregation.
    pub fn damage(&self) -> i32 {
        match self {
            Self::Hit { damage, .. } => *damage,
            Self::ItemUsed { damage, .. } => *damage,
            _ => 0,
        }
    }
}

/// One resolved turn in the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    /// 1-based round number.
    pub round: u32,
    /// Global 0-based turn counter, also the RNG nonce for this turn.
    pub turn: u64,
    pub actor: EntityId,
    /// `None` when no action was declared (stunned no-op).
    pub action: Option<CombatAction>,
    pub outcome: ActionOutcome,
}

/// Per-entity effect activity recorded at the end of a round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectTickRecord {
    pub round: u32,
    pub entity: EntityId,
    pub report: crate::effect::TickReport,
}

/// Terminal state of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CombatOutcome {
    /// Every enemy is dead; surviving players collect rewards.
    Victory,
    /// Every player is dead or has fled with no survivor left fighting.
    Defeat,
    /// The last active player escaped; no rewards.
    Fled,
    /// The round limit was reached with both sides standing.
    Draw,
}

/// Spoils granted to the surviving players on victory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub experience: i32,
    pub gold: i32,
    pub drops: Vec<LootDrop>,
    /// Levels gained per player when the experience was applied.
    pub level_ups: Vec<(EntityId, u32)>,
}

/// Item consumption recorded during a battle, keyed by owner.
///
/// The engine never mutates inventories; the caller applies these
/// decrements after the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemConsumed {
    pub owner: EntityId,
    pub item: ItemHandle,
    pub quantity: u32,
}

/// Full account of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatReport {
    pub outcome: CombatOutcome,
    /// Rounds completed (a battle can end mid-round).
    pub rounds: u32,
    pub turns: Vec<TurnRecord>,
    pub effect_ticks: Vec<EffectTickRecord>,
    pub consumed: Vec<ItemConsumed>,
    /// Present only on victory.
    pub rewards: Option<Rewards>,
}
