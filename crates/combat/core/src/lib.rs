//! Deterministic turn-based combat resolution.
//!
//! `combat-core` defines the canonical battle rules: stats, timed effects,
//! entity state, action resolution, enemy behavior and the round loop. The
//! engine is pure and synchronous; content data and randomness reach it
//! only through the oracle traits in [`env`], so a battle is a function of
//! its participants, its rule tables, and its seed. Supporting crates
//! depend on the types re-exported here.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod entity;
pub mod env;
pub mod error;
pub mod stats;
pub use action::{
    ActionOutcome, CombatAction, CombatOutcome, CombatReport, EffectTickRecord, ItemConsumed,
    Rewards, TurnRecord,
};
pub use ai::Behavior;
pub use config::CombatConfig;
pub use effect::{Effect, EffectKind, EffectSource, EffectSpec, StatusFlag, TickReport};
pub use engine::{
    ActionProvider, BattleResult, CombatEngine, CombatPhase, RoundObserver, Roster, round_order,
};
pub use entity::{
    AbilitySlot, CombatFlags, EnemyProfile, EnemyRank, Entity, EntityId, EntityRole, LootDrop,
    LootEntry, PlayerClass,
};
pub use env::{
    AbilityDefinition, AbilityHandle, AbilityOracle, AbilityPower, CombatEnv, CritParams,
    DamageParams, DefaultTables, EmptyInventory, FleeParams, InventoryOracle, ItemDefinition,
    ItemHandle, ItemOracle, ItemPayload, PcgRng, RngOracle, TablesOracle, compute_seed,
};
pub use error::{CombatError, ErrorSeverity, IllegalActionReason, ResourceKind, SetupError};
pub use stats::{GrowthTable, StatBlock, StatGain, StatKind};
