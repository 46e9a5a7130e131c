//! Entity state: the health/mana/alive/stunned/defending state machine
//! shared by players and enemies.
//!
//! Players and enemies are one struct with a role variant rather than a
//! class hierarchy: the shared state-machine operations (`take_damage`,
//! `heal`, effect ticking, experience) are implemented once against the
//! common fields, and role-specific behavior (AI selection, loot, class
//! bonuses) dispatches on an explicit match.
//!
//! The central invariant, enforced on every health mutation:
//! `is_alive == (health > 0)` and `0 <= health <= max_health`. A dead
//! entity stays in the roster for reward accounting until combat ends.

mod enemy;

pub use enemy::{AbilitySlot, EnemyProfile, EnemyRank, LootDrop, LootEntry};

use std::fmt;

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::ai::Behavior;
use crate::config::CombatConfig;
use crate::effect::{Effect, StatusFlag};
use crate::env::DamageParams;
use crate::stats::{GrowthTable, StatBlock, StatKind};

/// Unique identifier for a combat participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Combat-state flags.
    ///
    /// `ALIVE` is derived state managed exclusively by the health path;
    /// callers toggle only `STUNNED`/`DEFENDING`, and `FLED` is set once
    /// by the orchestrator when a flee succeeds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatFlags: u8 {
        const ALIVE = 1;
        const STUNNED = 1 << 1;
        const DEFENDING = 1 << 2;
        const FLED = 1 << 3;
    }
}

/// Available player classes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlayerClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

impl PlayerClass {
    /// Stat bonuses layered over the player base block at creation.
    fn bonuses(&self) -> &'static [(StatKind, i32)] {
        match self {
            Self::Warrior => &[
                (StatKind::MaxHealth, 30),
                (StatKind::Attack, 5),
                (StatKind::Defense, 3),
            ],
            Self::Mage => &[
                (StatKind::MaxMana, 40),
                (StatKind::Attack, 3),
                (StatKind::Speed, 2),
            ],
            Self::Rogue => &[
                (StatKind::Speed, 5),
                (StatKind::Attack, 4),
                (StatKind::Defense, 1),
            ],
            Self::Cleric => &[
                (StatKind::MaxHealth, 20),
                (StatKind::MaxMana, 30),
                (StatKind::Defense, 2),
            ],
        }
    }
}

/// Role discriminator with role-specific payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityRole {
    Player { class: PlayerClass },
    Enemy(EnemyProfile),
}

/// A combat participant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub level: u32,
    pub role: EntityRole,
    pub stats: StatBlock,
    pub effects: ArrayVec<Effect, { CombatConfig::MAX_EFFECTS }>,
    flags: CombatFlags,
}

impl Entity {
    /// Base stats shared by all players before class bonuses.
    fn player_base() -> StatBlock {
        StatBlock::new(120, 60, 12, 8, 10)
    }

    /// Base stats shared by all enemies before rank bonuses.
    fn enemy_base() -> StatBlock {
        StatBlock::new(80, 40, 8, 4, 8)
    }

    /// Create a level-1 player of the given class.
    pub fn player(id: EntityId, name: impl Into<String>, class: PlayerClass) -> Self {
        let mut stats = Self::player_base();
        for &(stat, bonus) in class.bonuses() {
            stats.modify(stat, bonus);
        }
        // Class health/mana bonuses raise the maximums; start full.
        stats.set(StatKind::Health, stats.get(StatKind::MaxHealth));
        stats.set(StatKind::Mana, stats.get(StatKind::MaxMana));

        Self::from_parts(id, name, 1, EntityRole::Player { class }, stats)
    }

    /// Create an enemy of the given rank and behavior.
    ///
    /// Rank bonuses and level-scaled rewards are applied here; loot and
    /// abilities are attached afterwards from content templates.
    pub fn enemy(
        id: EntityId,
        name: impl Into<String>,
        rank: EnemyRank,
        behavior: Behavior,
        level: u32,
    ) -> Self {
        let mut stats = Self::enemy_base();
        for &(stat, bonus) in rank.bonuses() {
            stats.modify(stat, bonus);
        }
        stats.set(StatKind::Health, stats.get(StatKind::MaxHealth));
        stats.set(StatKind::Mana, stats.get(StatKind::MaxMana));

        let profile = EnemyProfile::new(rank, behavior, level);
        Self::from_parts(id, name, level, EntityRole::Enemy(profile), stats)
    }

    /// Rebuild an entity from externally persisted snapshot data.
    pub fn from_parts(
        id: EntityId,
        name: impl Into<String>,
        level: u32,
        role: EntityRole,
        stats: StatBlock,
    ) -> Self {
        let alive = stats.get(StatKind::Health) > 0;
        Self {
            id,
            name: name.into(),
            level,
            role,
            stats,
            effects: ArrayVec::new(),
            flags: if alive {
                CombatFlags::ALIVE
            } else {
                CombatFlags::empty()
            },
        }
    }

    // ========================================================================
    // Flags
    // ========================================================================

    pub fn is_alive(&self) -> bool {
        self.flags.contains(CombatFlags::ALIVE)
    }

    pub fn is_stunned(&self) -> bool {
        self.flags.contains(CombatFlags::STUNNED)
    }

    pub fn is_defending(&self) -> bool {
        self.flags.contains(CombatFlags::DEFENDING)
    }

    pub fn has_fled(&self) -> bool {
        self.flags.contains(CombatFlags::FLED)
    }

    /// Alive and still participating (not fled).
    pub fn is_active(&self) -> bool {
        self.is_alive() && !self.has_fled()
    }

    pub fn set_defending(&mut self, defending: bool) {
        self.flags.set(CombatFlags::DEFENDING, defending);
    }

    /// Remove the actor from active participation without killing it.
    pub fn mark_fled(&mut self) {
        self.flags.insert(CombatFlags::FLED);
    }

    pub(crate) fn set_status_flag(&mut self, flag: StatusFlag, asserted: bool) {
        match flag {
            StatusFlag::Stunned => self.flags.set(CombatFlags::STUNNED, asserted),
        }
    }

    // ========================================================================
    // Health and mana
    // ========================================================================

    /// The single health-mutation path for damage.
    ///
    /// Subtracts raw health with no mitigation, floors at 0, and clears
    /// `ALIVE` (along with turn-scoped flags) on death. Returns the
    /// health actually lost; a dead entity loses nothing.
    pub fn lose_health(&mut self, amount: i32) -> i32 {
        if !self.is_alive() || amount <= 0 {
            return 0;
        }
        let before = self.stats.get(StatKind::Health);
        self.stats.set(StatKind::Health, before - amount);
        let after = self.stats.get(StatKind::Health);
        if after == 0 {
            self.flags = CombatFlags::empty();
        }
        before - after
    }

    /// Apply incoming attack damage through the defense formula.
    ///
    /// `raw` is the attacker's scaled attack value; defense (doubled while
    /// defending) is subtracted and the result floored at the configured
    /// minimum before it hits the health path. Returns actual damage.
    pub fn take_damage(&mut self, raw: i32, params: &DamageParams) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let damage = crate::combat::mitigate(raw, self.effective_defense(params), params);
        self.lose_health(damage)
    }

    /// Defense with the defend-stance multiplier applied.
    pub fn effective_defense(&self, params: &DamageParams) -> i32 {
        let defense = self.stats.get(StatKind::Defense);
        if self.is_defending() {
            defense.saturating_mul(params.defend_multiplier)
        } else {
            defense
        }
    }

    /// Heal up to `max_health`; no-op while dead. Returns actual healing.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() || amount <= 0 {
            return 0;
        }
        let before = self.stats.get(StatKind::Health);
        self.stats.set(StatKind::Health, before + amount);
        self.stats.get(StatKind::Health) - before
    }

    /// Restore mana up to `max_mana`. Returns actual restoration.
    pub fn restore_mana(&mut self, amount: i32) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let before = self.stats.get(StatKind::Mana);
        self.stats.set(StatKind::Mana, before + amount);
        self.stats.get(StatKind::Mana) - before
    }

    /// Spend mana if available; returns false without mutating otherwise.
    pub fn spend_mana(&mut self, cost: i32) -> bool {
        let current = self.stats.get(StatKind::Mana);
        if current < cost {
            return false;
        }
        self.stats.set(StatKind::Mana, current - cost);
        true
    }

    pub fn health_ratio(&self) -> f32 {
        self.stats.ratio(StatKind::Health, StatKind::MaxHealth)
    }

    pub fn mana_ratio(&self) -> f32 {
        self.stats.ratio(StatKind::Mana, StatKind::MaxMana)
    }

    // ========================================================================
    // Progression
    // ========================================================================

    /// Accumulate experience, leveling up for every threshold crossed.
    ///
    /// Each level-up applies the table's stat gains and restores health
    /// and mana to their (possibly new) maximums. Returns levels gained.
    pub fn add_experience(&mut self, amount: i32, growth: &GrowthTable) -> u32 {
        self.stats.modify(StatKind::Experience, amount);
        let total = self.stats.get(StatKind::Experience);

        let mut gained = 0;
        while let Some(threshold) = growth.threshold_for(self.level) {
            if total < threshold {
                break;
            }
            self.level += 1;
            gained += 1;
            for gain in growth.gains() {
                self.stats.modify(gain.stat, gain.amount);
            }
            self.stats
                .set(StatKind::Health, self.stats.get(StatKind::MaxHealth));
            self.stats
                .set(StatKind::Mana, self.stats.get(StatKind::MaxMana));
        }
        gained
    }

    // ========================================================================
    // Role dispatch
    // ========================================================================

    pub fn is_player(&self) -> bool {
        matches!(self.role, EntityRole::Player { .. })
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.role, EntityRole::Enemy(_))
    }

    pub fn enemy_profile(&self) -> Option<&EnemyProfile> {
        match &self.role {
            EntityRole::Enemy(profile) => Some(profile),
            EntityRole::Player { .. } => None,
        }
    }

    pub fn enemy_profile_mut(&mut self) -> Option<&mut EnemyProfile> {
        match &mut self.role {
            EntityRole::Enemy(profile) => Some(profile),
            EntityRole::Player { .. } => None,
        }
    }

    /// Clear turn-scoped state at combat boundaries.
    pub fn reset_combat_state(&mut self) {
        self.flags.remove(CombatFlags::STUNNED | CombatFlags::DEFENDING);
        self.stats.clear_modifiers();
        self.effects.clear();
    }
}
