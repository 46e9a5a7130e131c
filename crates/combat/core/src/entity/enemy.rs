//! Enemy-specific payload: rank scaling, rewards, abilities, loot.

use arrayvec::ArrayVec;

use crate::ai::Behavior;
use crate::config::CombatConfig;
use crate::env::{AbilityHandle, ItemHandle, RngOracle, compute_seed};
use crate::stats::StatKind;

/// Enemy rank, scaling both stats and rewards.
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
pub enum EnemyRank {
    Normal,
    Elite,
    Miniboss,
    Boss,
}

impl EnemyRank {
    /// Flat stat bonuses layered over the enemy base block.
    pub(crate) fn bonuses(&self) -> &'static [(StatKind, i32)] {
        match self {
            Self::Normal => &[],
            Self::Elite => &[
                (StatKind::MaxHealth, 50),
                (StatKind::Attack, 5),
                (StatKind::Defense, 3),
                (StatKind::Speed, 2),
            ],
            Self::Miniboss => &[
                (StatKind::MaxHealth, 100),
                (StatKind::Attack, 8),
                (StatKind::Defense, 5),
                (StatKind::Speed, 3),
            ],
            Self::Boss => &[
                (StatKind::MaxHealth, 200),
                (StatKind::Attack, 15),
                (StatKind::Defense, 10),
                (StatKind::Speed, 5),
            ],
        }
    }

    /// Reward multiplier in per-mille (1000 = x1.0).
    pub const fn reward_multiplier_permille(&self) -> i32 {
        match self {
            Self::Normal => 1000,
            Self::Elite => 1500,
            Self::Miniboss => 2000,
            Self::Boss => 3000,
        }
    }
}

/// One possible item drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: ItemHandle,
    /// Drop chance in per-mille, rolled independently per entry.
    pub chance_permille: u16,
    pub quantity: u32,
}

/// A rolled drop from a defeated enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub item: ItemHandle,
    pub quantity: u32,
}

/// An ability an enemy can use, with its cooldown counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySlot {
    pub ability: AbilityHandle,
    /// Rounds until usable again; 0 means ready.
    pub ready_in: u16,
}

/// Enemy rank, behavior policy, rewards, abilities and loot table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyProfile {
    pub rank: EnemyRank,
    pub behavior: Behavior,
    /// Experience granted on defeat, already rank-scaled.
    pub experience_reward: i32,
    /// Gold granted on defeat, already rank-scaled.
    pub gold_reward: i32,
    pub abilities: ArrayVec<AbilitySlot, { CombatConfig::MAX_ABILITIES }>,
    pub loot: Vec<LootEntry>,
}

impl EnemyProfile {
    /// Base rewards are 10 experience and 5 gold per level, scaled by rank.
    pub fn new(rank: EnemyRank, behavior: Behavior, level: u32) -> Self {
        let level = level.max(1) as i32;
        let multiplier = rank.reward_multiplier_permille();
        Self {
            rank,
            behavior,
            experience_reward: level * 10 * multiplier / 1000,
            gold_reward: level * 5 * multiplier / 1000,
            abilities: ArrayVec::new(),
            loot: Vec::new(),
        }
    }

    /// Attach an ability, starting off cooldown. Ignored when the slot
    /// list is full or the ability is already present.
    pub fn add_ability(&mut self, ability: AbilityHandle) {
        if self.abilities.iter().any(|s| s.ability == ability) || self.abilities.is_full() {
            return;
        }
        self.abilities.push(AbilitySlot {
            ability,
            ready_in: 0,
        });
    }

    /// Abilities currently off cooldown, in slot order.
    pub fn ready_abilities(&self) -> impl Iterator<Item = AbilityHandle> + '_ {
        self.abilities
            .iter()
            .filter(|s| s.ready_in == 0)
            .map(|s| s.ability)
    }

    /// Put an ability on cooldown after use.
    pub fn start_cooldown(&mut self, ability: AbilityHandle, rounds: u16) {
        if let Some(slot) = self.abilities.iter_mut().find(|s| s.ability == ability) {
            slot.ready_in = rounds;
        }
    }

    /// Advance every cooldown by one round.
    pub fn tick_cooldowns(&mut self) {
        for slot in self.abilities.iter_mut() {
            slot.ready_in = slot.ready_in.saturating_sub(1);
        }
    }

    /// Roll each loot entry independently against the battle RNG.
    ///
    /// `seed` is the per-defeat seed derived by the orchestrator; each
    /// entry rolls with its own context so entries are independent.
    pub fn generate_loot(&self, rng: &dyn RngOracle, seed: u64) -> Vec<LootDrop> {
        self.loot
            .iter()
            .enumerate()
            .filter(|(index, entry)| {
                let roll = rng.roll_permille(compute_seed(seed, *index as u64, 0, 0));
                roll < u32::from(entry.chance_permille)
            })
            .map(|(_, entry)| LootDrop {
                item: entry.item,
                quantity: entry.quantity,
            })
            .collect()
    }
}
