//! Stat model: the typed stat bag shared by every combatant.
//!
//! Stats are stored explicitly rather than behind dynamic lookup; the
//! [`StatKind`] enum is closed, so `get` is total and the "unknown stat"
//! failure mode only exists at the content boundary where stat names
//! arrive as strings (see [`crate::error::CombatError::UnknownStat`]).
//!
//! Base values and temporary modifiers are kept separate: effects install
//! a delta that can be removed symmetrically when they expire, without
//! ever corrupting the stored base value.

mod growth;

pub use growth::{GrowthTable, StatGain};

/// Core stat kinds for entities.
///
/// String forms (snake_case) are what content files use to reference
/// stats, e.g. in stat-modifier effect definitions and growth tables.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatKind {
    Health,
    MaxHealth,
    Mana,
    MaxMana,
    Attack,
    Defense,
    Speed,
    Experience,
}

/// Calculate a resource percentage with safe division.
///
/// Returns a value in `[0.0, 1.0]`; a zero or negative maximum yields
/// `0.0` rather than a division fault.
pub fn percentage(current: i32, maximum: i32) -> f32 {
    if maximum <= 0 {
        return 0.0;
    }
    (current as f32 / maximum as f32).clamp(0.0, 1.0)
}

/// An entity's numeric attributes plus a temporary-modifier overlay.
///
/// Invariants, enforced on every mutation:
/// - every base value is >= 0
/// - `health <= max_health`, `mana <= max_mana`
///
/// Modifiers are transient combat-time deltas (from effects) and may be
/// negative; effective values are floored at 0 when read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    health: i32,
    max_health: i32,
    mana: i32,
    max_mana: i32,
    attack: i32,
    defense: i32,
    speed: i32,
    experience: i32,
    modifiers: StatDeltas,
}

/// Signed per-stat deltas installed by stat-modifier effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct StatDeltas {
    health: i32,
    max_health: i32,
    mana: i32,
    max_mana: i32,
    attack: i32,
    defense: i32,
    speed: i32,
    experience: i32,
}

impl StatDeltas {
    fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Health => self.health,
            StatKind::MaxHealth => self.max_health,
            StatKind::Mana => self.mana,
            StatKind::MaxMana => self.max_mana,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::Experience => self.experience,
        }
    }

    fn get_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::MaxHealth => &mut self.max_health,
            StatKind::Mana => &mut self.mana,
            StatKind::MaxMana => &mut self.max_mana,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
            StatKind::Experience => &mut self.experience,
        }
    }
}

impl StatBlock {
    /// Create a stat block with current resources at their maximums.
    pub fn new(max_health: i32, max_mana: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            health: max_health.max(0),
            max_health: max_health.max(0),
            mana: max_mana.max(0),
            max_mana: max_mana.max(0),
            attack: attack.max(0),
            defense: defense.max(0),
            speed: speed.max(0),
            experience: 0,
            modifiers: StatDeltas::default(),
        }
    }

    /// Effective value: stored base plus temporary modifiers, floored at 0.
    pub fn get(&self, kind: StatKind) -> i32 {
        (self.base(kind) + self.modifiers.get(kind)).max(0)
    }

    /// Stored base value, without temporary modifiers.
    pub fn base(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Health => self.health,
            StatKind::MaxHealth => self.max_health,
            StatKind::Mana => self.mana,
            StatKind::MaxMana => self.max_mana,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
            StatKind::Experience => self.experience,
        }
    }

    /// Store a base value, clamped to the stat's valid range.
    ///
    /// Health clamps to `[0, max_health]`, mana to `[0, max_mana]`, all
    /// other stats to `[0, i32::MAX]`. Raising a maximum never changes the
    /// current resource; lowering one re-clamps it.
    pub fn set(&mut self, kind: StatKind, value: i32) {
        let value = value.max(0);
        match kind {
            StatKind::Health => self.health = value.min(self.max_health),
            StatKind::MaxHealth => {
                self.max_health = value;
                self.health = self.health.min(self.max_health);
            }
            StatKind::Mana => self.mana = value.min(self.max_mana),
            StatKind::MaxMana => {
                self.max_mana = value;
                self.mana = self.mana.min(self.max_mana);
            }
            StatKind::Attack => self.attack = value,
            StatKind::Defense => self.defense = value,
            StatKind::Speed => self.speed = value,
            StatKind::Experience => self.experience = value,
        }
    }

    /// Equivalent to `set(kind, get(kind) + delta)`.
    pub fn modify(&mut self, kind: StatKind, delta: i32) {
        self.set(kind, self.get(kind) + delta);
    }

    /// Install a temporary modifier delta (may be negative).
    pub fn add_modifier(&mut self, kind: StatKind, amount: i32) {
        *self.modifiers.get_mut(kind) += amount;
    }

    /// Remove a previously installed modifier delta.
    pub fn remove_modifier(&mut self, kind: StatKind, amount: i32) {
        *self.modifiers.get_mut(kind) -= amount;
    }

    /// Drop all temporary modifiers (end of combat).
    pub fn clear_modifiers(&mut self) {
        self.modifiers = StatDeltas::default();
    }

    /// Current-over-maximum ratio for a resource pair, in `[0.0, 1.0]`.
    pub fn ratio(&self, current: StatKind, maximum: StatKind) -> f32 {
        percentage(self.get(current), self.get(maximum))
    }
}
