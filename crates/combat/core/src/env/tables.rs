//! Rule tables: the tunable constants of the combat formulas.
//!
//! Every constant the resolver consults lives behind [`TablesOracle`] so
//! content can rebalance without touching engine code. The defaults
//! reproduce the classic tuning: damage floored at 1, defending doubles
//! defense, crit chance 5% plus 0.1% per point of speed at x1.5 damage,
//! flee chance clamped to 10%-90%.
//!
//! All chances are integers in per-mille (1000 = 100%) so resolution is
//! exact and platform-independent.

use crate::stats::{GrowthTable, StatGain, StatKind};

/// Parameters of the damage formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageParams {
    /// Defense multiplier while the target is defending.
    pub defend_multiplier: i32,
    /// Floor applied after mitigation; a landed hit always costs this much.
    pub minimum_damage: i32,
}

impl Default for DamageParams {
    fn default() -> Self {
        Self {
            defend_multiplier: 2,
            minimum_damage: 1,
        }
    }
}

/// Parameters of the critical-hit roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CritParams {
    /// Base crit chance in per-mille.
    pub base_permille: i32,
    /// Additional per-mille of crit chance per point of speed.
    pub per_speed_permille: i32,
    /// Damage multiplier on crit, in per-mille (1500 = x1.5).
    pub multiplier_permille: i32,
}

impl CritParams {
    /// Crit chance for the given speed, clamped to `[0, 1000]`.
    pub fn chance_permille(&self, speed: i32) -> i32 {
        (self.base_permille + self.per_speed_permille * speed).clamp(0, 1000)
    }
}

impl Default for CritParams {
    fn default() -> Self {
        Self {
            base_permille: 50,
            per_speed_permille: 1,
            multiplier_permille: 1500,
        }
    }
}

/// Parameters of the flee roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleeParams {
    /// Lower clamp on flee chance, in per-mille.
    pub min_permille: i32,
    /// Upper clamp on flee chance, in per-mille.
    pub max_permille: i32,
}

impl Default for FleeParams {
    fn default() -> Self {
        Self {
            min_permille: 100,
            max_permille: 900,
        }
    }
}

/// Read-only access to rule tables.
pub trait TablesOracle: Send + Sync {
    fn damage_params(&self) -> DamageParams;

    fn crit_params(&self) -> CritParams;

    fn flee_params(&self) -> FleeParams;

    /// Experience thresholds and per-level gains for players.
    fn growth(&self) -> &GrowthTable;
}

/// In-memory tables with the default tuning.
#[derive(Clone, Debug)]
pub struct DefaultTables {
    pub damage: DamageParams,
    pub crit: CritParams,
    pub flee: FleeParams,
    pub growth: GrowthTable,
}

impl DefaultTables {
    /// Default growth: 100 experience per level, linear, capped at 99.
    pub fn standard_growth() -> GrowthTable {
        GrowthTable::linear(
            100,
            98,
            vec![
                StatGain::new(StatKind::MaxHealth, 20),
                StatGain::new(StatKind::MaxMana, 10),
                StatGain::new(StatKind::Attack, 2),
                StatGain::new(StatKind::Defense, 1),
                StatGain::new(StatKind::Speed, 1),
            ],
        )
    }
}

impl Default for DefaultTables {
    fn default() -> Self {
        Self {
            damage: DamageParams::default(),
            crit: CritParams::default(),
            flee: FleeParams::default(),
            growth: Self::standard_growth(),
        }
    }
}

impl TablesOracle for DefaultTables {
    fn damage_params(&self) -> DamageParams {
        self.damage
    }

    fn crit_params(&self) -> CritParams {
        self.crit
    }

    fn flee_params(&self) -> FleeParams {
        self.flee
    }

    fn growth(&self) -> &GrowthTable {
        &self.growth
    }
}
