//! Damage formulas, kept as pure functions of their inputs.
//!
//! All scaling uses integer per-mille math so identical inputs produce
//! identical damage on every platform.

use crate::env::{CritParams, DamageParams, RngOracle};

/// Mitigate a raw attack value against defense.
///
/// A landed hit always deals at least `minimum_damage`, however high the
/// defense.
pub fn mitigate(raw: i32, defense: i32, params: &DamageParams) -> i32 {
    (raw - defense).max(params.minimum_damage)
}

/// Attack value after the crit multiplier, if any.
pub fn scaled_attack(attack: i32, critical: bool, params: &CritParams) -> i32 {
    if critical {
        attack.saturating_mul(params.multiplier_permille) / 1000
    } else {
        attack
    }
}

/// Roll the critical check for an attacker with the given speed.
pub fn roll_crit(rng: &dyn RngOracle, seed: u64, speed: i32, params: &CritParams) -> bool {
    let chance = params.chance_permille(speed);
    (rng.roll_permille(seed) as i32) < chance
}
