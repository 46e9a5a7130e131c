//! Flee chance computation.

use crate::env::FleeParams;

/// Flee chance in per-mille: the actor's speed over the combined speed of
/// itself and its active opponents, clamped to the configured band.
///
/// With no active opponents left the chance clamps to the maximum.
pub fn chance_permille(speed: i32, opponent_speed_sum: i32, params: &FleeParams) -> i32 {
    let speed = speed.max(0);
    let total = speed + opponent_speed_sum.max(0);
    let raw = if total <= 0 {
        params.max_permille
    } else {
        speed.saturating_mul(1000) / total
    };
    raw.clamp(params.min_permille, params.max_permille)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_speeds_give_even_odds() {
        let params = FleeParams::default();
        assert_eq!(chance_permille(10, 10, &params), 500);
    }

    #[test]
    fn chance_clamps_to_band() {
        let params = FleeParams::default();
        // Very slow actor against fast opponents.
        assert_eq!(chance_permille(1, 1000, &params), 100);
        // Very fast actor, and the degenerate no-opponents case.
        assert_eq!(chance_permille(1000, 1, &params), 900);
        assert_eq!(chance_permille(10, 0, &params), 900);
        assert_eq!(chance_permille(0, 0, &params), 900);
    }
}
