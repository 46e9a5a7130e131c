//! Stat-growth tables: experience thresholds and per-level gains.
//!
//! Thresholds and gain values are content-supplied configuration, not
//! engine constants. The same level-up algorithm runs for players and
//! enemies; only the table values differ.

use super::StatKind;
use crate::error::SetupError;

/// One stat gained per level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatGain {
    pub stat: StatKind,
    pub amount: i32,
}

impl StatGain {
    pub const fn new(stat: StatKind, amount: i32) -> Self {
        Self { stat, amount }
    }
}

/// Experience thresholds and the stat gains applied on each level-up.
///
/// `thresholds[i]` is the total accumulated experience required to reach
/// level `i + 2` (level 1 needs no experience). Thresholds must be
/// strictly increasing; an entity at the last threshold is at the level
/// cap and accumulates experience without further level-ups.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthTable {
    thresholds: Vec<i32>,
    gains: Vec<StatGain>,
}

impl GrowthTable {
    pub fn new(thresholds: Vec<i32>, gains: Vec<StatGain>) -> Self {
        Self { thresholds, gains }
    }

    /// Linear thresholds: `base, 2*base, 3*base, ...` up to `levels`.
    pub fn linear(base: i32, levels: usize, gains: Vec<StatGain>) -> Self {
        let thresholds = (1..=levels as i32).map(|n| n * base).collect();
        Self { thresholds, gains }
    }

    /// Total experience required to advance past the given level.
    ///
    /// Returns `None` at or beyond the level cap.
    pub fn threshold_for(&self, level: u32) -> Option<i32> {
        if level == 0 {
            return self.thresholds.first().copied();
        }
        self.thresholds.get(level as usize - 1).copied()
    }

    /// Highest level the table can produce.
    pub fn level_cap(&self) -> u32 {
        self.thresholds.len() as u32 + 1
    }

    pub fn gains(&self) -> &[StatGain] {
        &self.gains
    }

    /// Check table invariants before combat setup.
    ///
    /// Thresholds must be non-empty, positive, and strictly increasing;
    /// gains must target growable stats. Current resources and experience
    /// are managed by the entity itself, so a table naming them is
    /// malformed content.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.thresholds.is_empty() {
            return Err(SetupError::MalformedGrowthTable {
                reason: "no experience thresholds",
            });
        }
        if self.thresholds[0] <= 0 {
            return Err(SetupError::MalformedGrowthTable {
                reason: "first threshold must be positive",
            });
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SetupError::MalformedGrowthTable {
                reason: "thresholds must be strictly increasing",
            });
        }
        for gain in &self.gains {
            match gain.stat {
                StatKind::Health | StatKind::Mana | StatKind::Experience => {
                    return Err(SetupError::MalformedGrowthTable {
                        reason: "gains may only target growable stats",
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GrowthTable {
        GrowthTable::linear(
            100,
            10,
            vec![
                StatGain::new(StatKind::MaxHealth, 10),
                StatGain::new(StatKind::Attack, 2),
            ],
        )
    }

    #[test]
    fn linear_thresholds_reproduce_level_times_base() {
        let t = table();
        assert_eq!(t.threshold_for(1), Some(100));
        assert_eq!(t.threshold_for(2), Some(200));
        assert_eq!(t.threshold_for(10), Some(1000));
        assert_eq!(t.threshold_for(11), None);
        assert_eq!(t.level_cap(), 11);
    }

    #[test]
    fn validation_rejects_non_monotone_thresholds() {
        let t = GrowthTable::new(vec![100, 100], vec![]);
        assert!(matches!(
            t.validate(),
            Err(SetupError::MalformedGrowthTable { .. })
        ));
    }

    #[test]
    fn validation_rejects_resource_gains() {
        let t = GrowthTable::new(vec![100], vec![StatGain::new(StatKind::Health, 5)]);
        assert!(t.validate().is_err());

        let t = GrowthTable::new(vec![100], vec![StatGain::new(StatKind::MaxHealth, 5)]);
        assert!(t.validate().is_ok());
    }
}
