//! Status-effect lifecycle: application, stacking, per-turn ticking, expiry.
//!
//! Effects are owned exclusively by the entity holding them and only ever
//! act on their holder. The effect list is capped
//! ([`CombatConfig::MAX_EFFECTS`]); a new distinct effect applied at
//! capacity is dropped.
//!
//! # Stacking
//!
//! Two effects stack by identity `(kind, source)`: re-applying refreshes
//! the remaining duration of the existing entry instead of duplicating it.
//!
//! # Ticking
//!
//! [`tick`] runs once per living holder per completed round. Damage and
//! healing from DOT/HOT effects flow through the same health-mutation path
//! as direct damage ([`Entity::lose_health`] / [`Entity::heal`]), so the
//! alive invariant is enforced identically. Stat modifiers install their
//! delta once on application and remove it on expiry.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::entity::{Entity, EntityId};
use crate::stats::StatKind;

/// Behavioral flags an effect can assert on its holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusFlag {
    /// Holder cannot act; the orchestrator substitutes a no-op.
    Stunned,
}

/// Identifies where an effect came from, for stacking purposes.
///
/// `origin` is a content-assigned handle (item or ability id); intrinsic
/// effects use 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSource {
    pub applier: EntityId,
    pub origin: u16,
}

impl EffectSource {
    pub const fn new(applier: EntityId, origin: u16) -> Self {
        Self { applier, origin }
    }

    /// Source for effects the entity applies to itself outside of content.
    pub const fn intrinsic(applier: EntityId) -> Self {
        Self { applier, origin: 0 }
    }
}

/// Closed set of effect kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Temporary delta to one stat while active.
    StatModifier { stat: StatKind },

    /// Loses `magnitude` health per tick.
    DamageOverTime,

    /// Restores `magnitude` health per tick.
    HealOverTime,

    /// Asserts a behavioral flag while active.
    Status { flag: StatusFlag },

    /// Content-defined effect the engine tracks but does not interpret.
    Custom { id: u16 },
}

/// A timed modifier applied to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    pub magnitude: i32,
    /// Turns left; decremented once per full turn cycle the holder
    /// survives. An effect reaching 0 is removed in the same tick.
    pub remaining: u16,
    pub source: EffectSource,
}

impl Effect {
    pub const fn new(kind: EffectKind, magnitude: i32, duration: u16, source: EffectSource) -> Self {
        Self {
            kind,
            magnitude,
            remaining: duration,
            source,
        }
    }
}

/// Effect payload as defined by content, before a source is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub kind: EffectKind,
    pub magnitude: i32,
    pub duration: u16,
}

impl EffectSpec {
    pub const fn new(kind: EffectKind, magnitude: i32, duration: u16) -> Self {
        Self {
            kind,
            magnitude,
            duration,
        }
    }

    pub fn into_effect(self, source: EffectSource) -> Effect {
        Effect::new(self.kind, self.magnitude, self.duration, source)
    }
}

/// What one tick did to an entity, for the round log.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub damage: i32,
    pub healing: i32,
    pub expired: Vec<EffectKind>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.damage == 0 && self.healing == 0 && self.expired.is_empty()
    }
}

/// Apply an effect to an entity, refreshing duration on a stacking match.
///
/// Stat-modifier deltas and status flags are installed exactly once, at
/// first application; a refresh only resets `remaining`.
pub fn apply(entity: &mut Entity, effect: Effect) {
    if let Some(existing) = entity
        .effects
        .iter_mut()
        .find(|e| e.kind == effect.kind && e.source == effect.source)
    {
        existing.remaining = effect.remaining;
        return;
    }

    if entity.effects.is_full() {
        return;
    }

    match effect.kind {
        EffectKind::StatModifier { stat } => entity.stats.add_modifier(stat, effect.magnitude),
        EffectKind::Status { flag } => entity.set_status_flag(flag, true),
        _ => {}
    }
    entity.effects.push(effect);
}

/// Tick every active effect on an entity once.
///
/// Applies per-turn contributions, decrements durations, and removes
/// expired effects (un-installing their deltas and flags) in the same
/// pass. No-op on a dead entity.
pub fn tick(entity: &mut Entity) -> TickReport {
    let mut report = TickReport::default();
    if !entity.is_alive() {
        return report;
    }

    // The list is detached while contributions run so the entity's stats
    // and flags can be mutated through its own methods.
    let mut effects: ArrayVec<Effect, { CombatConfig::MAX_EFFECTS }> =
        std::mem::take(&mut entity.effects);

    for effect in &effects {
        match effect.kind {
            EffectKind::DamageOverTime => {
                report.damage += entity.lose_health(effect.magnitude.max(0));
            }
            EffectKind::HealOverTime => {
                report.healing += entity.heal(effect.magnitude.max(0));
            }
            EffectKind::Status { flag } => entity.set_status_flag(flag, true),
            EffectKind::StatModifier { .. } | EffectKind::Custom { .. } => {}
        }
    }

    for effect in effects.iter_mut() {
        effect.remaining = effect.remaining.saturating_sub(1);
    }

    let mut kept: ArrayVec<Effect, { CombatConfig::MAX_EFFECTS }> = ArrayVec::new();
    let mut expired: ArrayVec<Effect, { CombatConfig::MAX_EFFECTS }> = ArrayVec::new();
    for effect in effects.drain(..) {
        if effect.remaining == 0 {
            expired.push(effect);
        } else {
            kept.push(effect);
        }
    }

    for effect in &expired {
        match effect.kind {
            EffectKind::StatModifier { stat } => {
                entity.stats.remove_modifier(stat, effect.magnitude);
            }
            EffectKind::Status { flag } => {
                let still_asserted = kept
                    .iter()
                    .any(|e| matches!(e.kind, EffectKind::Status { flag: f } if f == flag));
                if !still_asserted {
                    entity.set_status_flag(flag, false);
                }
            }
            _ => {}
        }
        report.expired.push(effect.kind);
    }

    entity.effects = kept;
    report
}
