//! Enemy action selection.
//!
//! Selection is a pure function of the battle state, the round number and
//! the content oracles: no randomness, so replays and tests are exact.
//! Targets are chosen by lowest current health, breaking ties by roster
//! order.

use crate::action::CombatAction;
use crate::entity::{Entity, EntityId};
use crate::env::{AbilityHandle, AbilityPower, CombatEnv};
use crate::stats::StatKind;

/// Health fraction below which defensive enemies guard.
const DEFENSIVE_GUARD_THRESHOLD: f32 = 0.3;
/// Health fraction below which healers prioritize an ally.
const HEALER_TRIAGE_THRESHOLD: f32 = 0.5;

/// Health fraction at or above which balanced enemies always attack.
const BALANCED_ATTACK_THRESHOLD: f32 = 0.5;

/// Behavior policy attached to an enemy.
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
pub enum Behavior {
    /// Always attacks the most wounded opponent.
    Aggressive,
    /// Guards when hurt, otherwise attacks the hardest hitter.
    Defensive,
    /// Attacks while healthy; alternates attack and guard by round
    /// parity once wounded.
    Balanced,
    /// Heals the most wounded ally first, fights otherwise.
    Healer,
    /// Prefers abilities over basic attacks whenever one is castable.
    Spellcaster,
}

/// Pick an action for the enemy at `actor_index`.
///
/// Falls back to [`CombatAction::Defend`] when no valid opponent remains
/// (the orchestrator will normally have ended the battle before then).
pub fn select_action(
    participants: &[Entity],
    actor_index: usize,
    round: u32,
    env: &CombatEnv<'_>,
) -> CombatAction {
    let actor = &participants[actor_index];
    let behavior = actor
        .enemy_profile()
        .map(|p| p.behavior)
        .unwrap_or(Behavior::Balanced);

    let Some(target) = weakest_opponent(participants, actor) else {
        return CombatAction::Defend;
    };

    match behavior {
        Behavior::Aggressive => CombatAction::Attack { target },
        Behavior::Defensive => {
            if actor.health_ratio() < DEFENSIVE_GUARD_THRESHOLD {
                CombatAction::Defend
            } else {
                // Neutralize the biggest threat rather than the weakest.
                let target = strongest_opponent(participants, actor).unwrap_or(target);
                CombatAction::Attack { target }
            }
        }
        Behavior::Balanced => {
            if actor.health_ratio() >= BALANCED_ATTACK_THRESHOLD || round % 2 == 1 {
                CombatAction::Attack { target }
            } else {
                CombatAction::Defend
            }
        }
        Behavior::Healer => {
            let patient = weakest_ally(participants, actor)
                .filter(|&id| health_ratio_of(participants, id) < HEALER_TRIAGE_THRESHOLD);
            match (patient, castable_ability(actor, env, AbilityClass::Heal)) {
                (Some(patient), Some(ability)) => CombatAction::Special {
                    ability,
                    target: patient,
                },
                _ => CombatAction::Attack { target },
            }
        }
        Behavior::Spellcaster => castable_ability(actor, env, AbilityClass::Any)
            .map(|ability| CombatAction::Special { ability, target })
            .unwrap_or(CombatAction::Attack { target }),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum AbilityClass {
    Heal,
    Any,
}

/// First ready ability (slot order) the actor can afford, filtered by class.
fn castable_ability(
    actor: &Entity,
    env: &CombatEnv<'_>,
    class: AbilityClass,
) -> Option<AbilityHandle> {
    let oracle = env.abilities()?;
    let profile = actor.enemy_profile()?;
    let mana = actor.stats.get(StatKind::Mana);

    profile.ready_abilities().find(|&handle| {
        let Some(definition) = oracle.ability(handle) else {
            return false;
        };
        if definition.mana_cost > mana {
            return false;
        }
        match class {
            AbilityClass::Any => true,
            AbilityClass::Heal => matches!(definition.power, AbilityPower::Heal { .. }),
        }
    })
}

/// Lowest-health active entity on the opposing side, ties to lowest id.
fn weakest_opponent(participants: &[Entity], actor: &Entity) -> Option<EntityId> {
    participants
        .iter()
        .filter(|e| e.is_active() && e.is_player() != actor.is_player())
        .min_by_key(|e| (e.stats.get(StatKind::Health), e.id))
        .map(|e| e.id)
}

/// Highest-attack active entity on the opposing side, ties to lowest id.
fn strongest_opponent(participants: &[Entity], actor: &Entity) -> Option<EntityId> {
    participants
        .iter()
        .filter(|e| e.is_active() && e.is_player() != actor.is_player())
        .min_by_key(|e| (std::cmp::Reverse(e.stats.get(StatKind::Attack)), e.id))
        .map(|e| e.id)
}

/// Lowest-health living entity on the actor's own side (self included),
/// ties to lowest id.
fn weakest_ally(participants: &[Entity], actor: &Entity) -> Option<EntityId> {
    participants
        .iter()
        .filter(|e| e.is_active() && e.is_player() == actor.is_player())
        .min_by_key(|e| (e.stats.get(StatKind::Health), e.id))
        .map(|e| e.id)
}

fn health_ratio_of(participants: &[Entity], id: EntityId) -> f32 {
    participants
        .iter()
        .find(|e| e.id == id)
        .map(|e| e.health_ratio())
        .unwrap_or(1.0)
}
