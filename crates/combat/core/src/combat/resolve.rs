//! Action resolution: validates a declared action against current state
//! and applies its consequences.
//!
//! Resolution is deterministic given the participants, the environment,
//! and the turn nonce. Recoverable [`CombatError`]s bubble up to the
//! orchestrator, which converts them into a forfeited turn.

use crate::action::{ActionOutcome, CombatAction, ItemConsumed};
use crate::combat::{damage, flee};
use crate::effect::{self, EffectSource};
use crate::entity::{Entity, EntityId};
use crate::env::{AbilityHandle, AbilityPower, CombatEnv, ItemHandle, ItemPayload};
use crate::error::{CombatError, IllegalActionReason, ResourceKind};
use crate::stats::StatKind;

/// Roll context for the critical check.
pub const ROLL_CRIT: u32 = 0;
/// Roll context for the flee check.
pub const ROLL_FLEE: u32 = 1;
/// Roll context for loot generation.
pub const ROLL_LOOT: u32 = 2;

/// Mutable resolution state threaded through one turn.
pub struct ResolutionCtx<'a, 'e> {
    pub env: &'a CombatEnv<'e>,
    /// Global turn counter; doubles as the RNG nonce.
    pub nonce: u64,
    /// Running item-consumption ledger for the whole battle.
    pub consumed: &'a mut Vec<ItemConsumed>,
}

impl ResolutionCtx<'_, '_> {
    fn roll_seed(&self, actor: EntityId, context: u32) -> u64 {
        self.env.roll_seed(self.nonce, actor, context)
    }

    /// Stock left for `owner`, net of what this battle already consumed.
    ///
    /// Without an inventory oracle stock is unlimited; consumption is
    /// still recorded for the caller.
    fn remaining_stock(&self, owner: EntityId, item: ItemHandle) -> Option<u32> {
        let initial = self.env.inventory()?.count(owner, item);
        let used: u32 = self
            .consumed
            .iter()
            .filter(|c| c.owner == owner && c.item == item)
            .map(|c| c.quantity)
            .sum();
        Some(initial.saturating_sub(used))
    }

    fn record_consumption(&mut self, owner: EntityId, item: ItemHandle) {
        if let Some(entry) = self
            .consumed
            .iter_mut()
            .find(|c| c.owner == owner && c.item == item)
        {
            entry.quantity += 1;
        } else {
            self.consumed.push(ItemConsumed {
                owner,
                item,
                quantity: 1,
            });
        }
    }
}

fn index_of(participants: &[Entity], id: EntityId) -> Option<usize> {
    participants.iter().position(|e| e.id == id)
}

/// Resolve a target that must be alive and still participating.
fn active_target(
    participants: &[Entity],
    actor: EntityId,
    target: EntityId,
) -> Result<usize, CombatError> {
    match index_of(participants, target) {
        Some(index) if participants[index].is_active() => Ok(index),
        _ => Err(CombatError::InvalidTarget {
            actor,
            target: Some(target),
        }),
    }
}

/// Resolve one declared action against the battle state.
pub fn resolve_action(
    participants: &mut [Entity],
    actor_index: usize,
    action: CombatAction,
    ctx: &mut ResolutionCtx<'_, '_>,
) -> Result<ActionOutcome, CombatError> {
    match action {
        CombatAction::Attack { target } => attack(participants, actor_index, target, ctx),
        CombatAction::Defend => {
            participants[actor_index].set_defending(true);
            Ok(ActionOutcome::Defended)
        }
        CombatAction::UseItem { item, target } => {
            use_item(participants, actor_index, item, target, ctx)
        }
        CombatAction::Flee => attempt_flee(participants, actor_index, ctx),
        CombatAction::Special { ability, target } => {
            use_ability(participants, actor_index, ability, target, ctx)
        }
    }
}

fn attack(
    participants: &mut [Entity],
    actor_index: usize,
    target: EntityId,
    ctx: &mut ResolutionCtx<'_, '_>,
) -> Result<ActionOutcome, CombatError> {
    let actor_id = participants[actor_index].id;
    if target == actor_id {
        return Err(CombatError::InvalidTarget {
            actor: actor_id,
            target: Some(target),
        });
    }
    let target_index = active_target(participants, actor_id, target)?;

    let attack = participants[actor_index].stats.get(StatKind::Attack);
    let speed = participants[actor_index].stats.get(StatKind::Speed);
    let crit_params = ctx.env.tables().crit_params();
    let critical = damage::roll_crit(
        ctx.env.rng(),
        ctx.roll_seed(actor_id, ROLL_CRIT),
        speed,
        &crit_params,
    );
    let raw = damage::scaled_attack(attack, critical, &crit_params);

    let dealt =
        participants[target_index].take_damage(raw, &ctx.env.tables().damage_params());
    Ok(ActionOutcome::Hit {
        target,
        damage: dealt,
        critical,
    })
}

fn use_item(
    participants: &mut [Entity],
    actor_index: usize,
    item: ItemHandle,
    target: EntityId,
    ctx: &mut ResolutionCtx<'_, '_>,
) -> Result<ActionOutcome, CombatError> {
    let actor_id = participants[actor_index].id;

    let definition = ctx
        .env
        .items()
        .and_then(|oracle| oracle.item(item))
        .ok_or(CombatError::IllegalAction {
            actor: actor_id,
            reason: IllegalActionReason::UnknownItem,
        })?
        .clone();

    if let Some(remaining) = ctx.remaining_stock(actor_id, item) {
        if remaining == 0 {
            return Err(CombatError::InsufficientResource {
                actor: actor_id,
                resource: ResourceKind::Item,
                required: 1,
                available: 0,
            });
        }
    }

    let target_index = active_target(participants, actor_id, target)?;

    let mut healing = 0;
    let mut mana = 0;
    let mut dealt = 0;
    match definition.payload {
        ItemPayload::Healing { amount } => {
            healing = participants[target_index].heal(amount);
        }
        ItemPayload::ManaRestore { amount } => {
            mana = participants[target_index].restore_mana(amount);
        }
        // Thrown items bypass defense.
        ItemPayload::Damage { amount } => {
            dealt = participants[target_index].lose_health(amount);
        }
        ItemPayload::Apply(spec) => {
            let source = EffectSource::new(actor_id, item.0);
            effect::apply(&mut participants[target_index], spec.into_effect(source));
        }
    }

    ctx.record_consumption(actor_id, item);
    Ok(ActionOutcome::ItemUsed {
        item,
        target,
        healing,
        mana,
        damage: dealt,
    })
}

fn attempt_flee(
    participants: &mut [Entity],
    actor_index: usize,
    ctx: &mut ResolutionCtx<'_, '_>,
) -> Result<ActionOutcome, CombatError> {
    let actor_id = participants[actor_index].id;
    let actor_is_player = participants[actor_index].is_player();
    let speed = participants[actor_index].stats.get(StatKind::Speed);

    let opponent_speed_sum: i32 = participants
        .iter()
        .filter(|e| e.is_active() && e.is_player() != actor_is_player)
        .map(|e| e.stats.get(StatKind::Speed))
        .sum();

    let chance = flee::chance_permille(
        speed,
        opponent_speed_sum,
        &ctx.env.tables().flee_params(),
    );
    let roll = ctx
        .env
        .rng()
        .roll_permille(ctx.roll_seed(actor_id, ROLL_FLEE)) as i32;
    let success = roll < chance;
    if success {
        participants[actor_index].mark_fled();
    }
    Ok(ActionOutcome::FleeAttempt {
        chance_permille: chance,
        success,
    })
}

fn use_ability(
    participants: &mut [Entity],
    actor_index: usize,
    ability: AbilityHandle,
    target: EntityId,
    ctx: &mut ResolutionCtx<'_, '_>,
) -> Result<ActionOutcome, CombatError> {
    let actor_id = participants[actor_index].id;

    let definition = ctx
        .env
        .abilities()
        .and_then(|oracle| oracle.ability(ability))
        .ok_or(CombatError::IllegalAction {
            actor: actor_id,
            reason: IllegalActionReason::UnknownAbility,
        })?
        .clone();

    // Cooldown gating applies to actors that track ability slots.
    if let Some(profile) = participants[actor_index].enemy_profile() {
        if let Some(slot) = profile.abilities.iter().find(|s| s.ability == ability) {
            if slot.ready_in > 0 {
                return Err(CombatError::IllegalAction {
                    actor: actor_id,
                    reason: IllegalActionReason::AbilityOnCooldown,
                });
            }
        }
    }

    let target_index = active_target(participants, actor_id, target)?;

    let available = participants[actor_index].stats.get(StatKind::Mana);
    if !participants[actor_index].spend_mana(definition.mana_cost) {
        return Err(CombatError::InsufficientResource {
            actor: actor_id,
            resource: ResourceKind::Mana,
            required: definition.mana_cost,
            available,
        });
    }

    let outcome = match definition.power {
        AbilityPower::Damage {
            attack_permille,
            bonus,
        } => {
            let attack = participants[actor_index].stats.get(StatKind::Attack);
            let raw = attack.saturating_mul(attack_permille) / 1000 + bonus;
            let dealt =
                participants[target_index].take_damage(raw, &ctx.env.tables().damage_params());
            ActionOutcome::Hit {
                target,
                damage: dealt,
                critical: false,
            }
        }
        AbilityPower::Heal { amount } => {
            let healing = participants[target_index].heal(amount);
            ActionOutcome::AbilityUsed {
                ability,
                target,
                healing,
            }
        }
    };

    if let Some(spec) = definition.effect {
        if participants[target_index].is_alive() {
            let source = EffectSource::new(actor_id, ability.0);
            effect::apply(&mut participants[target_index], spec.into_effect(source));
        }
    }

    if let Some(profile) = participants[actor_index].enemy_profile_mut() {
        profile.start_cooldown(ability, definition.cooldown);
    }

    Ok(outcome)
}
