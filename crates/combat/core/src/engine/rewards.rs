//! Victory spoils: experience, gold, loot, and level-ups.

use crate::action::Rewards;
use crate::combat::ROLL_LOOT;
use crate::entity::{Entity, EntityId};
use crate::env::CombatEnv;

/// Aggregate the spoils of every defeated enemy.
///
/// Only dead enemies pay out; an enemy that fled keeps its rewards. Loot
/// rolls are seeded per enemy so the drop set is a pure function of the
/// battle seed.
pub fn collect(participants: &[Entity], env: &CombatEnv<'_>, nonce: u64) -> Rewards {
    let mut rewards = Rewards::default();
    for enemy in participants.iter().filter(|e| e.is_enemy() && !e.is_alive()) {
        let Some(profile) = enemy.enemy_profile() else {
            continue;
        };
        rewards.experience += profile.experience_reward;
        rewards.gold += profile.gold_reward;

        let seed = env.roll_seed(nonce, enemy.id, ROLL_LOOT);
        rewards
            .drops
            .extend(profile.generate_loot(env.rng(), seed));
    }
    rewards
}

/// Grant the pooled experience to every surviving active player.
///
/// Each survivor receives the full amount. Returns `(player, levels)`
/// pairs for players that leveled up.
pub fn apply_experience(
    participants: &mut [Entity],
    experience: i32,
    env: &CombatEnv<'_>,
) -> Vec<(EntityId, u32)> {
    let growth = env.tables().growth();
    let mut level_ups = Vec::new();
    for player in participants
        .iter_mut()
        .filter(|e| e.is_player() && e.is_active())
    {
        let gained = player.add_experience(experience, growth);
        if gained > 0 {
            level_ups.push((player.id, gained));
        }
    }
    level_ups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Behavior;
    use crate::entity::{EnemyRank, LootEntry, PlayerClass};
    use crate::env::{DefaultTables, ItemHandle, PcgRng};
    use crate::stats::StatKind;

    #[test]
    fn only_dead_enemies_pay_out() {
        let mut participants = vec![
            Entity::player(EntityId(1), "Aria", PlayerClass::Warrior),
            Entity::enemy(EntityId(2), "Rat", EnemyRank::Normal, Behavior::Balanced, 2),
            Entity::enemy(EntityId(3), "Bat", EnemyRank::Elite, Behavior::Balanced, 2),
        ];
        participants[1].lose_health(9999);
        participants[2].mark_fled();

        let tables = DefaultTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 11);

        let rewards = collect(&participants, &env, 0);
        assert_eq!(rewards.experience, 20);
        assert_eq!(rewards.gold, 10);
    }

    #[test]
    fn guaranteed_loot_always_drops() {
        let mut rat = Entity::enemy(EntityId(2), "Rat", EnemyRank::Normal, Behavior::Balanced, 1);
        rat.enemy_profile_mut().unwrap().loot = vec![LootEntry {
            item: ItemHandle(3),
            chance_permille: 1000,
            quantity: 1,
        }];
        rat.lose_health(9999);
        let participants = vec![
            Entity::player(EntityId(1), "Aria", PlayerClass::Warrior),
            rat,
        ];

        let tables = DefaultTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 11);

        let rewards = collect(&participants, &env, 5);
        assert_eq!(rewards.drops.len(), 1);
        assert_eq!(rewards.drops[0].item, ItemHandle(3));
    }

    #[test]
    fn experience_goes_to_active_players_only() {
        let mut participants = vec![
            Entity::player(EntityId(1), "Aria", PlayerClass::Warrior),
            Entity::player(EntityId(2), "Lune", PlayerClass::Mage),
            Entity::enemy(EntityId(3), "Rat", EnemyRank::Normal, Behavior::Balanced, 1),
        ];
        participants[1].mark_fled();

        let tables = DefaultTables::default();
        let rng = PcgRng;
        let env = CombatEnv::new(&tables, &rng, 11);

        let level_ups = apply_experience(&mut participants, 150, &env);
        assert_eq!(level_ups, vec![(EntityId(1), 1)]);
        assert_eq!(participants[0].level, 2);
        assert_eq!(participants[1].level, 1);
        assert_eq!(participants[0].stats.get(StatKind::Experience), 150);
        assert_eq!(participants[1].stats.get(StatKind::Experience), 0);
    }
}
