//! Turn ordering within a round.

use crate::entity::Entity;
use crate::stats::StatKind;

/// Indices of active entities in acting order for one round.
///
/// Speed descending, ties broken by roster index; the sort is stable so
/// equal speeds keep their original relative order. The order is frozen
/// when the round starts: speed changes during the round take effect in
/// the next one.
pub fn round_order(entities: &[Entity]) -> Vec<usize> {
    let mut order: Vec<usize> = entities
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_active())
        .map(|(index, _)| index)
        .collect();
    order.sort_by_key(|&index| std::cmp::Reverse(entities[index].stats.get(StatKind::Speed)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Behavior;
    use crate::entity::{EnemyRank, EntityId, PlayerClass};

    fn with_speed(id: u32, speed: i32) -> Entity {
        let mut e = Entity::enemy(
            EntityId(id),
            "Rat",
            EnemyRank::Normal,
            Behavior::Balanced,
            1,
        );
        e.stats.set(StatKind::Speed, speed);
        e
    }

    #[test]
    fn faster_entities_act_first() {
        let entities = vec![with_speed(1, 5), with_speed(2, 12), with_speed(3, 8)];
        assert_eq!(round_order(&entities), vec![1, 2, 0]);
    }

    #[test]
    fn ties_break_by_roster_index() {
        let entities = vec![with_speed(1, 8), with_speed(2, 8), with_speed(3, 8)];
        assert_eq!(round_order(&entities), vec![0, 1, 2]);
    }

    #[test]
    fn inactive_entities_are_excluded() {
        let mut entities = vec![with_speed(1, 10), with_speed(2, 9), with_speed(3, 8)];
        entities[0].lose_health(9999);
        entities[2].mark_fled();
        assert_eq!(round_order(&entities), vec![1]);
    }

    #[test]
    fn speed_buffs_are_visible_to_ordering() {
        let mut entities = vec![with_speed(1, 5), with_speed(2, 6)];
        entities[0].stats.add_modifier(StatKind::Speed, 10);
        assert_eq!(round_order(&entities), vec![0, 1]);

        let player = Entity::player(EntityId(9), "Aria", PlayerClass::Warrior);
        entities.push(player);
        // Warrior speed 10 < buffed 15, > 6.
        assert_eq!(round_order(&entities), vec![0, 2, 1]);
    }
}
