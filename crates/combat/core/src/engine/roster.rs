//! Participant roster: validated, stable-ordered storage for one battle.

use crate::config::CombatConfig;
use crate::entity::{Entity, EntityId};
use crate::error::SetupError;
use crate::stats::StatKind;

/// All participants of one battle, in their original order.
///
/// Roster order is load-bearing: it breaks speed ties in turn ordering,
/// so it never changes during a battle. Dead and fled entities stay in
/// place for reward accounting and log resolution.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    /// Validate and adopt the participants.
    ///
    /// Fails before any mutation when a side has no member, the cap is
    /// exceeded, ids collide, or an entity has malformed stats. A side
    /// whose members are all dead is structurally valid; the engine
    /// resolves it as an immediate terminal outcome.
    pub fn new(entities: Vec<Entity>) -> Result<Self, SetupError> {
        if entities.len() > CombatConfig::MAX_PARTICIPANTS {
            return Err(SetupError::TooManyParticipants {
                count: entities.len(),
                max: CombatConfig::MAX_PARTICIPANTS,
            });
        }
        if !entities.iter().any(|e| e.is_player()) {
            return Err(SetupError::EmptySide { side: "player" });
        }
        if !entities.iter().any(|e| e.is_enemy()) {
            return Err(SetupError::EmptySide { side: "enemy" });
        }
        for (index, entity) in entities.iter().enumerate() {
            if entities[..index].iter().any(|e| e.id == entity.id) {
                return Err(SetupError::DuplicateId { id: entity.id });
            }
            if entity.stats.get(StatKind::MaxHealth) <= 0 {
                return Err(SetupError::MalformedStats {
                    id: entity.id,
                    reason: "zero max health",
                });
            }
        }
        Ok(Self { entities })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    /// Players still fighting: alive and not fled.
    pub fn active_players(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_player() && e.is_active())
    }

    /// Enemies still fighting: alive and not fled.
    pub fn active_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_enemy() && e.is_active())
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Behavior;
    use crate::entity::{EnemyRank, PlayerClass};

    fn player(id: u32) -> Entity {
        Entity::player(EntityId(id), "Aria", PlayerClass::Warrior)
    }

    fn enemy(id: u32) -> Entity {
        Entity::enemy(EntityId(id), "Rat", EnemyRank::Normal, Behavior::Balanced, 1)
    }

    #[test]
    fn both_sides_must_be_present() {
        let err = Roster::new(vec![player(1)]).unwrap_err();
        assert_eq!(err, SetupError::EmptySide { side: "enemy" });

        let err = Roster::new(vec![enemy(2)]).unwrap_err();
        assert_eq!(err, SetupError::EmptySide { side: "player" });

        // Dead members still count as present; the engine terminates
        // such a battle immediately instead of rejecting it.
        let mut dead_enemy = enemy(2);
        dead_enemy.lose_health(9999);
        assert!(Roster::new(vec![player(1), dead_enemy]).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Roster::new(vec![player(1), enemy(1)]).unwrap_err();
        assert_eq!(err, SetupError::DuplicateId { id: EntityId(1) });
    }

    #[test]
    fn participant_cap_is_enforced() {
        let mut entities = vec![player(0)];
        for id in 1..=CombatConfig::MAX_PARTICIPANTS as u32 {
            entities.push(enemy(id));
        }
        let err = Roster::new(entities).unwrap_err();
        assert!(matches!(err, SetupError::TooManyParticipants { .. }));
    }
}
