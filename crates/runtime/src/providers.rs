//! Player-side action providers.

use std::collections::VecDeque;

use combat_core::{
    ActionProvider, CombatAction, CombatError, EntityId, Roster, StatKind,
};

/// Plays a queued script of actions, defending once the script runs out.
///
/// The bridge for UIs and tests: whatever collects player input pushes
/// actions, the engine pops them one turn at a time.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    queue: VecDeque<CombatAction>,
    abort: bool,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
            abort: false,
        }
    }

    pub fn push(&mut self, action: CombatAction) {
        self.queue.push_back(action);
    }

    /// Request the battle end as fled at the next round boundary.
    pub fn request_abort(&mut self) {
        self.abort = true;
    }
}

impl ActionProvider for ScriptedProvider {
    fn choose(
        &mut self,
        _roster: &Roster,
        actor: EntityId,
        round: u32,
    ) -> Result<CombatAction, CombatError> {
        let action = self.queue.pop_front().unwrap_or(CombatAction::Defend);
        tracing::debug!("scripted provider: {actor} round {round} -> {}", action.kind());
        Ok(action)
    }

    fn abort_requested(&mut self) -> bool {
        self.abort
    }
}

/// Attacks the weakest active enemy; defends when none remain.
#[derive(Clone, Copy, Debug, Default)]
pub struct TacticalProvider;

impl ActionProvider for TacticalProvider {
    fn choose(
        &mut self,
        roster: &Roster,
        _actor: EntityId,
        _round: u32,
    ) -> Result<CombatAction, CombatError> {
        Ok(roster
            .active_enemies()
            .min_by_key(|e| e.stats.get(StatKind::Health))
            .map(|e| CombatAction::Attack { target: e.id })
            .unwrap_or(CombatAction::Defend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Behavior, EnemyRank, Entity, PlayerClass};

    fn roster() -> Roster {
        let mut weak = Entity::enemy(
            EntityId(3),
            "Bat",
            EnemyRank::Normal,
            Behavior::Balanced,
            1,
        );
        weak.lose_health(50);
        Roster::new(vec![
            Entity::player(EntityId(1), "Aria", PlayerClass::Warrior),
            Entity::enemy(EntityId(2), "Rat", EnemyRank::Normal, Behavior::Balanced, 1),
            weak,
        ])
        .unwrap()
    }

    #[test]
    fn tactical_provider_picks_the_weakest_enemy() {
        let roster = roster();
        let action = TacticalProvider
            .choose(&roster, EntityId(1), 1)
            .unwrap();
        assert_eq!(
            action,
            CombatAction::Attack {
                target: EntityId(3),
            }
        );
    }

    #[test]
    fn scripted_provider_falls_back_to_defend() {
        let roster = roster();
        let mut provider = ScriptedProvider::new([CombatAction::Flee]);
        assert_eq!(
            provider.choose(&roster, EntityId(1), 1).unwrap(),
            CombatAction::Flee
        );
        assert_eq!(
            provider.choose(&roster, EntityId(1), 2).unwrap(),
            CombatAction::Defend
        );
    }
}
