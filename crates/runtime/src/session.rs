//! Battle session: content + participants + engine, driven to completion.

use combat_content::{ContentFactory, StockInventory};
use combat_core::{
    ActionProvider, BattleResult, CombatConfig, CombatEngine, CombatEnv, Entity, EntityId,
    PcgRng, PlayerClass, Roster, RoundObserver,
};

use crate::error::RuntimeError;

/// Builds one battle from content registries and runs it synchronously.
///
/// The session assigns entity ids, spawns enemies from templates, wires
/// the oracles into a [`CombatEnv`] and hands everything to the engine.
/// Consumed by [`CombatSession::run`]; build a new session per battle.
pub struct CombatSession<'a> {
    content: &'a ContentFactory,
    inventory: Option<&'a StockInventory>,
    config: CombatConfig,
    seed: u64,
    participants: Vec<Entity>,
    next_id: u32,
}

impl<'a> CombatSession<'a> {
    pub fn new(content: &'a ContentFactory, seed: u64) -> Self {
        Self {
            content,
            inventory: None,
            config: CombatConfig::new(),
            seed,
            participants: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_inventory(mut self, inventory: &'a StockInventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a fresh level-1 player of the given class.
    pub fn add_player(&mut self, name: impl Into<String>, class: PlayerClass) -> EntityId {
        let id = self.allocate_id();
        self.participants.push(Entity::player(id, name, class));
        id
    }

    /// Add a persisted participant as-is (its id must be unique).
    pub fn add_entity(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id.0 + 1);
        self.participants.push(entity);
    }

    /// Spawn an enemy from a content template.
    pub fn spawn_enemy(&mut self, key: &str) -> Result<EntityId, RuntimeError> {
        let template = self
            .content
            .enemies
            .get(key)
            .ok_or_else(|| RuntimeError::UnknownEnemy {
                key: key.to_owned(),
            })?;
        let id = self.allocate_id();
        self.participants.push(template.spawn(id));
        Ok(id)
    }

    /// Run the battle to completion.
    pub fn run(self, provider: &mut dyn ActionProvider) -> Result<BattleResult, RuntimeError> {
        let span = tracing::info_span!("battle", seed = self.seed);
        let _guard = span.enter();
        tracing::info!(
            participants = self.participants.len(),
            max_rounds = self.config.max_rounds,
            "battle start"
        );

        let rng = PcgRng;
        let mut env = CombatEnv::new(&self.content.tables, &rng, self.seed)
            .with_items(&self.content.items)
            .with_abilities(&self.content.abilities);
        if let Some(inventory) = self.inventory {
            env = env.with_inventory(inventory);
        }

        let engine = CombatEngine::new(self.participants, env, self.config)?;
        let result = engine.run_with_observer(provider, &mut LogObserver)?;

        tracing::info!(
            outcome = %result.report.outcome,
            rounds = result.report.rounds,
            turns = result.report.turns.len(),
            "battle complete"
        );
        Ok(result)
    }
}

struct LogObserver;

impl RoundObserver for LogObserver {
    fn round_complete(&mut self, round: u32, roster: &Roster) {
        tracing::debug!(
            round,
            players = roster.active_players().count(),
            enemies = roster.active_enemies().count(),
            "round complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TacticalProvider;
    use combat_core::{Behavior, CombatOutcome, DefaultTables, EnemyRank, StatKind};
    use combat_content::{
        AbilityRegistry, EnemyRegistry, EnemyTemplate, ItemRegistry,
    };

    fn content_with_rat() -> ContentFactory {
        let mut enemies = EnemyRegistry::new();
        enemies.insert(
            "rat",
            EnemyTemplate {
                name: "Giant Rat".into(),
                rank: EnemyRank::Normal,
                behavior: Behavior::Aggressive,
                level: 1,
                stat_overrides: vec![],
                abilities: vec![],
                loot: vec![],
            },
        );
        ContentFactory {
            items: ItemRegistry::new(),
            abilities: AbilityRegistry::new(),
            enemies,
            tables: DefaultTables::default(),
        }
    }

    #[test]
    fn session_spawns_and_wins_a_battle() {
        let content = content_with_rat();
        let mut session = CombatSession::new(&content, 1234);
        let hero = session.add_player("Aria", PlayerClass::Warrior);
        session.spawn_enemy("rat").unwrap();

        let result = session.run(&mut TacticalProvider).unwrap();
        assert_eq!(result.report.outcome, CombatOutcome::Victory);

        let hero = result.participants.iter().find(|e| e.id == hero).unwrap();
        assert!(hero.stats.get(StatKind::Experience) > 0);
    }

    #[test]
    fn unknown_template_keys_are_rejected() {
        let content = content_with_rat();
        let mut session = CombatSession::new(&content, 1);
        session.add_player("Aria", PlayerClass::Warrior);
        let err = session.spawn_enemy("dragon").unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownEnemy { .. }));
    }

    #[test]
    fn session_ids_do_not_collide_with_persisted_entities() {
        let content = content_with_rat();
        let mut session = CombatSession::new(&content, 1);
        session.add_entity(Entity::player(EntityId(10), "Aria", PlayerClass::Warrior));
        let id = session.spawn_enemy("rat").unwrap();
        assert_eq!(id, EntityId(11));
    }
}
