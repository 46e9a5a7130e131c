//! In-memory content registries backing the core oracle traits.
//!
//! Registries are built by the loaders (or by hand in tests) and handed
//! to the engine through [`combat_core::CombatEnv`]. They are immutable
//! once built; the engine never writes content.

use std::collections::HashMap;

use combat_core::{
    AbilityDefinition, AbilityHandle, AbilityOracle, Behavior, EnemyRank, Entity, EntityId,
    InventoryOracle, ItemDefinition, ItemHandle, ItemOracle, LootEntry, StatKind,
};

/// Item catalog keyed by handle.
#[derive(Clone, Debug, Default)]
pub struct ItemRegistry {
    items: HashMap<u16, ItemDefinition>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition; returns false when the handle is taken.
    pub fn insert(&mut self, handle: ItemHandle, definition: ItemDefinition) -> bool {
        use std::collections::hash_map::Entry;
        match self.items.entry(handle.0) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(definition);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemOracle for ItemRegistry {
    fn item(&self, handle: ItemHandle) -> Option<&ItemDefinition> {
        self.items.get(&handle.0)
    }
}

/// Ability catalog keyed by handle.
#[derive(Clone, Debug, Default)]
pub struct AbilityRegistry {
    abilities: HashMap<u16, AbilityDefinition>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: AbilityHandle, definition: AbilityDefinition) -> bool {
        use std::collections::hash_map::Entry;
        match self.abilities.entry(handle.0) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(definition);
                true
            }
        }
    }

    pub fn contains(&self, handle: AbilityHandle) -> bool {
        self.abilities.contains_key(&handle.0)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl AbilityOracle for AbilityRegistry {
    fn ability(&self, handle: AbilityHandle) -> Option<&AbilityDefinition> {
        self.abilities.get(&handle.0)
    }
}

/// A spawnable enemy blueprint.
///
/// Templates carry everything but an identity; [`EnemyTemplate::spawn`]
/// stamps out a fresh [`Entity`] for one battle.
#[derive(Clone, Debug)]
pub struct EnemyTemplate {
    pub name: String,
    pub rank: EnemyRank,
    pub behavior: Behavior,
    pub level: u32,
    /// Base-stat overrides applied after rank scaling.
    pub stat_overrides: Vec<(StatKind, i32)>,
    pub abilities: Vec<AbilityHandle>,
    pub loot: Vec<LootEntry>,
}

impl EnemyTemplate {
    pub fn spawn(&self, id: EntityId) -> Entity {
        let mut entity = Entity::enemy(id, self.name.clone(), self.rank, self.behavior, self.level);
        for &(stat, value) in &self.stat_overrides {
            entity.stats.set(stat, value);
        }
        // Overridden maximums start full.
        entity
            .stats
            .set(StatKind::Health, entity.stats.get(StatKind::MaxHealth));
        entity
            .stats
            .set(StatKind::Mana, entity.stats.get(StatKind::MaxMana));

        if let Some(profile) = entity.enemy_profile_mut() {
            for &ability in &self.abilities {
                profile.add_ability(ability);
            }
            profile.loot = self.loot.clone();
        }
        entity
    }
}

/// Enemy templates keyed by their content name.
#[derive(Clone, Debug, Default)]
pub struct EnemyRegistry {
    templates: HashMap<String, EnemyTemplate>,
}

impl EnemyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, template: EnemyTemplate) -> bool {
        use std::collections::hash_map::Entry;
        match self.templates.entry(key.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(template);
                true
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&EnemyTemplate> {
        self.templates.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Simple owned inventory: per-entity item counts fixed at battle start.
#[derive(Clone, Debug, Default)]
pub struct StockInventory {
    counts: HashMap<(EntityId, u16), u32>,
}

impl StockInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&mut self, owner: EntityId, item: ItemHandle, quantity: u32) {
        *self.counts.entry((owner, item.0)).or_insert(0) += quantity;
    }
}

impl InventoryOracle for StockInventory {
    fn count(&self, owner: EntityId, item: ItemHandle) -> u32 {
        self.counts.get(&(owner, item.0)).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ItemPayload, StatKind};

    #[test]
    fn spawned_enemies_apply_overrides_and_start_full() {
        let template = EnemyTemplate {
            name: "Bone Archer".into(),
            rank: EnemyRank::Elite,
            behavior: Behavior::Aggressive,
            level: 3,
            stat_overrides: vec![(StatKind::MaxHealth, 90), (StatKind::Speed, 14)],
            abilities: vec![AbilityHandle(2)],
            loot: vec![],
        };

        let archer = template.spawn(EntityId(7));
        assert_eq!(archer.stats.get(StatKind::MaxHealth), 90);
        assert_eq!(archer.stats.get(StatKind::Health), 90);
        assert_eq!(archer.stats.get(StatKind::Speed), 14);
        // Non-overridden stats keep their rank scaling.
        assert_eq!(archer.stats.get(StatKind::Attack), 13);
        assert_eq!(
            archer
                .enemy_profile()
                .unwrap()
                .ready_abilities()
                .collect::<Vec<_>>(),
            vec![AbilityHandle(2)]
        );
    }

    #[test]
    fn registries_reject_duplicate_keys() {
        let mut items = ItemRegistry::new();
        let potion = ItemDefinition {
            name: "potion".into(),
            payload: ItemPayload::Healing { amount: 30 },
        };
        assert!(items.insert(ItemHandle(1), potion.clone()));
        assert!(!items.insert(ItemHandle(1), potion));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn stock_inventory_accumulates_grants() {
        let mut stock = StockInventory::new();
        stock.grant(EntityId(1), ItemHandle(3), 2);
        stock.grant(EntityId(1), ItemHandle(3), 1);
        assert_eq!(stock.count(EntityId(1), ItemHandle(3)), 3);
        assert_eq!(stock.count(EntityId(2), ItemHandle(3)), 0);
    }
}
