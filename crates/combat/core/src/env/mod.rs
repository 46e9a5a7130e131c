//! Traits describing read-only battle data.
//!
//! Oracles expose item and ability definitions, inventory stock, and rule
//! tables. [`CombatEnv`] bundles them with the battle seed so the
//! resolver and orchestrator can reach everything they need without
//! coupling to concrete implementations.

mod items;
mod rng;
mod tables;

pub use items::{
    AbilityDefinition, AbilityHandle, AbilityOracle, AbilityPower, EmptyInventory, InventoryOracle,
    ItemDefinition, ItemHandle, ItemOracle, ItemPayload,
};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use tables::{CritParams, DamageParams, DefaultTables, FleeParams, TablesOracle};

/// Aggregates the read-only oracles a battle resolves against.
///
/// Tables and randomness are always required; item, ability and inventory
/// oracles are optional so stripped-down battles (no items, no specials)
/// can run without stub content. Actions referencing absent oracles fail
/// as invalid, costing the actor its turn.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    tables: &'a dyn TablesOracle,
    rng: &'a dyn RngOracle,
    items: Option<&'a dyn ItemOracle>,
    abilities: Option<&'a dyn AbilityOracle>,
    inventory: Option<&'a dyn InventoryOracle>,
    /// Base seed for every roll in this battle.
    pub battle_seed: u64,
}

impl<'a> CombatEnv<'a> {
    pub fn new(tables: &'a dyn TablesOracle, rng: &'a dyn RngOracle, battle_seed: u64) -> Self {
        Self {
            tables,
            rng,
            items: None,
            abilities: None,
            inventory: None,
            battle_seed,
        }
    }

    pub fn with_items(mut self, items: &'a dyn ItemOracle) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_abilities(mut self, abilities: &'a dyn AbilityOracle) -> Self {
        self.abilities = Some(abilities);
        self
    }

    pub fn with_inventory(mut self, inventory: &'a dyn InventoryOracle) -> Self {
        self.inventory = Some(inventory);
        self
    }

    pub fn tables(&self) -> &'a dyn TablesOracle {
        self.tables
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn items(&self) -> Option<&'a dyn ItemOracle> {
        self.items
    }

    pub fn abilities(&self) -> Option<&'a dyn AbilityOracle> {
        self.abilities
    }

    pub fn inventory(&self) -> Option<&'a dyn InventoryOracle> {
        self.inventory
    }

    /// Seed for one roll: battle seed mixed with the turn counter, the
    /// acting entity and a per-roll context.
    pub fn roll_seed(&self, nonce: u64, actor: crate::entity::EntityId, context: u32) -> u64 {
        compute_seed(self.battle_seed, nonce, actor.0, context)
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("battle_seed", &self.battle_seed)
            .field("has_items", &self.items.is_some())
            .field("has_abilities", &self.abilities.is_some())
            .field("has_inventory", &self.inventory.is_some())
            .finish()
    }
}
