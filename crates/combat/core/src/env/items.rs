//! Item and ability definitions, resolved through handles.
//!
//! The engine never stores item or ability data inline; entities and
//! actions carry small copyable handles, and the oracles resolve them to
//! definitions owned by the content layer. An unresolvable handle is a
//! content error surfaced as an invalid action, not a panic.

use crate::effect::EffectSpec;
use crate::entity::EntityId;

/// Content-assigned item identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemHandle(pub u16);

/// Content-assigned ability identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityHandle(pub u16);

/// What using an item does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemPayload {
    /// Restore health to the target.
    Healing { amount: i32 },
    /// Restore mana to the target.
    ManaRestore { amount: i32 },
    /// Deal raw damage to the target (thrown items).
    Damage { amount: i32 },
    /// Apply a timed effect to the target.
    Apply(EffectSpec),
}

/// A usable item as defined by content.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub name: String,
    pub payload: ItemPayload,
}

/// What an ability does when it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityPower {
    /// Attack-scaled damage: `attack * attack_permille / 1000 + bonus`,
    /// mitigated by the target's defense like a basic attack.
    Damage { attack_permille: i32, bonus: i32 },
    /// Flat healing on the target.
    Heal { amount: i32 },
}

/// A special ability as defined by content.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub name: String,
    pub mana_cost: i32,
    /// Rounds before the ability can be used again.
    pub cooldown: u16,
    pub power: AbilityPower,
    /// Optional rider effect applied to the target on a successful use.
    pub effect: Option<EffectSpec>,
}

/// Read-only access to item definitions.
pub trait ItemOracle: Send + Sync {
    fn item(&self, handle: ItemHandle) -> Option<&ItemDefinition>;
}

/// Read-only access to ability definitions.
pub trait AbilityOracle: Send + Sync {
    fn ability(&self, handle: AbilityHandle) -> Option<&AbilityDefinition>;
}

/// Read-only view of participants' item stock at battle start.
///
/// The engine never mutates inventories; it counts consumption internally
/// during the battle and reports it in the combat log so the caller can
/// apply the decrements afterwards.
pub trait InventoryOracle: Send + Sync {
    fn count(&self, owner: EntityId, item: ItemHandle) -> u32;
}

/// Empty stock for battles without items.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyInventory;

impl InventoryOracle for EmptyInventory {
    fn count(&self, _owner: EntityId, _item: ItemHandle) -> u32 {
        0
    }
}
