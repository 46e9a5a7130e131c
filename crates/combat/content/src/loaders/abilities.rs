//! Ability catalog loader.

use std::path::Path;

use combat_core::{AbilityDefinition, AbilityHandle, AbilityPower, EffectSpec};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::registry::AbilityRegistry;

/// Ability catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilityEntry>,
}

/// One ability row in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityEntry {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub mana_cost: i32,
    #[serde(default)]
    pub cooldown: u16,
    pub power: AbilityPower,
    #[serde(default)]
    pub effect: Option<EffectSpec>,
}

/// Loader for the ability catalog from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn load(path: &Path) -> LoadResult<AbilityRegistry> {
        let content = read_file(path)?;
        let catalog: AbilityCatalog = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("failed to parse ability catalog {}: {}", path.display(), e)
        })?;
        Self::build(catalog)
    }

    pub fn build(catalog: AbilityCatalog) -> LoadResult<AbilityRegistry> {
        let mut registry = AbilityRegistry::new();
        for entry in catalog.abilities {
            if entry.mana_cost < 0 {
                anyhow::bail!(
                    "ability {} ({}) has negative mana cost",
                    entry.id,
                    entry.name
                );
            }
            let definition = AbilityDefinition {
                name: entry.name.clone(),
                mana_cost: entry.mana_cost,
                cooldown: entry.cooldown,
                power: entry.power,
                effect: entry.effect,
            };
            if !registry.insert(AbilityHandle(entry.id), definition) {
                anyhow::bail!("duplicate ability id {} ({})", entry.id, entry.name);
            }
        }
        Ok(registry)
    }
}
