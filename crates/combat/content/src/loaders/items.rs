//! Item catalog loader.

use std::path::Path;

use combat_core::{ItemDefinition, ItemHandle, ItemPayload};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::registry::ItemRegistry;

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemEntry>,
}

/// One item row in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: u16,
    pub name: String,
    pub payload: ItemPayload,
}

/// Loader for the item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<ItemRegistry> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse item catalog {}: {}", path.display(), e))?;
        Self::build(catalog)
    }

    pub fn build(catalog: ItemCatalog) -> LoadResult<ItemRegistry> {
        let mut registry = ItemRegistry::new();
        for entry in catalog.items {
            let definition = ItemDefinition {
                name: entry.name.clone(),
                payload: entry.payload,
            };
            if !registry.insert(ItemHandle(entry.id), definition) {
                anyhow::bail!("duplicate item id {} ({})", entry.id, entry.name);
            }
        }
        Ok(registry)
    }
}
