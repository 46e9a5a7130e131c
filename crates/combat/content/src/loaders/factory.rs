//! One-stop loader for a content directory.

use std::path::Path;

use combat_core::DefaultTables;

use crate::loaders::{AbilityLoader, EnemyLoader, ItemLoader, LoadResult, TablesLoader};
use crate::registry::{AbilityRegistry, EnemyRegistry, ItemRegistry};

/// Everything a battle needs, loaded from one directory.
#[derive(Clone, Debug)]
pub struct ContentFactory {
    pub items: ItemRegistry,
    pub abilities: AbilityRegistry,
    pub enemies: EnemyRegistry,
    pub tables: DefaultTables,
}

impl ContentFactory {
    /// Load `items.ron`, `abilities.ron`, `enemies.ron` and `tables.toml`
    /// from `dir`. Missing files fall back to empty registries or default
    /// tables; present files must be valid.
    pub fn load_dir(dir: &Path) -> LoadResult<Self> {
        let items_path = dir.join("items.ron");
        let items = if items_path.exists() {
            ItemLoader::load(&items_path)?
        } else {
            ItemRegistry::new()
        };

        let abilities_path = dir.join("abilities.ron");
        let abilities = if abilities_path.exists() {
            AbilityLoader::load(&abilities_path)?
        } else {
            AbilityRegistry::new()
        };

        let enemies_path = dir.join("enemies.ron");
        let enemies = if enemies_path.exists() {
            EnemyLoader::load(&enemies_path, &abilities)?
        } else {
            EnemyRegistry::new()
        };

        let tables_path = dir.join("tables.toml");
        let tables = if tables_path.exists() {
            TablesLoader::load(&tables_path)?
        } else {
            DefaultTables::default()
        };

        Ok(Self {
            items,
            abilities,
            enemies,
            tables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::load_dir(dir.path()).unwrap();
        assert!(factory.items.is_empty());
        assert!(factory.abilities.is_empty());
        assert!(factory.enemies.is_empty());
    }

    #[test]
    fn loads_a_full_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("items.ron"),
            r#"ItemCatalog(items: [ItemEntry(id: 1, name: "Potion", payload: Healing(amount: 30))])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("abilities.ron"),
            r#"AbilityCatalog(abilities: [AbilityEntry(id: 1, name: "Bite", power: Damage(attack_permille: 1200, bonus: 0))])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("enemies.ron"),
            r#"EnemyCatalog(enemies: [EnemyEntry(key: "rat", name: "Rat", rank: normal, behavior: aggressive, abilities: [1])])"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("tables.toml"),
            "[damage]\ndefend_multiplier = 3\nminimum_damage = 1\n",
        )
        .unwrap();

        let factory = ContentFactory::load_dir(dir.path()).unwrap();
        assert_eq!(factory.items.len(), 1);
        assert_eq!(factory.abilities.len(), 1);
        assert!(factory.enemies.get("rat").is_some());
        assert_eq!(factory.tables.damage.defend_multiplier, 3);
    }

    #[test]
    fn invalid_file_fails_the_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("enemies.ron"),
            r#"EnemyCatalog(enemies: [EnemyEntry(key: "rat", name: "Rat", rank: normal, behavior: aggressive, abilities: [42])])"#,
        )
        .unwrap();
        assert!(ContentFactory::load_dir(dir.path()).is_err());
    }
}
