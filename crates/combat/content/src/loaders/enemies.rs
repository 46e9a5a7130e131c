//! Enemy template loader.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use combat_core::{
    AbilityHandle, Behavior, CombatError, EnemyRank, ItemHandle, LootEntry, StatKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};
use crate::registry::{AbilityRegistry, EnemyRegistry, EnemyTemplate};

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyEntry>,
}

/// One enemy template row in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyEntry {
    /// Registry key the runtime spawns by.
    pub key: String,
    pub name: String,
    pub rank: EnemyRank,
    pub behavior: Behavior,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Base-stat overrides by stat name, applied after rank scaling.
    #[serde(default)]
    pub stats: HashMap<String, i32>,
    #[serde(default)]
    pub abilities: Vec<u16>,
    #[serde(default)]
    pub loot: Vec<LootSpec>,
}

fn default_level() -> u32 {
    1
}

/// One loot table row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LootSpec {
    pub item: u16,
    pub chance_permille: u16,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Loader for enemy templates from RON files.
///
/// Ability references are checked against the ability registry so a
/// template can never name an ability that does not exist.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn load(path: &Path, abilities: &AbilityRegistry) -> LoadResult<EnemyRegistry> {
        let content = read_file(path)?;
        let catalog: EnemyCatalog = ron::from_str(&content).map_err(|e| {
            anyhow::anyhow!("failed to parse enemy catalog {}: {}", path.display(), e)
        })?;
        Self::build(catalog, abilities)
    }

    pub fn build(catalog: EnemyCatalog, abilities: &AbilityRegistry) -> LoadResult<EnemyRegistry> {
        let mut registry = EnemyRegistry::new();
        for entry in catalog.enemies {
            let template = Self::convert(&entry, abilities)
                .with_context(|| format!("enemy '{}'", entry.key))?;
            if !registry.insert(entry.key.clone(), template) {
                anyhow::bail!("duplicate enemy key '{}'", entry.key);
            }
        }
        Ok(registry)
    }

    fn convert(entry: &EnemyEntry, abilities: &AbilityRegistry) -> LoadResult<EnemyTemplate> {
        if entry.level == 0 {
            anyhow::bail!("level must be at least 1");
        }

        // Deterministic override order regardless of map iteration.
        let mut names: Vec<&String> = entry.stats.keys().collect();
        names.sort();
        let mut stat_overrides = Vec::with_capacity(names.len());
        for name in names {
            let stat = StatKind::from_str(name).map_err(|_| CombatError::UnknownStat {
                name: name.clone(),
            })?;
            stat_overrides.push((stat, entry.stats[name]));
        }

        let mut ability_handles = Vec::with_capacity(entry.abilities.len());
        for &id in &entry.abilities {
            let handle = AbilityHandle(id);
            if !abilities.contains(handle) {
                anyhow::bail!("references unknown ability {id}");
            }
            ability_handles.push(handle);
        }

        let mut loot = Vec::with_capacity(entry.loot.len());
        for spec in &entry.loot {
            if spec.chance_permille > 1000 {
                anyhow::bail!(
                    "loot chance {} exceeds 1000 permille",
                    spec.chance_permille
                );
            }
            loot.push(LootEntry {
                item: ItemHandle(spec.item),
                chance_permille: spec.chance_permille,
                quantity: spec.quantity,
            });
        }

        Ok(EnemyTemplate {
            name: entry.name.clone(),
            rank: entry.rank,
            behavior: entry.behavior,
            level: entry.level,
            stat_overrides,
            abilities: ability_handles,
            loot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::AbilityLoader;
    use crate::loaders::abilities::{AbilityCatalog, AbilityEntry};
    use combat_core::{AbilityPower, EntityId, StatKind};
    use std::io::Write;

    fn write_catalog(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn one_ability() -> AbilityRegistry {
        AbilityLoader::build(AbilityCatalog {
            abilities: vec![AbilityEntry {
                id: 4,
                name: "Bite".into(),
                mana_cost: 0,
                cooldown: 1,
                power: AbilityPower::Damage {
                    attack_permille: 1200,
                    bonus: 0,
                },
                effect: None,
            }],
        })
        .unwrap()
    }

    #[test]
    fn loads_templates_with_overrides_and_loot() {
        let file = write_catalog(
            r#"
            EnemyCatalog(
                enemies: [
                    EnemyEntry(
                        key: "giant_rat",
                        name: "Giant Rat",
                        rank: normal,
                        behavior: aggressive,
                        stats: {"max_health": 40, "speed": 12},
                        abilities: [4],
                        loot: [LootSpec(item: 1, chance_permille: 250)],
                    ),
                ],
            )
            "#,
        );

        let registry = EnemyLoader::load(file.path(), &one_ability()).unwrap();
        let template = registry.get("giant_rat").unwrap();
        assert_eq!(template.level, 1);
        assert_eq!(template.loot[0].quantity, 1);

        let rat = template.spawn(EntityId(9));
        assert_eq!(rat.stats.get(StatKind::MaxHealth), 40);
        assert_eq!(rat.stats.get(StatKind::Speed), 12);
    }

    #[test]
    fn unknown_stat_names_fail_the_load() {
        let file = write_catalog(
            r#"
            EnemyCatalog(
                enemies: [
                    EnemyEntry(
                        key: "rat",
                        name: "Rat",
                        rank: normal,
                        behavior: balanced,
                        stats: {"luck": 7},
                    ),
                ],
            )
            "#,
        );

        let err = EnemyLoader::load(file.path(), &AbilityRegistry::new()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CombatError>(),
            Some(&CombatError::UnknownStat {
                name: "luck".into(),
            })
        );
        // The context chain still names the offending template.
        assert!(format!("{err:#}").contains("enemy 'rat'"));
    }

    #[test]
    fn dangling_ability_references_fail_the_load() {
        let file = write_catalog(
            r#"
            EnemyCatalog(
                enemies: [
                    EnemyEntry(
                        key: "rat",
                        name: "Rat",
                        rank: normal,
                        behavior: balanced,
                        abilities: [99],
                    ),
                ],
            )
            "#,
        );

        let err = EnemyLoader::load(file.path(), &AbilityRegistry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown ability 99"));
    }

    #[test]
    fn out_of_range_loot_chance_fails_the_load() {
        let file = write_catalog(
            r#"
            EnemyCatalog(
                enemies: [
                    EnemyEntry(
                        key: "rat",
                        name: "Rat",
                        rank: normal,
                        behavior: balanced,
                        loot: [LootSpec(item: 1, chance_permille: 1500)],
                    ),
                ],
            )
            "#,
        );

        let err = EnemyLoader::load(file.path(), &AbilityRegistry::new()).unwrap_err();
        assert!(format!("{err:#}").contains("exceeds 1000"));
    }
}
