//! Balance and growth table loader.

use std::path::Path;
use std::str::FromStr;

use combat_core::{
    CombatError, CritParams, DamageParams, DefaultTables, FleeParams, GrowthTable, StatGain,
    StatKind,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Balance file structure for TOML files.
///
/// Every section is optional; omitted sections keep the default tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TablesFile {
    #[serde(default)]
    pub damage: Option<DamageParams>,
    #[serde(default)]
    pub crit: Option<CritParams>,
    #[serde(default)]
    pub flee: Option<FleeParams>,
    #[serde(default)]
    pub growth: Option<GrowthSpec>,
}

/// Growth table section: explicit thresholds or a linear rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSpec {
    #[serde(default)]
    pub thresholds: Option<Vec<i32>>,
    #[serde(default)]
    pub linear: Option<LinearSpec>,
    #[serde(default)]
    pub gains: Vec<GainSpec>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinearSpec {
    pub base: i32,
    pub levels: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GainSpec {
    pub stat: String,
    pub amount: i32,
}

/// Loader for balance tables from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    pub fn load(path: &Path) -> LoadResult<DefaultTables> {
        let content = read_file(path)?;
        let file: TablesFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("failed to parse tables {}: {}", path.display(), e))?;
        Self::build(file)
    }

    pub fn build(file: TablesFile) -> LoadResult<DefaultTables> {
        let mut tables = DefaultTables::default();
        if let Some(damage) = file.damage {
            tables.damage = damage;
        }
        if let Some(crit) = file.crit {
            tables.crit = crit;
        }
        if let Some(flee) = file.flee {
            tables.flee = flee;
        }
        if let Some(growth) = file.growth {
            tables.growth = Self::build_growth(growth)?;
        }
        tables
            .growth
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid growth table: {e}"))?;
        Ok(tables)
    }

    fn build_growth(spec: GrowthSpec) -> LoadResult<GrowthTable> {
        let mut gains = Vec::with_capacity(spec.gains.len());
        for gain in &spec.gains {
            let stat = StatKind::from_str(&gain.stat).map_err(|_| CombatError::UnknownStat {
                name: gain.stat.clone(),
            })?;
            gains.push(StatGain::new(stat, gain.amount));
        }

        match (spec.thresholds, spec.linear) {
            (Some(thresholds), None) => Ok(GrowthTable::new(thresholds, gains)),
            (None, Some(linear)) => Ok(GrowthTable::linear(linear.base, linear.levels, gains)),
            (Some(_), Some(_)) => {
                anyhow::bail!("growth section sets both thresholds and linear")
            }
            (None, None) => anyhow::bail!("growth section needs thresholds or linear"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::TablesOracle;
    use std::io::Write;

    fn write_tables(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let file = write_tables(
            r#"
            [crit]
            base_permille = 100
            per_speed_permille = 2
            multiplier_permille = 2000
            "#,
        );

        let tables = TablesLoader::load(file.path()).unwrap();
        assert_eq!(tables.crit.base_permille, 100);
        // Untouched sections keep the default tuning.
        assert_eq!(tables.damage_params(), DamageParams::default());
        assert_eq!(tables.flee_params(), FleeParams::default());
    }

    #[test]
    fn linear_growth_with_named_gains() {
        let file = write_tables(
            r#"
            [growth]
            linear = { base = 100, levels = 20 }

            [[growth.gains]]
            stat = "max_health"
            amount = 15

            [[growth.gains]]
            stat = "attack"
            amount = 3
            "#,
        );

        let tables = TablesLoader::load(file.path()).unwrap();
        assert_eq!(tables.growth.level_cap(), 21);
        assert_eq!(tables.growth.gains().len(), 2);
    }

    #[test]
    fn non_monotone_thresholds_fail_the_load() {
        let file = write_tables(
            r#"
            [growth]
            thresholds = [100, 90]
            "#,
        );

        let err = TablesLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid growth table"));
    }

    #[test]
    fn unknown_gain_stat_fails_the_load_as_an_unknown_stat() {
        let file = write_tables(
            r#"
            [growth]
            thresholds = [100]

            [[growth.gains]]
            stat = "charisma"
            amount = 1
            "#,
        );

        let err = TablesLoader::load(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CombatError>(),
            Some(&CombatError::UnknownStat {
                name: "charisma".into(),
            })
        );
        assert!(err.to_string().contains("unknown stat 'charisma'"));
    }
}
