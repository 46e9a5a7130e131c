//! Content loaders for reading combat data from files.
//!
//! Loaders convert RON catalogs and TOML tables into the registries in
//! [`crate::registry`]. Validation is eager: unknown stat names, dangling
//! ability references, out-of-range chances and malformed growth tables
//! are load-time errors, so a battle never starts on bad content.

pub mod abilities;
pub mod enemies;
pub mod factory;
pub mod items;
pub mod tables;

pub use abilities::AbilityLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use items::ItemLoader;
pub use tables::TablesLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))
}
