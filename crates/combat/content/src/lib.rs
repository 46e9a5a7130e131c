//! Data-driven combat content and loaders.
//!
//! This crate houses battle content and provides loaders for RON/TOML
//! data files:
//! - Enemy templates (RON)
//! - Ability catalogs (RON)
//! - Item catalogs (RON)
//! - Balance and growth tables (TOML)
//!
//! Registries implement the oracle traits from `combat-core`, so content
//! reaches the engine read-only and never appears in battle state. All
//! loaders validate eagerly; a file that parses but references unknown
//! stats or abilities fails the load.

pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::{
    AbilityRegistry, EnemyRegistry, EnemyTemplate, ItemRegistry, StockInventory,
};

#[cfg(feature = "loaders")]
pub use loaders::{AbilityLoader, ContentFactory, EnemyLoader, ItemLoader, TablesLoader};
