//! Synchronous battle driver over `combat-core` and `combat-content`.
//!
//! The runtime owns the glue a host application needs: sessions that
//! assemble participants and oracles, player-side action providers, and
//! tracing-based battle logs. It adds no rules of its own; everything
//! that decides a battle lives in `combat-core`.
pub mod error;
pub mod logging;
pub mod providers;
pub mod session;

pub use error::RuntimeError;
pub use providers::{ScriptedProvider, TacticalProvider};
pub use session::CombatSession;
