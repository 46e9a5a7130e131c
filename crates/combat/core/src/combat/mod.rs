//! Combat formulas and action resolution.
//!
//! The math lives in small pure functions ([`mitigate`], [`scaled_attack`],
//! [`flee::chance_permille`]) parameterized entirely by rule tables;
//! [`resolve_action`] glues them to entity state for one declared action.

pub mod damage;
pub mod flee;
mod resolve;

pub use damage::{mitigate, roll_crit, scaled_attack};
pub use resolve::{ROLL_CRIT, ROLL_FLEE, ROLL_LOOT, ResolutionCtx, resolve_action};
