/// Combat configuration constants and tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Maximum number of full rounds before the battle is called as a draw.
    pub max_rounds: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of concurrent status effects per entity.
    pub const MAX_EFFECTS: usize = 8;
    /// Maximum number of abilities an enemy can carry.
    pub const MAX_ABILITIES: usize = 8;
    /// Maximum number of participants in one battle (both sides combined).
    pub const MAX_PARTICIPANTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_ROUNDS: u32 = 50;

    pub fn new() -> Self {
        Self {
            max_rounds: Self::DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
