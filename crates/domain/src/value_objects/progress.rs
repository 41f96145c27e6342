use serde::{Deserialize, Serialize};

/// Player level and XP bookkeeping.
///
/// The XP curve is `xp_to_next_level = level * 100`; level-up resolution
/// loops so a single large grant can carry the player through several
/// levels with leftover XP preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    pub level: u32,
    pub current_xp: u32,
    pub xp_to_next_level: u32,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProgress {
    pub fn new() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next_level: Self::xp_for_level(1),
        }
    }

    /// XP required to clear the given level.
    pub fn xp_for_level(level: u32) -> u32 {
        level.saturating_mul(100)
    }

    /// Grant XP and resolve any level-ups, returning how many levels were
    /// gained.
    pub fn apply_xp(&mut self, amount: u32) -> u32 {
        let starting_level = self.level;
        self.current_xp = self.current_xp.saturating_add(amount);
        while self.current_xp >= self.xp_to_next_level {
            self.current_xp -= self.xp_to_next_level;
            self.level += 1;
            self.xp_to_next_level = Self::xp_for_level(self.level);
        }
        self.level - starting_level
    }
}
