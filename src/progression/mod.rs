//! Progression systems

pub mod xp;
pub mod leveling;

pub use xp::{xp_for_next_level, xp_reward, level_title, MAX_LEVEL, STARTING_POINTS};
pub use leveling::{Allocation, LevelUp};
