//! Data loading and tunable game content
//!
//! Foe tables, potion tables, gear names and run rules can be overridden by
//! RON files; anything missing falls back to the built-in defaults.

pub mod loader;
pub mod rules;
pub mod items;
pub mod enemies;

pub use loader::{GameData, export_default_data};
pub use rules::Rules;
pub use items::{PotionTemplate, GearNames};
pub use enemies::FoeTemplate;
