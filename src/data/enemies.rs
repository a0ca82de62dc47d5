//! Foe templates for data-driven enemy and boss creation
//!
//! Templates hold level-1 stats; `entities::foes` scales them to the hero.

use serde::{Deserialize, Serialize};
use crate::entities::BaseStats;

/// A template for creating foes from external data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoeTemplate {
    /// Display name (the level is appended on spawn)
    pub name: String,
    /// Level-1 stats
    pub stats: BaseStats,
}

impl FoeTemplate {
    pub fn new(name: &str, stats: BaseStats) -> Self {
        Self { name: name.to_string(), stats }
    }
}

/// Create default enemy templates (hardcoded fallback)
pub fn default_enemy_templates() -> Vec<FoeTemplate> {
    vec![
        FoeTemplate::new("Goblin Thief", BaseStats::new(20.0, 5.0, 2.0, 8.0, 10.0)),
        FoeTemplate::new("Orc Warrior", BaseStats::new(40.0, 10.0, 5.0, 3.0, 5.0)),
        FoeTemplate::new("Snow Wolf", BaseStats::new(30.0, 8.0, 3.0, 12.0, 15.0)),
        FoeTemplate::new("Stone Golem", BaseStats::new(60.0, 12.0, 10.0, 1.0, 0.0)),
        FoeTemplate::new("Skeleton Mage", BaseStats::new(25.0, 15.0, 2.0, 6.0, 30.0)),
    ]
}

/// Create default boss templates (hardcoded fallback)
pub fn default_boss_templates() -> Vec<FoeTemplate> {
    vec![
        FoeTemplate::new("Tyrant Lich", BaseStats::new(150.0, 20.0, 15.0, 10.0, 100.0)),
        FoeTemplate::new("Colossal Behemoth", BaseStats::new(250.0, 30.0, 25.0, 5.0, 20.0)),
        FoeTemplate::new("Mutant Chimera", BaseStats::new(180.0, 25.0, 10.0, 20.0, 50.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bosses_outclass_enemies() {
        let weakest_boss = default_boss_templates()
            .iter()
            .map(|t| t.stats.health)
            .fold(f32::MAX, f32::min);
        let toughest_enemy = default_enemy_templates()
            .iter()
            .map(|t| t.stats.health)
            .fold(0.0, f32::max);
        assert!(weakest_boss > toughest_enemy);
    }

    #[test]
    fn test_template_parses_from_ron() {
        let text = r#"(
            name: "Cave Bat",
            stats: (health: 12.0, strength: 3.0, defense: 1.0, agility: 14.0, resource: 0.0),
        )"#;
        let template: FoeTemplate = ron::from_str(text).unwrap();
        assert_eq!(template.name, "Cave Bat");
        assert_eq!(template.stats.agility, 14.0);
    }
}
