//! Enemy and boss creation
//!
//! Foes are rolled from template tables and scaled linearly with the hero's
//! level. Bosses scale faster and gain far more health per level.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{FoeTemplate, GameData};
use super::character::{BaseStats, Character};

/// Whether a foe guards a regular floor or the final one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoeKind {
    Enemy,
    Boss,
}

/// Per-level growth for generated foes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoeScaling {
    /// Bonus points per hero level above 1
    pub points_per_level: f32,
    pub health: f32,
    pub strength: f32,
    pub defense: f32,
    pub agility: f32,
}

impl FoeScaling {
    /// Scaling for regular enemies
    pub const ENEMY: FoeScaling = FoeScaling {
        points_per_level: 8.0,
        health: 2.0,
        strength: 0.5,
        defense: 0.3,
        agility: 0.2,
    };

    /// Scaling for bosses
    pub const BOSS: FoeScaling = FoeScaling {
        points_per_level: 12.0,
        health: 4.0,
        strength: 0.6,
        defense: 0.4,
        agility: 0.2,
    };

    /// Scale template stats to a hero level. Chaos is never scaled.
    pub fn scale(&self, base: &BaseStats, hero_level: u32) -> BaseStats {
        let extra = hero_level.saturating_sub(1) as f32 * self.points_per_level;
        BaseStats {
            health: base.health + extra * self.health,
            strength: base.strength + extra * self.strength,
            defense: base.defense + extra * self.defense,
            agility: base.agility + extra * self.agility,
            resource: base.resource,
        }
    }
}

/// An enemy or boss for one encounter
#[derive(Debug, Clone, PartialEq)]
pub struct Foe {
    pub character: Character,
    pub kind: FoeKind,
}

impl Foe {
    /// Build a foe from a template at the given hero level
    pub fn from_template(template: &FoeTemplate, kind: FoeKind, hero_level: u32) -> Self {
        let level = hero_level.max(1);
        let scaling = match kind {
            FoeKind::Enemy => FoeScaling::ENEMY,
            FoeKind::Boss => FoeScaling::BOSS,
        };
        let stats = scaling.scale(&template.stats, level);
        let name = format!("{} (L{})", template.name, level);
        Self {
            character: Character::new(name, level, stats),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn is_boss(&self) -> bool {
        self.kind == FoeKind::Boss
    }
}

/// Roll a regular enemy scaled to the hero
pub fn generate_enemy(hero_level: u32, data: &GameData, rng: &mut impl Rng) -> Foe {
    Foe::from_template(data.random_enemy(rng), FoeKind::Enemy, hero_level)
}

/// Roll a boss scaled to the hero
pub fn generate_boss(hero_level: u32, data: &GameData, rng: &mut impl Rng) -> Foe {
    let boss = Foe::from_template(data.random_boss(rng), FoeKind::Boss, hero_level);
    log::info!("Spawned boss {}", boss.name());
    boss
}
