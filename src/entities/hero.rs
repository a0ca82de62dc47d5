//! Hero entity
//!
//! A hero is a character with a class, experience, proficiency and a potion
//! belt. Heroes persist across runs; lives are tracked by the campaign.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::combat::abilities::{Ability, ESSENCE_SHAPER_ABILITIES, FERAL_ABILITIES, SHADE_ABILITIES};
use crate::items::PotionBelt;
use crate::progression::xp::{self, STARTING_POINTS};
use super::character::{BaseStats, Character};

/// Hero class archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeroClass {
    /// Channels chaos into physical blows
    Feral,
    /// Fast, cheap strikes and poison
    Shade,
    /// Burns vitality into devastating magic
    EssenceShaper,
}

impl HeroClass {
    pub const ALL: [HeroClass; 3] = [HeroClass::Feral, HeroClass::Shade, HeroClass::EssenceShaper];

    pub fn name(&self) -> &'static str {
        match self {
            HeroClass::Feral => "Feral",
            HeroClass::Shade => "Shade",
            HeroClass::EssenceShaper => "Essence Shaper",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            HeroClass::Feral => "Uses Chaos to empower physical attacks.",
            HeroClass::Shade => "Uses Chaos for quick, efficient strikes.",
            HeroClass::EssenceShaper => "Turns life force into devastating magic.",
        }
    }

    /// Level-1 stats
    pub fn base_stats(&self) -> BaseStats {
        match self {
            HeroClass::Feral => BaseStats::new(50.0, 15.0, 10.0, 10.0, 40.0),
            HeroClass::Shade => BaseStats::new(60.0, 10.0, 5.0, 15.0, 40.0),
            HeroClass::EssenceShaper => BaseStats::new(45.0, 20.0, 10.0, 10.0, 60.0),
        }
    }

    /// The class's two fixed abilities
    pub fn abilities(&self) -> &'static [Ability; 2] {
        match self {
            HeroClass::Feral => &FERAL_ABILITIES,
            HeroClass::Shade => &SHADE_ABILITIES,
            HeroClass::EssenceShaper => &ESSENCE_SHAPER_ABILITIES,
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A player-controlled hero
#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub character: Character,
    class: HeroClass,
    pub(crate) xp: f32,
    pub(crate) proficiency: f32,
    pub(crate) unspent_points: u32,
    pub potions: PotionBelt,
}

impl Hero {
    /// A fresh level-1 hero with the creation point pool still to allocate
    pub fn new(name: impl Into<String>, class: HeroClass, potion_capacity: usize) -> Self {
        Self {
            character: Character::new(name, 1, class.base_stats()),
            class,
            xp: 0.0,
            proficiency: 0.0,
            unspent_points: STARTING_POINTS,
            potions: PotionBelt::new(potion_capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.character.name
    }

    pub fn level(&self) -> u32 {
        self.character.level
    }

    pub fn class(&self) -> HeroClass {
        self.class
    }

    pub fn abilities(&self) -> &'static [Ability; 2] {
        self.class.abilities()
    }

    pub fn xp(&self) -> f32 {
        self.xp
    }

    /// XP needed for the next level (None at max level)
    pub fn xp_to_next_level(&self) -> Option<u32> {
        xp::xp_for_next_level(self.level())
    }

    /// Additive bonus to every ability multiplier
    pub fn proficiency(&self) -> f32 {
        self.proficiency
    }

    /// Attribute points waiting to be allocated
    pub fn unspent_points(&self) -> u32 {
        self.unspent_points
    }

    pub fn is_alive(&self) -> bool {
        self.character.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_hero_uses_class_stats() {
        let hero = Hero::new("Ayla", HeroClass::Shade, 5);
        assert_eq!(hero.level(), 1);
        assert_eq!(hero.character.max_health(), 60.0);
        assert_eq!(hero.character.agility(), 15.0);
        assert_eq!(hero.character.resource(), 40.0);
        assert_eq!(hero.unspent_points(), STARTING_POINTS);
        assert_eq!(hero.xp_to_next_level(), Some(10));
        assert_eq!(hero.potions.capacity(), 5);
    }

    #[test]
    fn test_every_class_has_two_abilities() {
        for class in HeroClass::ALL {
            let abilities = class.abilities();
            assert!(abilities.iter().any(|a| a.is_offensive()));
            assert!(abilities.iter().all(|a| a.cost > 0.0));
        }
    }
}
