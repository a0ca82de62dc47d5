//! Level-ups, attribute allocation and XP penalties

use serde::{Deserialize, Serialize};

use crate::entities::{Attribute, Hero};
use crate::error::ValidationError;
use super::xp::{
    self, HEALTH_PER_LEVEL, MAX_LEVEL, POINTS_PER_LEVEL, PROFICIENCY_PER_LEVEL,
    RESOURCE_PER_LEVEL,
};

/// Points to add to each attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub strength: u32,
    pub defense: u32,
    pub agility: u32,
}

impl Allocation {
    pub fn new(strength: u32, defense: u32, agility: u32) -> Self {
        Self { strength, defense, agility }
    }

    /// Everything into one attribute
    pub fn all_into(attribute: Attribute, points: u32) -> Self {
        let mut allocation = Self::default();
        match attribute {
            Attribute::Strength => allocation.strength = points,
            Attribute::Defense => allocation.defense = points,
            Attribute::Agility => allocation.agility = points,
        }
        allocation
    }

    pub fn total(&self) -> u32 {
        self.strength.saturating_add(self.defense).saturating_add(self.agility)
    }
}

/// Summary of one level gained
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelUp {
    pub level: u32,
    pub points_granted: u32,
}

impl Hero {
    /// Add XP, levelling up as many times as the total allows. Excess XP
    /// carries over. Does nothing at max level.
    pub fn gain_xp(&mut self, amount: f32) -> Vec<LevelUp> {
        let mut gained = Vec::new();
        if self.level() >= MAX_LEVEL {
            return gained;
        }

        self.xp += amount.max(0.0);
        while let Some(threshold) = self.xp_to_next_level() {
            if self.xp < threshold as f32 {
                break;
            }
            self.xp -= threshold as f32;
            gained.push(self.level_up());
        }
        gained
    }

    fn level_up(&mut self) -> LevelUp {
        let character = &mut self.character;
        character.level += 1;
        character.base.health += HEALTH_PER_LEVEL;
        character.base.resource += RESOURCE_PER_LEVEL;
        self.proficiency += PROFICIENCY_PER_LEVEL;
        self.unspent_points += POINTS_PER_LEVEL;
        self.character.restore_full();

        log::info!(
            "{} reached level {} ({})",
            self.name(),
            self.level(),
            xp::level_title(self.level())
        );
        LevelUp {
            level: self.level(),
            points_granted: POINTS_PER_LEVEL,
        }
    }

    /// Spend pending attribute points. Unspent points stay pending.
    pub fn allocate_points(&mut self, allocation: Allocation) -> Result<(), ValidationError> {
        let requested = allocation.total();
        if requested > self.unspent_points {
            return Err(ValidationError::AllocationExceedsPool {
                requested,
                available: self.unspent_points,
            });
        }

        let base = &mut self.character.base;
        base.strength += allocation.strength as f32;
        base.defense += allocation.defense as f32;
        base.agility += allocation.agility as f32;
        self.unspent_points -= requested;
        Ok(())
    }

    /// Fails while attribute points are still waiting to be spent
    pub fn ensure_points_allocated(&self) -> Result<(), ValidationError> {
        match self.unspent_points {
            0 => Ok(()),
            pending => Err(ValidationError::UnallocatedPoints(pending)),
        }
    }

    /// Remove a fraction of current XP, returning the amount lost
    pub fn lose_xp_fraction(&mut self, fraction: f32) -> f32 {
        let lost = self.xp * fraction.clamp(0.0, 1.0);
        self.xp -= lost;
        lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::HeroClass;

    fn hero() -> Hero {
        let mut hero = Hero::new("Bram", HeroClass::Feral, 5);
        hero.allocate_points(Allocation::new(5, 5, 5)).unwrap();
        hero
    }

    #[test]
    fn test_single_award_crosses_two_thresholds() {
        let mut hero = hero();
        let levels = hero.gain_xp(37.0);
        assert_eq!(levels.len(), 2);
        assert_eq!(hero.level(), 3);
        assert_eq!(hero.xp(), 2.0);
        assert_eq!(hero.xp_to_next_level(), Some(50));
    }

    #[test]
    fn test_level_up_growth() {
        let mut hero = hero();
        hero.character.take_damage(30.0);
        let levels = hero.gain_xp(10.0);
        assert_eq!(levels, vec![LevelUp { level: 2, points_granted: 5 }]);
        assert_eq!(hero.character.base.health, 70.0);
        assert_eq!(hero.character.base.resource, 50.0);
        assert!((hero.proficiency() - 0.05).abs() < 1e-6);
        assert_eq!(hero.unspent_points(), 5);
        assert_eq!(hero.character.health(), 70.0);
        assert_eq!(hero.character.resource(), 50.0);
    }

    #[test]
    fn test_xp_is_noop_at_max_level() {
        let mut hero = hero();
        hero.gain_xp(10.0 + 25.0 + 50.0 + 80.0 + 7.0);
        assert_eq!(hero.level(), MAX_LEVEL);
        assert_eq!(hero.xp_to_next_level(), None);
        let xp_before = hero.xp();
        assert!(hero.gain_xp(500.0).is_empty());
        assert_eq!(hero.xp(), xp_before);
    }

    #[test]
    fn test_allocation_validation() {
        let mut hero = Hero::new("Cora", HeroClass::Shade, 5);
        let err = hero.allocate_points(Allocation::new(10, 5, 1)).unwrap_err();
        assert_eq!(err, ValidationError::AllocationExceedsPool { requested: 16, available: 15 });
        assert_eq!(hero.character.base.strength, 10.0);

        hero.allocate_points(Allocation::new(4, 0, 6)).unwrap();
        assert_eq!(hero.character.base.strength, 14.0);
        assert_eq!(hero.character.base.agility, 21.0);
        assert_eq!(hero.ensure_points_allocated(), Err(ValidationError::UnallocatedPoints(5)));

        hero.allocate_points(Allocation::all_into(Attribute::Defense, 5)).unwrap();
        assert!(hero.ensure_points_allocated().is_ok());
    }

    #[test]
    fn test_xp_penalty() {
        let mut hero = hero();
        hero.gain_xp(8.0);
        let lost = hero.lose_xp_fraction(0.7);
        assert!((lost - 5.6).abs() < 1e-4);
        assert!((hero.xp() - 2.4).abs() < 1e-4);
    }
}
