//! Run and loot rules
//!
//! Numbers the dungeon master might want to tweak without recompiling.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Tunable rules for runs, penalties and reward generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Lives every hero starts with
    pub starting_lives: u32,
    /// Regular floors in the first dungeon (the boss floor comes on top)
    pub starting_floors: u32,
    /// Floors added to the dungeon after each full clear
    pub floors_per_clear: u32,
    /// Fraction of current XP lost on defeat
    pub death_xp_penalty: f32,
    /// Fleeing costs this fraction of the death penalty
    pub flee_penalty_factor: f32,
    /// Chance that a failed flee destroys an equipped item
    pub flee_break_chance: f64,
    /// Maximum potions a hero can carry
    pub potion_capacity: usize,
    /// Items presented by each reward offer
    pub reward_choices: usize,
    /// Chance that a reward slot rolls gear instead of a potion
    pub gear_chance: f64,
    /// Chance that generated gear also carries a chaos bonus
    pub resource_bonus_chance: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            starting_floors: 3,
            floors_per_clear: 1,
            death_xp_penalty: 0.70,
            flee_penalty_factor: 0.5,
            flee_break_chance: 0.25,
            potion_capacity: 5,
            reward_choices: 3,
            gear_chance: 0.6,
            resource_bonus_chance: 0.2,
        }
    }
}

impl Rules {
    /// Fraction of current XP lost when fleeing a run
    pub fn flee_xp_penalty(&self) -> f32 {
        self.death_xp_penalty * self.flee_penalty_factor
    }

    /// Every chance and penalty fraction must lie in `[0, 1]` (NaN fails)
    pub fn validate(&self) -> Result<(), DataError> {
        let fractions = [
            ("death_xp_penalty", self.death_xp_penalty as f64),
            ("flee_penalty_factor", self.flee_penalty_factor as f64),
            ("flee_break_chance", self.flee_break_chance),
            ("gear_chance", self.gear_chance),
            ("resource_bonus_chance", self.resource_bonus_chance),
        ];
        match fractions.iter().find(|(_, value)| !(0.0..=1.0).contains(value)) {
            Some(&(name, _)) => Err(DataError::InvalidRule(name)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flee_penalty_is_half_of_death_penalty() {
        let rules = Rules::default();
        assert!((rules.flee_xp_penalty() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_partial_rules_file_keeps_defaults() {
        let rules: Rules = ron::from_str("(starting_lives: 5)").unwrap();
        assert_eq!(rules.starting_lives, 5);
        assert_eq!(rules.potion_capacity, 5);
        assert_eq!(rules.reward_choices, 3);
    }

    #[test]
    fn test_validate_rejects_nan_and_out_of_range() {
        assert!(Rules::default().validate().is_ok());

        let rules: Rules = ron::from_str("(gear_chance: NaN)").unwrap();
        assert!(matches!(rules.validate(), Err(DataError::InvalidRule("gear_chance"))));

        let rules = Rules { flee_break_chance: 1.5, ..Rules::default() };
        assert!(matches!(rules.validate(), Err(DataError::InvalidRule("flee_break_chance"))));
    }
}
