//! Damage calculation
//!
//! Handles all combat math: hit and flee chances, physical and magical damage.

use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::entities::Character;

/// Hit chance for a basic attack (percentage 20-100)
pub fn hit_chance(attacker_agility: f32, target_agility: f32) -> f32 {
    (90.0 - (target_agility - attacker_agility)).clamp(20.0, 100.0)
}

/// Chance to escape an encounter (percentage 10-90)
pub fn flee_chance(fleeing_agility: f32, opponent_agility: f32) -> f32 {
    (50.0 + (fleeing_agility - opponent_agility)).clamp(10.0, 90.0)
}

/// Physical damage: defense absorbs 30% of its value, minimum 1
pub fn physical_damage(attacker_strength: f32, target_defense: f32) -> f32 {
    (attacker_strength - 0.3 * target_defense).max(1.0)
}

/// Magical damage ignores defense. Proficiency adds to every multiplier, so
/// a zero-multiplier ability still hurts once the caster has levelled.
pub fn magical_damage(attacker_strength: f32, multiplier: f32, proficiency: f32) -> f32 {
    (attacker_strength * (multiplier + proficiency)).max(0.0)
}

/// Roll 1-100 against a percentage chance
pub fn roll_percent(chance: f32, rng: &mut impl Rng) -> bool {
    rng.gen_range(1..=100) as f32 <= chance
}

/// Result of a basic attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackResult {
    Hit { damage: f32 },
    Missed,
}

/// Resolve a basic attack and apply its damage to the target
pub fn basic_attack(attacker: &Character, target: &mut Character, rng: &mut impl Rng) -> AttackResult {
    let chance = hit_chance(attacker.agility(), target.agility());
    if !roll_percent(chance, rng) {
        log::debug!("{} missed {} ({:.0}% to hit)", attacker.name, target.name, chance);
        return AttackResult::Missed;
    }

    let damage = target.take_damage(physical_damage(attacker.strength(), target.defense()));
    AttackResult::Hit { damage }
}
