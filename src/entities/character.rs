//! Shared character model
//!
//! Heroes, enemies and bosses all wrap a `Character`: base stats, clamped
//! vitals, worn gear and active buffs/effects. Effective stats are always
//! derived, never stored.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::status::{ActiveBuffs, StatusEffects};
use crate::items::{Equipment, Gear};

/// The attributes that gear and buffs can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Defense,
    Agility,
}

impl Attribute {
    pub const ALL: [Attribute; 3] = [Attribute::Strength, Attribute::Defense, Attribute::Agility];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Defense => "Defense",
            Attribute::Agility => "Agility",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Attribute::Strength => "STR",
            Attribute::Defense => "DEF",
            Attribute::Agility => "AGI",
        }
    }
}

/// Base (unmodified) stats
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub health: f32,
    pub strength: f32,
    pub defense: f32,
    pub agility: f32,
    /// Chaos pool consumed by abilities
    pub resource: f32,
}

impl BaseStats {
    pub fn new(health: f32, strength: f32, defense: f32, agility: f32, resource: f32) -> Self {
        Self { health, strength, defense, agility, resource }
    }

    pub fn attribute(&self, attribute: Attribute) -> f32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Defense => self.defense,
            Attribute::Agility => self.agility,
        }
    }
}

/// A combatant
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub name: String,
    pub level: u32,
    pub base: BaseStats,
    health: f32,
    resource: f32,
    equipment: Equipment,
    /// Timed attribute buffs
    pub buffs: ActiveBuffs,
    /// Poison, freeze
    pub effects: StatusEffects,
}

impl Character {
    /// Create a character at full health and chaos
    pub fn new(name: impl Into<String>, level: u32, base: BaseStats) -> Self {
        Self {
            name: name.into(),
            level,
            base,
            health: base.health.max(0.0),
            resource: base.resource.max(0.0),
            equipment: Equipment::new(),
            buffs: ActiveBuffs::default(),
            effects: StatusEffects::default(),
        }
    }

    // ------------------------------------------------------------------
    // Derived stats
    // ------------------------------------------------------------------

    /// Base + gear + active buff
    pub fn attribute(&self, attribute: Attribute) -> f32 {
        self.base.attribute(attribute)
            + self.equipment.total_bonus().attribute(attribute)
            + self.buffs.magnitude(attribute)
    }

    pub fn strength(&self) -> f32 {
        self.attribute(Attribute::Strength)
    }

    pub fn defense(&self) -> f32 {
        self.attribute(Attribute::Defense)
    }

    pub fn agility(&self) -> f32 {
        self.attribute(Attribute::Agility)
    }

    pub fn max_health(&self) -> f32 {
        (self.base.health + self.equipment.total_bonus().health).max(0.0)
    }

    pub fn max_resource(&self) -> f32 {
        (self.base.resource + self.equipment.total_bonus().resource).max(0.0)
    }

    // ------------------------------------------------------------------
    // Vitals
    // ------------------------------------------------------------------

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn resource(&self) -> f32 {
        self.resource
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Apply damage, returning the amount actually lost
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.health);
        self.health -= actual;
        actual
    }

    /// Restore health up to max, returning the amount actually gained
    pub fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.max_health() - self.health).max(0.0);
        self.health += actual;
        actual
    }

    /// Restore chaos up to max, returning the amount actually gained
    pub fn restore_resource(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.max_resource() - self.resource).max(0.0);
        self.resource += actual;
        actual
    }

    /// Spend chaos if enough is available
    pub fn spend_resource(&mut self, cost: f32) -> bool {
        if self.resource < cost {
            return false;
        }
        self.resource = (self.resource - cost).max(0.0);
        true
    }

    /// Fill health and chaos to max
    pub fn restore_full(&mut self) {
        self.health = self.max_health();
        self.resource = self.max_resource();
    }

    /// Full vitals, no buffs, no effects. Used when a run starts.
    pub fn reset_battle_state(&mut self) {
        self.buffs.clear();
        self.effects.clear();
        self.restore_full();
    }

    fn clamp_vitals(&mut self) {
        self.health = self.health.clamp(0.0, self.max_health());
        self.resource = self.resource.clamp(0.0, self.max_resource());
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Wear gear, shifting current vitals by the bonus delta. The replaced
    /// item is handed back only for reporting; it is not kept anywhere.
    pub fn equip(&mut self, gear: Gear) -> Option<Gear> {
        let was_alive = self.is_alive();
        let (old_health, old_resource) = self
            .equipment
            .get(gear.slot)
            .map(|old| (old.bonus.health, old.bonus.resource))
            .unwrap_or((0.0, 0.0));
        let health_delta = gear.bonus.health - old_health;
        let resource_delta = gear.bonus.resource - old_resource;

        let replaced = self.equipment.equip(gear);
        // The dead stay dead; gear never kills the living
        if was_alive {
            self.health += health_delta;
        }
        self.resource += resource_delta;
        self.clamp_vitals();
        if was_alive && !self.is_alive() {
            self.health = self.max_health().min(1.0);
        }
        replaced
    }

    /// Destroy one random equipped item, returning it if there was one
    pub fn destroy_random_gear(&mut self, rng: &mut impl Rng) -> Option<Gear> {
        let destroyed = self.equipment.remove_random(rng)?;
        self.clamp_vitals();
        Some(destroyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{EquipSlot, Rarity, StatBonus};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dummy() -> Character {
        Character::new("Dummy", 1, BaseStats::new(50.0, 15.0, 10.0, 10.0, 40.0))
    }

    fn weapon(health: f32, strength: f32) -> Gear {
        Gear {
            name: "Test Blade".to_string(),
            rarity: Rarity::Common,
            slot: EquipSlot::Weapon,
            bonus: StatBonus { health, strength, ..Default::default() },
        }
    }

    #[test]
    fn test_derived_stats_include_gear_and_buff() {
        let mut c = dummy();
        c.equip(weapon(0.0, 4.0));
        c.buffs.apply(Attribute::Strength, 5.0, 3);
        assert_eq!(c.strength(), 24.0);
        assert_eq!(c.defense(), 10.0);
    }

    #[test]
    fn test_equip_shifts_health_by_delta() {
        let mut c = dummy();
        c.equip(weapon(2.0, 0.0));
        c.take_damage(20.0);
        assert_eq!(c.health(), 32.0);

        c.equip(weapon(5.0, 0.0));
        assert_eq!(c.health(), 35.0);
        assert_eq!(c.max_health(), 55.0);
    }

    #[test]
    fn test_equip_downgrade_reclamps() {
        let mut c = dummy();
        c.equip(weapon(10.0, 0.0));
        assert_eq!(c.health(), 60.0);
        c.equip(weapon(0.0, 0.0));
        assert_eq!(c.health(), 50.0);
        assert_eq!(c.max_health(), 50.0);
    }

    #[test]
    fn test_equip_never_kills() {
        let mut c = dummy();
        c.equip(weapon(10.0, 0.0));
        c.take_damage(55.0);
        c.equip(weapon(0.0, 0.0));
        assert!(c.is_alive());
        assert_eq!(c.health(), 1.0);
    }

    #[test]
    fn test_equip_does_not_revive() {
        let mut c = dummy();
        c.take_damage(50.0);
        assert!(!c.is_alive());
        c.equip(weapon(30.0, 0.0));
        assert_eq!(c.health(), 0.0);
        assert!(!c.is_alive());
        assert_eq!(c.max_health(), 80.0);
    }

    #[test]
    fn test_vitals_stay_clamped() {
        let mut c = dummy();
        assert_eq!(c.take_damage(500.0), 50.0);
        assert_eq!(c.health(), 0.0);
        assert!(!c.is_alive());
        assert_eq!(c.heal(500.0), 50.0);
        assert_eq!(c.health(), 50.0);
        assert!(c.spend_resource(30.0));
        assert!(!c.spend_resource(30.0));
        assert_eq!(c.restore_resource(100.0), 30.0);
        assert_eq!(c.resource(), 40.0);
    }

    #[test]
    fn test_destroyed_gear_lowers_max() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut c = dummy();
        c.equip(weapon(10.0, 0.0));
        assert_eq!(c.health(), 60.0);
        let destroyed = c.destroy_random_gear(&mut rng);
        assert!(destroyed.is_some());
        assert_eq!(c.health(), 50.0);
        assert!(c.destroy_random_gear(&mut rng).is_none());
    }
}
