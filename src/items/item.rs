//! Item definitions
//!
//! Gear carries a bonus vector over the five base stats; potions restore
//! vitals or grant a timed attribute buff.

use std::fmt;
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};
use crate::entities::Attribute;

/// Item rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

impl Rarity {
    /// All tiers in ascending order (the order cumulative selection walks)
    pub const ALL: [Rarity; 3] = [Rarity::Common, Rarity::Uncommon, Rarity::Rare];

    /// Selection probability
    pub fn chance(&self) -> f64 {
        match self {
            Rarity::Common => 0.75,
            Rarity::Uncommon => 0.20,
            Rarity::Rare => 0.05,
        }
    }

    /// Multiplier applied to generated bonuses and potency
    pub fn multiplier(&self) -> f32 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.5,
            Rarity::Rare => 2.5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
        }
    }
}

/// Equipment slot for wearable items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Helmet,
    Armor,
    Leggings,
    Boots,
}

impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Weapon => "Weapon",
            EquipSlot::Helmet => "Helmet",
            EquipSlot::Armor => "Armor",
            EquipSlot::Leggings => "Leggings",
            EquipSlot::Boots => "Boots",
        }
    }

    /// Get all slots in display order
    pub fn all() -> &'static [EquipSlot] {
        &[
            EquipSlot::Weapon,
            EquipSlot::Helmet,
            EquipSlot::Armor,
            EquipSlot::Leggings,
            EquipSlot::Boots,
        ]
    }
}

/// Flat bonuses granted by a piece of gear
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBonus {
    pub health: f32,
    pub strength: f32,
    pub defense: f32,
    pub agility: f32,
    pub resource: f32,
}

impl StatBonus {
    /// Bonus to one of the buffable attributes
    pub fn attribute(&self, attribute: Attribute) -> f32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Defense => self.defense,
            Attribute::Agility => self.agility,
        }
    }
}

impl AddAssign for StatBonus {
    fn add_assign(&mut self, other: Self) {
        self.health += other.health;
        self.strength += other.strength;
        self.defense += other.defense;
        self.agility += other.agility;
        self.resource += other.resource;
    }
}

impl fmt::Display for StatBonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("STR", self.strength),
            ("DEF", self.defense),
            ("AGI", self.agility),
            ("HP", self.health),
            ("CHAOS", self.resource),
        ]
        .iter()
        .filter(|(_, value)| *value != 0.0)
        .map(|(label, value)| format!("{:+.1} {}", value, label))
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// A wearable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gear {
    pub name: String,
    pub rarity: Rarity,
    pub slot: EquipSlot,
    pub bonus: StatBonus,
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.name, self.rarity.name(), self.bonus)
    }
}

/// What drinking a potion does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotionKind {
    /// Restore health
    Heal,
    /// Restore chaos
    RestoreResource,
    /// Temporary attribute bonus
    Buff(Attribute),
}

/// A consumable potion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potion {
    pub name: String,
    pub rarity: Rarity,
    pub kind: PotionKind,
    pub potency: f32,
    /// Buff duration in turns (0 for instant potions)
    pub duration: u32,
}

impl fmt::Display for Potion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ", self.name, self.rarity.name())?;
        match self.kind {
            PotionKind::Heal => write!(f, "(heals {:.1} HP)", self.potency),
            PotionKind::RestoreResource => write!(f, "(restores {:.1} chaos)", self.potency),
            PotionKind::Buff(attribute) => write!(
                f,
                "(+{:.1} {} for {} turns)",
                self.potency,
                attribute.abbrev(),
                self.duration
            ),
        }
    }
}

/// An item offered after a victory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reward {
    Gear(Gear),
    Potion(Potion),
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reward::Gear(gear) => gear.fmt(f),
            Reward::Potion(potion) => potion.fmt(f),
        }
    }
}
