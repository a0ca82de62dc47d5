//! Item templates for potions and gear names

use serde::{Deserialize, Serialize};
use crate::entities::Attribute;
use crate::items::{EquipSlot, PotionKind};

/// A potion recipe; potency is scaled by rarity when the potion is rolled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionTemplate {
    pub name: String,
    pub kind: PotionKind,
    /// Amount restored, or buff magnitude
    pub potency: f32,
    /// Buff duration in turns (0 for instant potions)
    #[serde(default)]
    pub duration: u32,
}

/// Word lists used to name generated gear for one slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearNames {
    pub slot: EquipSlot,
    pub nouns: Vec<String>,
    pub adjectives: Vec<String>,
}

impl GearNames {
    fn new(slot: EquipSlot, nouns: &[&str], adjectives: &[&str]) -> Self {
        Self {
            slot,
            nouns: nouns.iter().map(|s| s.to_string()).collect(),
            adjectives: adjectives.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Create default potion templates (hardcoded fallback)
pub fn default_potion_templates() -> Vec<PotionTemplate> {
    let potion = |name: &str, kind, potency, duration| PotionTemplate {
        name: name.to_string(),
        kind,
        potency,
        duration,
    };
    vec![
        potion("Healing Potion", PotionKind::Heal, 50.0, 0),
        potion("Chaos Draught", PotionKind::RestoreResource, 40.0, 0),
        potion("Elixir of Strength", PotionKind::Buff(Attribute::Strength), 5.0, 3),
        potion("Ironbark Tonic", PotionKind::Buff(Attribute::Defense), 5.0, 3),
        potion("Agility Extract", PotionKind::Buff(Attribute::Agility), 5.0, 3),
    ]
}

/// Create default gear name tables, one per slot
pub fn default_gear_names() -> Vec<GearNames> {
    vec![
        GearNames::new(EquipSlot::Weapon, &["Sword", "Axe"], &["Brutal", "Swift"]),
        GearNames::new(EquipSlot::Helmet, &["Helm", "Cap"], &["Warden's", "Shadowed"]),
        GearNames::new(EquipSlot::Armor, &["Breastplate", "Chainmail"], &["Plated", "Light"]),
        GearNames::new(EquipSlot::Leggings, &["Greaves", "Trousers"], &["Battle", "Traveler's"]),
        GearNames::new(EquipSlot::Boots, &["Boots", "Treads"], &["Running", "Heavy"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_slot_has_names() {
        let names = default_gear_names();
        for slot in EquipSlot::all() {
            let entry = names.iter().find(|n| n.slot == *slot).expect("slot missing");
            assert!(!entry.nouns.is_empty());
            assert!(!entry.adjectives.is_empty());
        }
    }

    #[test]
    fn test_only_buff_potions_have_duration() {
        for template in default_potion_templates() {
            match template.kind {
                PotionKind::Buff(_) => assert!(template.duration > 0),
                _ => assert_eq!(template.duration, 0),
            }
        }
    }
}
