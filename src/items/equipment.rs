//! Equipment system
//!
//! Manages equipped gear and calculates total bonuses.

use std::collections::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use super::item::{EquipSlot, Gear, StatBonus};

/// Gear worn by a character, one item per slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Items in each slot
    slots: HashMap<EquipSlot, Gear>,
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Equip an item, returning the previously equipped item if any
    pub fn equip(&mut self, gear: Gear) -> Option<Gear> {
        self.slots.insert(gear.slot, gear)
    }

    /// Get item in a slot
    pub fn get(&self, slot: EquipSlot) -> Option<&Gear> {
        self.slots.get(&slot)
    }

    /// Number of occupied slots
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Get all equipped items in slot order
    pub fn all_items(&self) -> impl Iterator<Item = &Gear> {
        EquipSlot::all().iter().filter_map(|slot| self.slots.get(slot))
    }

    /// Sum of all equipped bonuses
    pub fn total_bonus(&self) -> StatBonus {
        let mut total = StatBonus::default();
        for gear in self.slots.values() {
            total += gear.bonus;
        }
        total
    }

    /// Remove one item chosen uniformly among occupied slots
    pub fn remove_random(&mut self, rng: &mut impl Rng) -> Option<Gear> {
        let occupied: Vec<EquipSlot> = EquipSlot::all()
            .iter()
            .copied()
            .filter(|slot| self.slots.contains_key(slot))
            .collect();
        if occupied.is_empty() {
            return None;
        }
        let slot = occupied[rng.gen_range(0..occupied.len())];
        self.slots.remove(&slot)
    }
}
