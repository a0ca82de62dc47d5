//! Potion inventory
//!
//! An ordered, bounded list of potions. Excess potions are rejected rather
//! than dropped silently.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use super::item::Potion;

/// Ordered potion storage with a fixed capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionBelt {
    potions: Vec<Potion>,
    capacity: usize,
}

impl PotionBelt {
    pub fn new(capacity: usize) -> Self {
        Self {
            potions: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.potions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.potions.len() >= self.capacity
    }

    /// Append a potion, handing it back if the belt is full
    pub fn add(&mut self, potion: Potion) -> Result<(), (Potion, ValidationError)> {
        if self.is_full() {
            return Err((potion, ValidationError::InventoryFull { capacity: self.capacity }));
        }
        self.potions.push(potion);
        Ok(())
    }

    /// Remove the potion at an index, keeping the order of the rest
    pub fn take(&mut self, index: usize) -> Option<Potion> {
        if index < self.potions.len() {
            Some(self.potions.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Potion> {
        self.potions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{PotionKind, Rarity};

    fn potion(name: &str) -> Potion {
        Potion {
            name: name.to_string(),
            rarity: Rarity::Common,
            kind: PotionKind::Heal,
            potency: 50.0,
            duration: 0,
        }
    }

    #[test]
    fn test_full_belt_rejects_and_returns_potion() {
        let mut belt = PotionBelt::new(2);
        belt.add(potion("a")).unwrap();
        belt.add(potion("b")).unwrap();
        assert!(belt.is_full());

        let (back, err) = belt.add(potion("c")).unwrap_err();
        assert_eq!(back.name, "c");
        assert_eq!(err, ValidationError::InventoryFull { capacity: 2 });
        assert_eq!(belt.len(), 2);
    }

    #[test]
    fn test_take_preserves_order() {
        let mut belt = PotionBelt::new(5);
        for name in ["a", "b", "c"] {
            belt.add(potion(name)).unwrap();
        }
        assert_eq!(belt.take(1).map(|p| p.name), Some("b".to_string()));
        let names: Vec<&str> = belt.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert!(belt.take(7).is_none());
    }
}
