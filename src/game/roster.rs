//! Hero roster
//!
//! Owns every created hero for the lifetime of the process, keyed by name.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::data::Rules;
use crate::entities::{Hero, HeroClass};
use crate::error::{IllegalActionError, Result, ValidationError};

#[derive(Debug, Clone, Default)]
pub struct Roster {
    heroes: BTreeMap<String, Hero>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a level-1 hero. Names are trimmed and must be unique.
    pub fn create_hero(&mut self, name: &str, class: HeroClass, rules: &Rules) -> Result<&mut Hero> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        match self.heroes.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ValidationError::DuplicateName(name.to_string()).into()),
            Entry::Vacant(slot) => {
                log::info!("Created hero {} the {}", name, class);
                Ok(slot.insert(Hero::new(name, class, rules.potion_capacity)))
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Hero> {
        self.heroes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Hero> {
        self.heroes.get_mut(name)
    }

    /// Like `get_mut`, but an unknown name is an error
    pub fn hero_mut(&mut self, name: &str) -> Result<&mut Hero> {
        self.heroes
            .get_mut(name)
            .ok_or_else(|| IllegalActionError::UnknownHero(name.to_string()).into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Hero> {
        self.heroes.remove(name)
    }

    /// Hero names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.heroes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hero> {
        self.heroes.values()
    }

    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}
