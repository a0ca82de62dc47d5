//! Status effects system
//!
//! Handles timed attribute buffs and the poison/frozen status effects.
//!
//! Durations are stored as `duration + 1`. The first tick after application
//! (the target's tick later in the same round, or the caster's own next tick
//! for self-buffs) consumes the extra unit, so an effect lasts exactly its
//! stated number of turns after the turn it was applied. Ticks run damage
//! first, then decrement, and remove at 0.

use serde::{Deserialize, Serialize};
use crate::entities::{Attribute, Character};

/// Stored turns for an effect with the given stated duration
pub fn stored_turns(duration: u32) -> u32 {
    duration + 1
}

/// A timed bonus to one attribute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub attribute: Attribute,
    pub magnitude: f32,
    pub remaining_turns: u32,
}

/// Active buffs, at most one per attribute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveBuffs {
    buffs: Vec<Buff>,
}

impl ActiveBuffs {
    /// Set a buff, overwriting any buff on the same attribute
    pub fn apply(&mut self, attribute: Attribute, magnitude: f32, duration: u32) {
        let buff = Buff {
            attribute,
            magnitude,
            remaining_turns: stored_turns(duration),
        };
        match self.buffs.iter_mut().find(|b| b.attribute == attribute) {
            Some(existing) => *existing = buff,
            None => self.buffs.push(buff),
        }
    }

    /// Magnitude of the buff on an attribute (0 if none)
    pub fn magnitude(&self, attribute: Attribute) -> f32 {
        self.get(attribute).map(|b| b.magnitude).unwrap_or(0.0)
    }

    pub fn get(&self, attribute: Attribute) -> Option<&Buff> {
        self.buffs.iter().find(|b| b.attribute == attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buff> {
        self.buffs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    /// Count every buff down one turn, returning the attributes that expired
    pub fn tick(&mut self) -> Vec<Attribute> {
        let mut expired = Vec::new();
        self.buffs.retain_mut(|buff| {
            buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
            if buff.remaining_turns == 0 {
                expired.push(buff.attribute);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
    }
}

/// Kinds of status effect, for lookups and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Poison,
    Frozen,
}

impl StatusKind {
    /// Get display name for this effect
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::Poison => "Poison",
            StatusKind::Frozen => "Frozen",
        }
    }
}

/// An active status effect with its own payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Fixed damage at the start of each of the holder's turns
    Poison { damage: f32, remaining_turns: u32 },
    /// The holder skips its action
    Frozen { remaining_turns: u32 },
}

impl StatusEffect {
    /// Poison lasting `duration` turns after the one it lands on
    pub fn poison(damage: f32, duration: u32) -> Self {
        StatusEffect::Poison {
            damage,
            remaining_turns: stored_turns(duration),
        }
    }

    /// Freeze lasting `duration` turns including the one it lands on
    pub fn frozen(duration: u32) -> Self {
        StatusEffect::Frozen {
            remaining_turns: stored_turns(duration),
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            StatusEffect::Poison { .. } => StatusKind::Poison,
            StatusEffect::Frozen { .. } => StatusKind::Frozen,
        }
    }

    pub fn remaining_turns(&self) -> u32 {
        match *self {
            StatusEffect::Poison { remaining_turns, .. } => remaining_turns,
            StatusEffect::Frozen { remaining_turns } => remaining_turns,
        }
    }

    fn remaining_turns_mut(&mut self) -> &mut u32 {
        match self {
            StatusEffect::Poison { remaining_turns, .. } => remaining_turns,
            StatusEffect::Frozen { remaining_turns } => remaining_turns,
        }
    }
}

/// Collection of active status effects, at most one per kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    /// Add an effect, replacing an existing effect of the same kind
    pub fn apply(&mut self, effect: StatusEffect) {
        let kind = effect.kind();
        match self.effects.iter_mut().find(|e| e.kind() == kind) {
            Some(existing) => *existing = effect,
            None => self.effects.push(effect),
        }
    }

    /// Check if an effect is active
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind() == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Clear all effects
    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

/// Result of ticking a character's buffs and effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTickResult {
    /// Poison damage actually taken
    pub poison_damage: Option<f32>,
    /// Buffs that ran out this tick
    pub expired_buffs: Vec<Attribute>,
    /// Effects that ran out this tick
    pub expired_effects: Vec<StatusKind>,
    /// The character died during the tick
    pub died: bool,
}

impl Character {
    pub fn is_frozen(&self) -> bool {
        self.effects.has(StatusKind::Frozen)
    }

    /// Start-of-turn processing: buffs count down, then effects in the order
    /// they were applied. A lethal poison tick stops processing at once.
    pub fn tick_effects(&mut self) -> StatusTickResult {
        let mut result = StatusTickResult {
            expired_buffs: self.buffs.tick(),
            ..Default::default()
        };

        let mut index = 0;
        while index < self.effects.effects.len() {
            let mut effect = self.effects.effects[index];

            if let StatusEffect::Poison { damage, .. } = effect {
                let taken = self.take_damage(damage);
                result.poison_damage = Some(result.poison_damage.unwrap_or(0.0) + taken);
                if !self.is_alive() {
                    result.died = true;
                    return result;
                }
            }

            let remaining = effect.remaining_turns_mut();
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.effects.effects.remove(index);
                result.expired_effects.push(effect.kind());
            } else {
                self.effects.effects[index] = effect;
                index += 1;
            }
        }

        result
    }
}
