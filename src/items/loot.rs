//! Loot generation system
//!
//! Rolls rarities, level-scaled gear and potions, and the reward offer a
//! hero picks from after each victory.

use rand::Rng;

use crate::data::GameData;
use crate::entities::Hero;
use crate::error::{IllegalActionError, Result, ValidationError};
use crate::game::events::{EventSink, GameEvent};
use super::item::{EquipSlot, Gear, Potion, Rarity, Reward, StatBonus};

/// Roll a rarity by cumulative probability
pub fn roll_rarity(rng: &mut impl Rng) -> Rarity {
    let roll = rng.gen::<f64>();
    let mut cumulative = 0.0;
    for rarity in Rarity::ALL {
        cumulative += rarity.chance();
        if roll < cumulative {
            return rarity;
        }
    }
    Rarity::Common
}

/// Uniform roll in `[low, low + span)`
fn roll_span(low: f32, span: f32, rng: &mut impl Rng) -> f32 {
    low + rng.gen::<f32>() * span
}

/// Generate a piece of gear for a random slot, scaled to the hero's level
pub fn generate_gear(level: u32, data: &GameData, rng: &mut impl Rng) -> Gear {
    let slots = EquipSlot::all();
    let slot = slots[rng.gen_range(0..slots.len())];
    let rarity = roll_rarity(rng);
    let base = 2.0 * level.max(1) as f32;
    let mult = rarity.multiplier();

    // Only weapons and helmets can carry the chaos bonus
    let resource = if rng.gen_bool(data.rules.resource_bonus_chance.clamp(0.0, 1.0)) {
        roll_span(base, 2.0, rng) * mult
    } else {
        0.0
    };

    let mut bonus = StatBonus::default();
    match slot {
        EquipSlot::Weapon => {
            bonus.strength = roll_span(base, 3.0, rng) * mult;
            bonus.resource = resource;
        }
        EquipSlot::Helmet => {
            bonus.defense = roll_span(base, 2.0, rng) * mult;
            bonus.agility = -roll_span(1.0, 1.0, rng);
            bonus.resource = resource;
        }
        EquipSlot::Armor => {
            bonus.defense = roll_span(base, 5.0, rng) * mult;
            bonus.health = 2.0 * base * mult;
        }
        EquipSlot::Leggings => {
            bonus.agility = roll_span(base, 2.0, rng) * mult;
            bonus.health = base * mult;
        }
        EquipSlot::Boots => {
            bonus.agility = roll_span(base, 2.0, rng) * mult;
            bonus.defense = -roll_span(1.0, 1.0, rng);
        }
    }

    Gear {
        name: data.random_gear_name(slot, rng),
        rarity,
        slot,
        bonus,
    }
}

/// Generate a potion from the template table; potency scales with rarity
pub fn generate_potion(data: &GameData, rng: &mut impl Rng) -> Potion {
    let template = data.random_potion(rng);
    let rarity = roll_rarity(rng);
    Potion {
        name: template.name.clone(),
        rarity,
        kind: template.kind,
        potency: template.potency * rarity.multiplier(),
        duration: template.duration,
    }
}

/// Generate a single reward: gear or a potion
pub fn generate_reward(level: u32, data: &GameData, rng: &mut impl Rng) -> Reward {
    if rng.gen_bool(data.rules.gear_chance.clamp(0.0, 1.0)) {
        Reward::Gear(generate_gear(level, data, rng))
    } else {
        Reward::Potion(generate_potion(data, rng))
    }
}

/// Roll the rewards offered after a victory
pub fn offer_rewards(level: u32, data: &GameData, rng: &mut impl Rng) -> RewardOffer {
    let rewards = (0..data.rules.reward_choices)
        .map(|_| Some(generate_reward(level, data, rng)))
        .collect();
    RewardOffer { rewards, closed: false }
}

/// Rewards on the table after a victory. The hero takes at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardOffer {
    /// `None` marks a slot forfeited by a failed pick
    rewards: Vec<Option<Reward>>,
    closed: bool,
}

impl RewardOffer {
    /// Rewards still on offer, with their indices
    pub fn rewards(&self) -> impl Iterator<Item = (usize, &Reward)> {
        self.rewards
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|r| (i, r)))
    }

    pub fn get(&self, index: usize) -> Option<&Reward> {
        self.rewards.get(index).and_then(|r| r.as_ref())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Nothing left to pick
    pub fn is_exhausted(&self) -> bool {
        self.rewards.iter().all(|r| r.is_none())
    }

    /// Take one reward. Gear is equipped at once, replacing whatever was in
    /// the slot. A potion goes on the belt; if the belt is full the potion is
    /// lost and the hero may pick again.
    pub fn choose(&mut self, index: usize, hero: &mut Hero, sink: &mut dyn EventSink) -> Result<()> {
        if self.closed {
            return Err(IllegalActionError::OfferClosed.into());
        }
        let reward = self
            .rewards
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(ValidationError::NoSuchReward(index))?;

        match reward {
            Reward::Gear(gear) => {
                let item = gear.to_string();
                let replaced = hero.character.equip(gear).map(|old| old.to_string());
                sink.emit(&GameEvent::GearEquipped {
                    hero: hero.name().to_string(),
                    item,
                    replaced,
                });
            }
            Reward::Potion(potion) => {
                if let Err((potion, err)) = hero.potions.add(potion) {
                    sink.emit(&GameEvent::PotionDiscarded {
                        hero: hero.name().to_string(),
                        potion: potion.to_string(),
                    });
                    if self.is_exhausted() {
                        self.closed = true;
                    }
                    return Err(err.into());
                }
                let stored = hero.potions.iter().last().map(|p| p.to_string()).unwrap_or_default();
                sink.emit(&GameEvent::PotionStored {
                    hero: hero.name().to_string(),
                    potion: stored,
                });
            }
        }

        self.closed = true;
        Ok(())
    }

    /// Walk away with nothing
    pub fn decline(&mut self, hero: &Hero, sink: &mut dyn EventSink) {
        if !self.closed {
            self.closed = true;
            sink.emit(&GameEvent::RewardsDeclined { hero: hero.name().to_string() });
        }
    }
}
