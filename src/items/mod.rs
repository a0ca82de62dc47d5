//! Item system

pub mod item;
pub mod inventory;
pub mod equipment;
pub mod loot;

pub use item::{Rarity, EquipSlot, StatBonus, Gear, PotionKind, Potion, Reward};
pub use inventory::PotionBelt;
pub use equipment::Equipment;
pub use loot::{roll_rarity, generate_gear, generate_potion, generate_reward, offer_rewards, RewardOffer};
