//! Chaosdelve - a turn-based dungeon crawler engine
//!
//! Create heroes, descend through floors of generated foes and a boss, and
//! grow stronger through levels and loot. The engine narrates through an
//! [`EventSink`](game::EventSink) and never touches the terminal itself.

pub mod error;
pub mod data;
pub mod entities;
pub mod combat;
pub mod items;
pub mod progression;
pub mod game;

// Re-export commonly used types
pub use error::{GameError, IllegalActionError, ValidationError, DataError, Result};
pub use data::{GameData, Rules};
pub use entities::{Attribute, Character, Foe, Hero, HeroClass};
pub use combat::{Action, Encounter, Outcome, Phase, TurnReport};
pub use items::{Gear, Potion, Reward, RewardOffer};
pub use progression::Allocation;
pub use game::{Campaign, EventSink, GameEvent, Roster, Run, RunOutcome, RunSummary};
