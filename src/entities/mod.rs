//! Characters: the shared model, heroes and generated foes

pub mod character;
pub mod hero;
pub mod foes;

pub use character::{Attribute, BaseStats, Character};
pub use hero::{Hero, HeroClass};
pub use foes::{Foe, FoeKind, FoeScaling, generate_boss, generate_enemy};
