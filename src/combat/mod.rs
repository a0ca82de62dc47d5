//! Combat system

pub mod damage;
pub mod abilities;
pub mod status;
pub mod encounter;

pub use damage::{basic_attack, flee_chance, hit_chance, magical_damage, physical_damage, AttackResult};
pub use abilities::{Ability, AbilityEffect, CastResult, EffectKind, EffectOutcome};
pub use status::{ActiveBuffs, Buff, StatusEffect, StatusEffects, StatusKind, StatusTickResult};
pub use encounter::{Action, Encounter, Outcome, Phase, TurnReport};
