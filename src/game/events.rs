//! Game events and observers
//!
//! Every engine operation that narrates takes a `&mut dyn EventSink`. Front-ends
//! pick a sink: collect into a `Vec`, forward to the logger, stream JSON lines,
//! or wrap a closure.

use std::fmt;
use std::io::Write;

use serde::Serialize;

use crate::combat::{AttackResult, Outcome, StatusKind};
use crate::entities::Attribute;
use crate::items::PotionKind;
use super::run::RunOutcome;

/// Something that happened, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    RunStarted { hero: String, floors: u32, lives: u32 },
    FloorEntered { floor: u32, total: u32, boss: bool },
    EncounterStarted { foe: String, boss: bool },
    RoundStarted { round: u32 },

    // Combat
    PoisonDamage { target: String, damage: f32 },
    BuffExpired { target: String, attribute: Attribute },
    EffectExpired { target: String, effect: StatusKind },
    TurnSkipped { name: String },
    Attack { attacker: String, target: String, result: AttackResult },
    AbilityCast { caster: String, ability: String, target: String, damage: f32 },
    EffectApplied { target: String, effect: StatusKind, duration: u32 },
    EffectResisted { target: String, ability: String },
    Buffed { target: String, attribute: Attribute, magnitude: f32, duration: u32 },
    PotionDrunk { hero: String, potion: String, kind: PotionKind, amount: f32 },
    FleeSucceeded { hero: String },
    FleeFailed { hero: String },
    GearBroken { hero: String, item: String },
    Died { name: String },
    EncounterEnded { outcome: Outcome },

    // Progression
    XpGained { hero: String, amount: u32 },
    LevelUp { hero: String, level: u32, points: u32 },
    XpLost { hero: String, amount: f32 },

    // Rewards
    RewardsOffered { rewards: Vec<String> },
    GearEquipped { hero: String, item: String, replaced: Option<String> },
    PotionStored { hero: String, potion: String },
    PotionDiscarded { hero: String, potion: String },
    RewardsDeclined { hero: String },

    // Run bookkeeping
    LifeLost { hero: String, remaining: u32 },
    RunEnded { hero: String, outcome: RunOutcome },
    DungeonDeepened { floors: u32 },
    GameOver { hero: String },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GameEvent::*;
        match self {
            RunStarted { hero, floors, lives } => write!(
                f,
                "{} enters the dungeon: {} floors and a boss ({} lives left)",
                hero, floors, lives
            ),
            FloorEntered { floor, total, boss: true } => {
                write!(f, "Floor {}/{}: the boss awaits", floor, total)
            }
            FloorEntered { floor, total, boss: false } => write!(f, "Floor {}/{}", floor, total),
            EncounterStarted { foe, boss: true } => write!(f, "BOSS: {} appears!", foe),
            EncounterStarted { foe, boss: false } => write!(f, "A wild {} appears!", foe),
            RoundStarted { round } => write!(f, "--- Round {} ---", round),
            PoisonDamage { target, damage } => {
                write!(f, "{} takes {:.1} poison damage", target, damage)
            }
            BuffExpired { target, attribute } => {
                write!(f, "{}'s {} buff wears off", target, attribute.name())
            }
            EffectExpired { target, effect } => {
                write!(f, "{} is no longer {}", target, effect.name())
            }
            TurnSkipped { name } => write!(f, "{} is frozen and cannot act", name),
            Attack { attacker, target, result: AttackResult::Hit { damage } } => {
                write!(f, "{} hits {} for {:.1} damage", attacker, target, damage)
            }
            Attack { attacker, target, result: AttackResult::Missed } => {
                write!(f, "{} attacks {} but misses", attacker, target)
            }
            AbilityCast { caster, ability, target, damage } if *damage > 0.0 => write!(
                f,
                "{} uses {} on {} for {:.1} damage",
                caster, ability, target, damage
            ),
            AbilityCast { caster, ability, .. } => write!(f, "{} uses {}", caster, ability),
            EffectApplied { target, effect, duration } => {
                write!(f, "{} is {} for {} turns", target, effect.name(), duration)
            }
            EffectResisted { target, ability } => write!(f, "{} resists {}", target, ability),
            Buffed { target, attribute, magnitude, duration } => write!(
                f,
                "{} gains +{:.1} {} for {} turns",
                target,
                magnitude,
                attribute.abbrev(),
                duration
            ),
            PotionDrunk { hero, potion, kind, amount } => match kind {
                PotionKind::Heal => write!(f, "{} drinks {} and heals {:.1} HP", hero, potion, amount),
                PotionKind::RestoreResource => {
                    write!(f, "{} drinks {} and restores {:.1} chaos", hero, potion, amount)
                }
                PotionKind::Buff(attribute) => write!(
                    f,
                    "{} drinks {} (+{:.1} {})",
                    hero,
                    potion,
                    amount,
                    attribute.abbrev()
                ),
            },
            FleeSucceeded { hero } => write!(f, "{} escapes!", hero),
            FleeFailed { hero } => write!(f, "{} fails to escape", hero),
            GearBroken { hero, item } => write!(f, "{}'s {} breaks in the scramble!", hero, item),
            Died { name } => write!(f, "{} has fallen", name),
            EncounterEnded { outcome } => write!(f, "{}", outcome),
            XpGained { hero, amount } => write!(f, "{} gains {} XP", hero, amount),
            LevelUp { hero, level, points } => write!(
                f,
                "{} reached level {}! {} attribute points to spend",
                hero, level, points
            ),
            XpLost { hero, amount } => write!(f, "{} loses {:.1} XP", hero, amount),
            RewardsOffered { rewards } => write!(f, "Rewards: {}", rewards.join(" | ")),
            GearEquipped { hero, item, replaced: Some(old) } => {
                write!(f, "{} equips {}, discarding {}", hero, item, old)
            }
            GearEquipped { hero, item, replaced: None } => write!(f, "{} equips {}", hero, item),
            PotionStored { hero, potion } => write!(f, "{} stores {}", hero, potion),
            PotionDiscarded { hero, potion } => {
                write!(f, "{}'s belt is full; {} is lost", hero, potion)
            }
            RewardsDeclined { hero } => write!(f, "{} leaves the rewards behind", hero),
            LifeLost { hero, remaining } => write!(f, "{} loses a life ({} left)", hero, remaining),
            RunEnded { hero, outcome } => write!(f, "{}'s run is over: {}", hero, outcome),
            DungeonDeepened { floors } => write!(f, "The dungeon grows deeper: {} floors", floors),
            GameOver { hero } => write!(f, "{} has no lives left. Game over.", hero),
        }
    }
}

/// Observer for game events
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

/// Collects every event
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

/// Drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Forwards events to `log::info!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &GameEvent) {
        log::info!("{}", event);
    }
}

/// Writes one JSON object per event
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &GameEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(e) = written {
            log::warn!("Failed to write event: {}", e);
        }
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F: FnMut(&GameEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: &GameEvent) {
        (self.0)(event)
    }
}

/// Sends every event to both sinks
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &GameEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
