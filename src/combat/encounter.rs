//! Encounter flow
//!
//! A battle between a hero and one foe, driven as a phase machine. `advance`
//! runs the automatic phases (effect ticks, the foe's attack) until the hero
//! must decide; `submit` performs the hero's action and advances again.
//!
//! Round order: hero effects tick, hero acts (unless frozen), foe effects
//! tick, foe attacks (unless frozen). Deaths are checked after every step, so
//! a character killed by poison never acts in that slot.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::Rules;
use crate::entities::{Character, Foe, Hero};
use crate::error::{IllegalActionError, Result, ValidationError};
use crate::game::events::{EventSink, GameEvent};
use crate::items::{Potion, PotionKind};
use super::abilities::EffectOutcome;
use super::damage::{basic_attack, flee_chance, roll_percent};
use super::status::StatusTickResult;

/// How an encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    HeroVictory,
    HeroDefeat,
    HeroFled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::HeroVictory => write!(f, "Victory!"),
            Outcome::HeroDefeat => write!(f, "Defeat..."),
            Outcome::HeroFled => write!(f, "Escaped"),
        }
    }
}

/// Where the encounter currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    HeroEffectTick,
    /// Waiting for the hero's decision
    HeroAction,
    EnemyEffectTick,
    EnemyAction,
    Resolved(Outcome),
}

/// A hero decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Attack,
    /// Index into the hero's abilities
    Ability(usize),
    /// Index into the potion belt
    Potion(usize),
    Flee,
}

/// Events produced by one call, plus the outcome once resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    pub events: Vec<GameEvent>,
    pub outcome: Option<Outcome>,
}

/// Sends events to the caller's sink and keeps a copy for the report
struct Narrator<'a> {
    sink: &'a mut dyn EventSink,
    events: Vec<GameEvent>,
}

impl<'a> Narrator<'a> {
    fn new(sink: &'a mut dyn EventSink) -> Self {
        Self { sink, events: Vec::new() }
    }

    fn emit(&mut self, event: GameEvent) {
        self.sink.emit(&event);
        self.events.push(event);
    }

    fn tick(&mut self, name: &str, result: &StatusTickResult) {
        if let Some(damage) = result.poison_damage {
            self.emit(GameEvent::PoisonDamage { target: name.to_string(), damage });
        }
        for &attribute in &result.expired_buffs {
            self.emit(GameEvent::BuffExpired { target: name.to_string(), attribute });
        }
        for &effect in &result.expired_effects {
            self.emit(GameEvent::EffectExpired { target: name.to_string(), effect });
        }
    }

    fn finish(self, outcome: Option<Outcome>) -> TurnReport {
        TurnReport { events: self.events, outcome }
    }
}

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// One battle against one foe
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    foe: Foe,
    phase: Phase,
    round: u32,
    flee_break_chance: f64,
    /// Unique per constructed encounter, so a run can recognise its own
    ticket: u64,
}

impl Encounter {
    pub fn new(foe: Foe, rules: &Rules) -> Self {
        Self {
            foe,
            phase: Phase::HeroEffectTick,
            round: 0,
            flee_break_chance: rules.flee_break_chance.clamp(0.0, 1.0),
            ticket: NEXT_TICKET.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    pub(crate) fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn foe(&self) -> &Foe {
        &self.foe
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome().is_some()
    }

    /// Run automatic phases until the hero must act or the encounter ends
    pub fn advance(&mut self, hero: &mut Hero, rng: &mut impl Rng, sink: &mut dyn EventSink) -> TurnReport {
        let mut narrator = Narrator::new(sink);
        self.run_automatic(hero, rng, &mut narrator);
        narrator.finish(self.outcome())
    }

    /// Perform the hero's action, then advance to the next decision.
    ///
    /// Validation failures (unknown ability or potion, not enough chaos)
    /// leave the encounter untouched so the caller can choose again.
    pub fn submit(
        &mut self,
        hero: &mut Hero,
        action: Action,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<TurnReport> {
        match self.phase {
            Phase::Resolved(_) => return Err(IllegalActionError::EncounterResolved.into()),
            _ if !hero.is_alive() => {
                return Err(IllegalActionError::CharacterDead(hero.name().to_string()).into())
            }
            Phase::HeroAction => {}
            _ => return Err(IllegalActionError::NotAwaitingAction.into()),
        }

        let mut narrator = Narrator::new(sink);
        match action {
            Action::Attack => {
                let result = basic_attack(&hero.character, &mut self.foe.character, rng);
                narrator.emit(GameEvent::Attack {
                    attacker: hero.name().to_string(),
                    target: self.foe.name().to_string(),
                    result,
                });
            }
            Action::Ability(index) => {
                let ability = hero
                    .abilities()
                    .get(index)
                    .ok_or(ValidationError::NoSuchAbility(index))?;
                let proficiency = hero.proficiency();
                let cast = ability.cast(&mut hero.character, proficiency, &mut self.foe.character, rng)?;
                narrator.emit(GameEvent::AbilityCast {
                    caster: hero.name().to_string(),
                    ability: ability.name.to_string(),
                    target: self.foe.name().to_string(),
                    damage: cast.damage,
                });
                match cast.effect {
                    Some(EffectOutcome::Inflicted(status)) => narrator.emit(GameEvent::EffectApplied {
                        target: self.foe.name().to_string(),
                        effect: status.kind(),
                        duration: ability.effect.map(|e| e.duration).unwrap_or(0),
                    }),
                    Some(EffectOutcome::Buffed { attribute, magnitude, duration }) => {
                        narrator.emit(GameEvent::Buffed {
                            target: hero.name().to_string(),
                            attribute,
                            magnitude,
                            duration,
                        })
                    }
                    Some(EffectOutcome::Resisted) => narrator.emit(GameEvent::EffectResisted {
                        target: self.foe.name().to_string(),
                        ability: ability.name.to_string(),
                    }),
                    None => {}
                }
            }
            Action::Potion(index) => {
                let potion = hero.potions.take(index).ok_or(ValidationError::NoSuchPotion(index))?;
                let amount = drink(&mut hero.character, &potion);
                narrator.emit(GameEvent::PotionDrunk {
                    hero: hero.name().to_string(),
                    potion: potion.name,
                    kind: potion.kind,
                    amount,
                });
            }
            Action::Flee => {
                let chance = flee_chance(hero.character.agility(), self.foe.character.agility());
                if roll_percent(chance, rng) {
                    narrator.emit(GameEvent::FleeSucceeded { hero: hero.name().to_string() });
                    self.resolve(Outcome::HeroFled, &mut narrator);
                    return Ok(narrator.finish(self.outcome()));
                }

                narrator.emit(GameEvent::FleeFailed { hero: hero.name().to_string() });
                if rng.gen_bool(self.flee_break_chance) {
                    if let Some(broken) = hero.character.destroy_random_gear(rng) {
                        narrator.emit(GameEvent::GearBroken {
                            hero: hero.name().to_string(),
                            item: broken.name,
                        });
                    }
                }
            }
        }

        if !self.foe.character.is_alive() {
            narrator.emit(GameEvent::Died { name: self.foe.name().to_string() });
            self.resolve(Outcome::HeroVictory, &mut narrator);
        } else {
            self.phase = Phase::EnemyEffectTick;
            self.run_automatic(hero, rng, &mut narrator);
        }
        Ok(narrator.finish(self.outcome()))
    }

    fn run_automatic(&mut self, hero: &mut Hero, rng: &mut impl Rng, narrator: &mut Narrator<'_>) {
        loop {
            match self.phase {
                Phase::HeroAction | Phase::Resolved(_) => return,
                Phase::HeroEffectTick => {
                    self.round += 1;
                    narrator.emit(GameEvent::RoundStarted { round: self.round });
                    let tick = hero.character.tick_effects();
                    narrator.tick(hero.name(), &tick);
                    if tick.died || !hero.is_alive() {
                        narrator.emit(GameEvent::Died { name: hero.name().to_string() });
                        self.resolve(Outcome::HeroDefeat, narrator);
                    } else if hero.character.is_frozen() {
                        narrator.emit(GameEvent::TurnSkipped { name: hero.name().to_string() });
                        self.phase = Phase::EnemyEffectTick;
                    } else {
                        self.phase = Phase::HeroAction;
                    }
                }
                Phase::EnemyEffectTick => {
                    let foe = &mut self.foe.character;
                    let tick = foe.tick_effects();
                    narrator.tick(&foe.name, &tick);
                    if tick.died || !foe.is_alive() {
                        narrator.emit(GameEvent::Died { name: foe.name.clone() });
                        self.resolve(Outcome::HeroVictory, narrator);
                    } else if foe.is_frozen() {
                        narrator.emit(GameEvent::TurnSkipped { name: foe.name.clone() });
                        self.phase = Phase::HeroEffectTick;
                    } else {
                        self.phase = Phase::EnemyAction;
                    }
                }
                Phase::EnemyAction => {
                    let result = basic_attack(&self.foe.character, &mut hero.character, rng);
                    narrator.emit(GameEvent::Attack {
                        attacker: self.foe.name().to_string(),
                        target: hero.name().to_string(),
                        result,
                    });
                    if hero.is_alive() {
                        self.phase = Phase::HeroEffectTick;
                    } else {
                        narrator.emit(GameEvent::Died { name: hero.name().to_string() });
                        self.resolve(Outcome::HeroDefeat, narrator);
                    }
                }
            }
        }
    }

    fn resolve(&mut self, outcome: Outcome, narrator: &mut Narrator<'_>) {
        log::debug!("Encounter with {} resolved after {} rounds: {:?}", self.foe.name(), self.round, outcome);
        self.phase = Phase::Resolved(outcome);
        narrator.emit(GameEvent::EncounterEnded { outcome });
    }
}

/// Apply a potion, returning the amount restored or the buff magnitude
fn drink(character: &mut Character, potion: &Potion) -> f32 {
    match potion.kind {
        PotionKind::Heal => character.heal(potion.potency),
        PotionKind::RestoreResource => character.restore_resource(potion.potency),
        PotionKind::Buff(attribute) => {
            character.buffs.apply(attribute, potion.potency, potion.duration);
            potion.potency
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::status::StatusEffect;
    use crate::combat::AttackResult;
    use crate::data::FoeTemplate;
    use crate::entities::{Attribute, BaseStats, FoeKind, HeroClass};
    use crate::error::GameError;
    use crate::game::events::NullSink;
    use crate::items::{EquipSlot, Gear, Rarity, StatBonus};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn foe(stats: BaseStats) -> Foe {
        Foe::from_template(&FoeTemplate::new("Dummy", stats), FoeKind::Enemy, 1)
    }

    fn feral() -> Hero {
        Hero::new("Bram", HeroClass::Feral, 5)
    }

    fn gear(slot: EquipSlot) -> Gear {
        Gear {
            name: format!("Old {}", slot.name()),
            rarity: Rarity::Common,
            slot,
            bonus: StatBonus { defense: 1.0, ..Default::default() },
        }
    }

    fn potion(kind: PotionKind, potency: f32, duration: u32) -> Potion {
        Potion { name: "Test Potion".to_string(), rarity: Rarity::Common, kind, potency, duration }
    }

    fn started(hero: &mut Hero, foe: Foe, rules: &Rules, rng: &mut StdRng) -> Encounter {
        let mut encounter = Encounter::new(foe, rules);
        encounter.advance(hero, rng, &mut NullSink);
        encounter
    }

    #[test]
    fn test_guaranteed_hit_deals_twelve() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hero = feral();
        // Agility gap of 10 in the hero's favour pushes hit chance to 100%
        let mut encounter = started(&mut hero, foe(BaseStats::new(100.0, 1.0, 10.0, 0.0, 0.0)), &Rules::default(), &mut rng);
        assert_eq!(encounter.phase(), Phase::HeroAction);

        let report = encounter.submit(&mut hero, Action::Attack, &mut rng, &mut NullSink).unwrap();
        assert_eq!(encounter.foe().character.health(), 88.0);
        assert!(report.events.contains(&GameEvent::Attack {
            attacker: "Bram".to_string(),
            target: "Dummy (L1)".to_string(),
            result: AttackResult::Hit { damage: 12.0 },
        }));
        assert_eq!(encounter.phase(), Phase::HeroAction);
        assert_eq!(encounter.round(), 2);
    }

    #[test]
    fn test_lethal_poison_ends_encounter_before_hero_acts() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut hero = feral();
        hero.character.take_damage(hero.character.max_health() - 3.0);
        hero.character.effects.apply(StatusEffect::poison(5.0, 3));

        let mut encounter = Encounter::new(foe(BaseStats::new(50.0, 10.0, 5.0, 5.0, 0.0)), &Rules::default());
        let mut events = Vec::new();
        let report = encounter.advance(&mut hero, &mut rng, &mut events);

        assert_eq!(report.outcome, Some(Outcome::HeroDefeat));
        assert_eq!(encounter.phase(), Phase::Resolved(Outcome::HeroDefeat));
        assert_eq!(hero.character.health(), 0.0);
        assert!(!report.events.iter().any(|e| matches!(e, GameEvent::Attack { .. })));
        assert_eq!(events, report.events);

        let err = encounter.submit(&mut hero, Action::Attack, &mut rng, &mut NullSink).unwrap_err();
        assert_eq!(err, GameError::IllegalAction(IllegalActionError::EncounterResolved));
    }

    #[test]
    fn test_successful_flee_skips_foe_action_and_break_check() {
        let mut rng = StdRng::seed_from_u64(3);
        let rules = Rules { flee_break_chance: 1.0, ..Rules::default() };
        let mut escapes = 0;

        for _ in 0..50 {
            let mut hero = feral();
            hero.character.equip(gear(EquipSlot::Helmet));
            hero.character.base.agility = 100.0;
            let mut encounter = started(&mut hero, foe(BaseStats::new(50.0, 30.0, 5.0, 5.0, 0.0)), &rules, &mut rng);
            let health = hero.character.health();

            let report = encounter.submit(&mut hero, Action::Flee, &mut rng, &mut NullSink).unwrap();
            if report.outcome == Some(Outcome::HeroFled) {
                escapes += 1;
                assert_eq!(hero.character.health(), health);
                assert_eq!(hero.character.equipment().count(), 1);
                assert!(!report.events.iter().any(|e| matches!(
                    e,
                    GameEvent::Attack { .. } | GameEvent::GearBroken { .. }
                )));
            }
        }
        assert!(escapes > 30);
    }

    #[test]
    fn test_failed_flee_consumes_turn_and_may_break_gear() {
        let mut rng = StdRng::seed_from_u64(4);
        let rules = Rules { flee_break_chance: 1.0, ..Rules::default() };

        loop {
            let mut hero = feral();
            hero.character.equip(gear(EquipSlot::Boots));
            hero.character.equip(gear(EquipSlot::Armor));
            hero.character.base.agility = 0.0;
            let mut encounter = started(&mut hero, foe(BaseStats::new(500.0, 1.0, 5.0, 100.0, 0.0)), &rules, &mut rng);

            let report = encounter.submit(&mut hero, Action::Flee, &mut rng, &mut NullSink).unwrap();
            if report.outcome.is_some() {
                continue;
            }
            assert_eq!(hero.character.equipment().count(), 1);
            assert!(report.events.iter().any(|e| matches!(e, GameEvent::GearBroken { .. })));
            // The foe still attacked this round
            assert!(report.events.iter().any(|e| matches!(e, GameEvent::Attack { attacker, .. } if attacker == "Dummy (L1)")));
            assert_eq!(encounter.phase(), Phase::HeroAction);
            break;
        }
    }

    #[test]
    fn test_insufficient_resource_does_not_consume_turn() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut hero = feral();
        let resource = hero.character.resource();
        hero.character.spend_resource(resource - 2.0);
        let mut encounter = started(&mut hero, foe(BaseStats::new(50.0, 10.0, 5.0, 5.0, 0.0)), &Rules::default(), &mut rng);

        let err = encounter.submit(&mut hero, Action::Ability(0), &mut rng, &mut NullSink).unwrap_err();
        assert!(matches!(err, GameError::Validation(ValidationError::InsufficientResource { .. })));
        assert_eq!(encounter.phase(), Phase::HeroAction);
        assert_eq!(encounter.round(), 1);
        assert_eq!(hero.character.resource(), 2.0);
        assert_eq!(encounter.foe().character.health(), 50.0);

        let err = encounter.submit(&mut hero, Action::Ability(7), &mut rng, &mut NullSink).unwrap_err();
        assert_eq!(err, GameError::Validation(ValidationError::NoSuchAbility(7)));
        let err = encounter.submit(&mut hero, Action::Potion(0), &mut rng, &mut NullSink).unwrap_err();
        assert_eq!(err, GameError::Validation(ValidationError::NoSuchPotion(0)));
        assert_eq!(encounter.round(), 1);
    }

    #[test]
    fn test_submit_outside_decision_point() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut hero = feral();
        let mut encounter = Encounter::new(foe(BaseStats::new(50.0, 10.0, 5.0, 5.0, 0.0)), &Rules::default());
        let err = encounter.submit(&mut hero, Action::Attack, &mut rng, &mut NullSink).unwrap_err();
        assert_eq!(err, GameError::IllegalAction(IllegalActionError::NotAwaitingAction));
    }

    #[test]
    fn test_frozen_foe_skips_its_action() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut hero = feral();
        let mut dummy = foe(BaseStats::new(500.0, 50.0, 5.0, 5.0, 0.0));
        dummy.character.effects.apply(StatusEffect::frozen(2));
        let mut encounter = started(&mut hero, dummy, &Rules::default(), &mut rng);
        let health = hero.character.health();

        for _ in 0..2 {
            let report = encounter.submit(&mut hero, Action::Attack, &mut rng, &mut NullSink).unwrap();
            assert!(report.events.iter().any(|e| matches!(e, GameEvent::TurnSkipped { .. })));
            assert_eq!(hero.character.health(), health);
        }

        // Thaws on the third tick and attacks again
        let report = encounter.submit(&mut hero, Action::Attack, &mut rng, &mut NullSink).unwrap();
        assert!(report.events.iter().any(|e| matches!(e, GameEvent::EffectExpired { .. })));
        assert!(report.events.iter().any(|e| matches!(e, GameEvent::Attack { attacker, .. } if attacker == "Dummy (L1)")));
    }

    #[test]
    fn test_potion_consumes_turn() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut hero = feral();
        hero.character.take_damage(10.0);
        hero.potions.add(potion(PotionKind::Heal, 50.0, 0)).unwrap();
        hero.potions.add(potion(PotionKind::Buff(Attribute::Defense), 5.0, 3)).unwrap();
        let mut encounter = started(&mut hero, foe(BaseStats::new(50.0, 1.0, 5.0, 5.0, 0.0)), &Rules::default(), &mut rng);

        let report = encounter.submit(&mut hero, Action::Potion(0), &mut rng, &mut NullSink).unwrap();
        assert!(report.events.contains(&GameEvent::PotionDrunk {
            hero: "Bram".to_string(),
            potion: "Test Potion".to_string(),
            kind: PotionKind::Heal,
            amount: 10.0,
        }));
        assert_eq!(hero.potions.len(), 1);
        assert_eq!(encounter.round(), 2);

        encounter.submit(&mut hero, Action::Potion(0), &mut rng, &mut NullSink).unwrap();
        assert!(hero.potions.is_empty());
        assert_eq!(hero.character.defense(), 15.0);
    }

    #[test]
    fn test_victory_on_kill() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut hero = feral();
        let mut encounter = started(&mut hero, foe(BaseStats::new(5.0, 1.0, 0.0, 0.0, 0.0)), &Rules::default(), &mut rng);
        let report = encounter.submit(&mut hero, Action::Ability(0), &mut rng, &mut NullSink).unwrap();
        assert_eq!(report.outcome, Some(Outcome::HeroVictory));
        assert!(encounter.is_resolved());
        assert!(!encounter.foe().character.is_alive());
    }

    #[test]
    fn test_vitals_stay_clamped_through_auto_play() {
        let mut rng = StdRng::seed_from_u64(10);
        for class in HeroClass::ALL {
            let mut hero = Hero::new("Auto", class, 5);
            hero.potions.add(potion(PotionKind::Heal, 500.0, 0)).unwrap();
            hero.potions.add(potion(PotionKind::RestoreResource, 500.0, 0)).unwrap();
            let mut encounter = started(&mut hero, foe(BaseStats::new(120.0, 14.0, 8.0, 10.0, 0.0)), &Rules::default(), &mut rng);

            let mut turn = 0;
            while !encounter.is_resolved() {
                let action = match turn % 4 {
                    0 => Action::Attack,
                    1 => Action::Ability(turn % 2),
                    2 if !hero.potions.is_empty() => Action::Potion(0),
                    _ => Action::Ability(1),
                };
                turn += 1;
                if encounter.submit(&mut hero, action, &mut rng, &mut NullSink).is_err() {
                    encounter.submit(&mut hero, Action::Attack, &mut rng, &mut NullSink).unwrap();
                }
                for c in [&hero.character, &encounter.foe().character] {
                    assert!(c.health() >= 0.0 && c.health() <= c.max_health());
                    assert!(c.resource() >= 0.0 && c.resource() <= c.max_resource());
                }
            }
        }
    }
}
