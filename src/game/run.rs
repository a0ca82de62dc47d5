//! Dungeon runs
//!
//! A run is `floor_count` enemy floors followed by one boss floor. The
//! campaign holds what outlives a single run: how deep the dungeon is and
//! how many lives each hero has left.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{Encounter, Outcome};
use crate::data::{GameData, Rules};
use crate::entities::{generate_boss, generate_enemy, Hero};
use crate::error::{IllegalActionError, Result};
use crate::items::{offer_rewards, RewardOffer};
use crate::progression::{xp_reward, LevelUp};
use super::events::{EventSink, GameEvent};

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every floor and the boss beaten
    Cleared,
    Defeated,
    Fled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Cleared => write!(f, "dungeon conquered"),
            RunOutcome::Defeated => write!(f, "defeated"),
            RunOutcome::Fled => write!(f, "fled the dungeon"),
        }
    }
}

/// Where a run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Ready for the next floor
    Ready { next_floor: u32 },
    /// An encounter has been handed out and not yet completed
    InEncounter { floor: u32 },
    Finished(RunOutcome),
}

/// What came out of a completed encounter
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterResolution {
    pub outcome: Outcome,
    pub xp_gained: u32,
    pub level_ups: Vec<LevelUp>,
    /// Offered after a victory
    pub rewards: Option<RewardOffer>,
    pub status: RunStatus,
}

/// One descent into the dungeon
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    hero: String,
    floor_count: u32,
    /// Floors entered so far
    floor: u32,
    /// Ticket of the encounter handed out and not yet completed
    issued: Option<u64>,
    victories: u32,
    outcome: Option<RunOutcome>,
}

impl Run {
    fn new(hero: &str, floor_count: u32) -> Self {
        Self {
            hero: hero.to_string(),
            floor_count,
            floor: 0,
            issued: None,
            victories: 0,
            outcome: None,
        }
    }

    pub fn hero_name(&self) -> &str {
        &self.hero
    }

    /// Regular floors before the boss
    pub fn floor_count(&self) -> u32 {
        self.floor_count
    }

    /// Regular floors plus the boss floor
    pub fn total_floors(&self) -> u32 {
        self.floor_count + 1
    }

    pub fn current_floor(&self) -> u32 {
        self.floor
    }

    pub fn victories(&self) -> u32 {
        self.victories
    }

    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn status(&self) -> RunStatus {
        match self.outcome {
            Some(outcome) => RunStatus::Finished(outcome),
            None if self.issued.is_some() => RunStatus::InEncounter { floor: self.floor },
            None => RunStatus::Ready { next_floor: self.floor + 1 },
        }
    }

    fn check_hero(&self, hero: &Hero) -> Result<()> {
        if hero.name() != self.hero {
            return Err(IllegalActionError::WrongHero {
                expected: self.hero.clone(),
                actual: hero.name().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Generate the foe for the next floor: an enemy on regular floors, the
    /// boss on the last one. Returns `None` once the run is over.
    pub fn next_encounter(
        &mut self,
        hero: &Hero,
        data: &GameData,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<Option<Encounter>> {
        self.check_hero(hero)?;
        if self.is_over() {
            return Ok(None);
        }
        if self.issued.is_some() {
            return Err(IllegalActionError::EncounterUnresolved.into());
        }
        hero.ensure_points_allocated()?;
        if !hero.is_alive() {
            return Err(IllegalActionError::CharacterDead(hero.name().to_string()).into());
        }

        self.floor += 1;
        let boss = self.floor == self.total_floors();
        sink.emit(&GameEvent::FloorEntered {
            floor: self.floor,
            total: self.total_floors(),
            boss,
        });

        let foe = if boss {
            generate_boss(hero.level(), data, rng)
        } else {
            generate_enemy(hero.level(), data, rng)
        };
        log::debug!("Floor {}/{}: {}", self.floor, self.total_floors(), foe.name());
        sink.emit(&GameEvent::EncounterStarted {
            foe: foe.name().to_string(),
            boss,
        });

        let encounter = Encounter::new(foe, &data.rules);
        self.issued = Some(encounter.ticket());
        Ok(Some(encounter))
    }

    /// Settle a resolved encounter. A victory clears the hero's buffs and
    /// effects, awards XP and rolls a reward offer; beating the boss clears
    /// the run. Defeat or flight ends it.
    pub fn complete_encounter(
        &mut self,
        hero: &mut Hero,
        encounter: &Encounter,
        data: &GameData,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<EncounterResolution> {
        self.check_hero(hero)?;
        if self.is_over() {
            return Err(IllegalActionError::RunOver.into());
        }
        match self.issued {
            None => return Err(IllegalActionError::NotAwaitingAction.into()),
            Some(ticket) if ticket != encounter.ticket() => {
                return Err(IllegalActionError::ForeignEncounter.into());
            }
            Some(_) => {}
        }
        let outcome = encounter
            .outcome()
            .ok_or(IllegalActionError::EncounterUnresolved)?;
        self.issued = None;

        let mut resolution = EncounterResolution {
            outcome,
            xp_gained: 0,
            level_ups: Vec::new(),
            rewards: None,
            status: RunStatus::Ready { next_floor: self.floor + 1 },
        };

        match outcome {
            Outcome::HeroVictory => {
                self.victories += 1;
                hero.character.buffs.clear();
                hero.character.effects.clear();

                let xp = xp_reward(encounter.foe().character.level, rng);
                sink.emit(&GameEvent::XpGained { hero: hero.name().to_string(), amount: xp });
                resolution.xp_gained = xp;
                resolution.level_ups = hero.gain_xp(xp as f32);
                for level_up in &resolution.level_ups {
                    sink.emit(&GameEvent::LevelUp {
                        hero: hero.name().to_string(),
                        level: level_up.level,
                        points: level_up.points_granted,
                    });
                }

                let offer = offer_rewards(hero.level(), data, rng);
                sink.emit(&GameEvent::RewardsOffered {
                    rewards: offer.rewards().map(|(_, r)| r.to_string()).collect(),
                });
                resolution.rewards = Some(offer);

                if self.floor >= self.total_floors() {
                    self.outcome = Some(RunOutcome::Cleared);
                }
            }
            Outcome::HeroDefeat => self.outcome = Some(RunOutcome::Defeated),
            // Running from the boss forfeits the dungeon like a defeat
            Outcome::HeroFled if self.floor >= self.total_floors() => {
                self.outcome = Some(RunOutcome::Defeated)
            }
            Outcome::HeroFled => self.outcome = Some(RunOutcome::Fled),
        }

        resolution.status = self.status();
        Ok(resolution)
    }
}

/// Result of concluding a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub floors_cleared: u32,
    pub xp_lost: f32,
    pub lives_remaining: u32,
    /// Floor count the next run will face
    pub next_floor_count: u32,
    /// No lives left; the hero should be removed from the roster
    pub game_over: bool,
}

/// State that spans runs
#[derive(Debug, Clone)]
pub struct Campaign {
    rules: Rules,
    floors: u32,
    lives: HashMap<String, u32>,
}

impl Campaign {
    pub fn new(rules: &Rules) -> Self {
        Self {
            rules: rules.clone(),
            floors: rules.starting_floors,
            lives: HashMap::new(),
        }
    }

    /// Regular floors the next run will have
    pub fn floor_count(&self) -> u32 {
        self.floors
    }

    pub fn lives_remaining(&self, hero: &str) -> u32 {
        self.lives.get(hero).copied().unwrap_or(self.rules.starting_lives)
    }

    /// Drop a hero's life record, e.g. after removing them from the roster
    pub fn forget_hero(&mut self, hero: &str) {
        self.lives.remove(hero);
    }

    /// Begin a run: full health and chaos, no buffs or effects
    pub fn start_run(&mut self, hero: &mut Hero, sink: &mut dyn EventSink) -> Result<Run> {
        let lives = self.lives_remaining(hero.name());
        if lives == 0 {
            return Err(IllegalActionError::NoLivesRemaining(hero.name().to_string()).into());
        }
        hero.ensure_points_allocated()?;

        hero.character.reset_battle_state();
        log::info!("{} starts a run: {} floors + boss", hero.name(), self.floors);
        sink.emit(&GameEvent::RunStarted {
            hero: hero.name().to_string(),
            floors: self.floors,
            lives,
        });
        Ok(Run::new(hero.name(), self.floors))
    }

    /// Apply the run's consequences: a clear deepens the dungeon, a defeat
    /// costs a life and most of the hero's XP, a flight costs less XP.
    pub fn conclude(&mut self, run: Run, hero: &mut Hero, sink: &mut dyn EventSink) -> Result<RunSummary> {
        run.check_hero(hero)?;
        let outcome = run.outcome.ok_or(IllegalActionError::RunInProgress)?;
        let name = hero.name().to_string();
        sink.emit(&GameEvent::RunEnded { hero: name.clone(), outcome });

        let mut xp_lost = 0.0;
        match outcome {
            RunOutcome::Cleared => {
                self.floors += self.rules.floors_per_clear;
                sink.emit(&GameEvent::DungeonDeepened { floors: self.floors });
            }
            RunOutcome::Defeated => {
                let remaining = self.lives_remaining(&name).saturating_sub(1);
                self.lives.insert(name.clone(), remaining);
                sink.emit(&GameEvent::LifeLost { hero: name.clone(), remaining });
                xp_lost = hero.lose_xp_fraction(self.rules.death_xp_penalty);
            }
            RunOutcome::Fled => {
                xp_lost = hero.lose_xp_fraction(self.rules.flee_xp_penalty());
            }
        }
        if xp_lost > 0.0 {
            sink.emit(&GameEvent::XpLost { hero: name.clone(), amount: xp_lost });
        }

        let lives_remaining = self.lives_remaining(&name);
        let game_over = lives_remaining == 0;
        if game_over {
            sink.emit(&GameEvent::GameOver { hero: name.clone() });
        }
        log::info!("{}'s run ended: {} ({} lives left)", name, outcome, lives_remaining);

        Ok(RunSummary {
            outcome,
            floors_cleared: run.victories,
            xp_lost,
            lives_remaining,
            next_floor_count: self.floors,
            game_over,
        })
    }
}
