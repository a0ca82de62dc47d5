//! Chaosdelve - Entry Point
//!
//! A plain console front-end: menus on stdin/stdout, narration through an
//! event sink, logs to a file.

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use chaosdelve::combat::{Action, Encounter};
use chaosdelve::data::export_default_data;
use chaosdelve::entities::{Attribute, Hero, HeroClass};
use chaosdelve::game::{Campaign, EventSink, FnSink, GameEvent, JsonLinesSink, LogSink, Roster, RunSummary};
use chaosdelve::items::RewardOffer;
use chaosdelve::progression::{level_title, Allocation};
use chaosdelve::GameData;

const LOG_FILE: &str = "chaosdelve.log";

#[derive(Parser, Debug)]
#[command(name = "chaosdelve")]
#[command(version, about = "Chaosdelve - a turn-based dungeon crawler", long_about = None)]
struct Args {
    /// Load rules and tables from RON files in DIR
    #[arg(long = "data", value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Write the built-in data files to DIR and exit
    #[arg(long = "export-data", value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Seed the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Stream game events as JSON lines on stderr
    #[arg(long)]
    json: bool,
}

/// Stdin reached end of file
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    log::info!("Starting Chaosdelve v{}", env!("CARGO_PKG_VERSION"));

    if let Some(dir) = &args.export_dir {
        export_default_data(dir)?;
        println!("Default data written to {}", dir.display());
        return Ok(());
    }

    let data = match &args.data_dir {
        Some(dir) => GameData::load_from_dir(dir),
        None => GameData::default(),
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    // Narration goes to the log file as well as the player
    let sink: Box<dyn EventSink> = if args.json {
        Box::new((LogSink, JsonLinesSink::new(io::stderr())))
    } else {
        Box::new((LogSink, FnSink(|event: &GameEvent| println!("  {}", event))))
    };

    let mut session = Session {
        campaign: Campaign::new(&data.rules),
        data,
        rng,
        sink,
        input: Input::new(),
    };
    let mut roster = Roster::new();

    let result = session.main_menu(&mut roster);
    match result {
        Err(e) if e.downcast_ref::<InputClosed>().is_some() => {}
        Err(e) => {
            log::error!("Game exited with error: {}", e);
            return Err(e);
        }
        Ok(()) => {}
    }

    log::info!("Chaosdelve shut down cleanly");
    Ok(())
}

/// Log to a file so the console stays readable
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match OpenOptions::new().create(true).write(true).truncate(true).open(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

/// Line-oriented stdin reader
struct Input {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl Input {
    fn new() -> Self {
        Self { lines: io::stdin().lock().lines() }
    }

    fn line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        io::stdout().flush()?;
        match self.lines.next() {
            Some(line) => Ok(line?.trim().to_string()),
            None => Err(InputClosed.into()),
        }
    }

    /// Ask until the answer is a number in `0..=max`
    fn number(&mut self, prompt: &str, max: usize) -> Result<usize> {
        loop {
            match self.line(prompt)?.parse::<usize>() {
                Ok(n) if n <= max => return Ok(n),
                _ => println!("Please enter a number from 0 to {}.", max),
            }
        }
    }
}

struct Session {
    data: GameData,
    campaign: Campaign,
    rng: StdRng,
    sink: Box<dyn EventSink>,
    input: Input,
}

impl Session {
    fn main_menu(&mut self, roster: &mut Roster) -> Result<()> {
        let mut selected: Option<String> = None;
        loop {
            println!("\n====== CHAOSDELVE ======");
            println!("Dungeon depth: {} floors + boss", self.campaign.floor_count());
            if let Some(hero) = selected.as_deref().and_then(|name| roster.get(name)) {
                println!(
                    "Active hero: {} the {} (level {}, {} lives)",
                    hero.name(),
                    hero.class(),
                    hero.level(),
                    self.campaign.lives_remaining(hero.name())
                );
            }
            println!("1. Create hero\n2. Select hero\n3. Enter the dungeon\n4. Hero status\n0. Quit");

            match self.input.number("> ", 4)? {
                1 => {
                    if let Some(name) = self.create_hero(roster)? {
                        selected = Some(name);
                    }
                }
                2 => {
                    if let Some(name) = self.select_hero(roster)? {
                        selected = Some(name);
                    }
                }
                3 => match selected.clone() {
                    Some(name) => {
                        let summary = match roster.get_mut(&name) {
                            Some(hero) => self.play_run(hero)?,
                            None => continue,
                        };
                        if let Some(summary) = summary {
                            if summary.game_over {
                                roster.remove(&name);
                                self.campaign.forget_hero(&name);
                                selected = None;
                            }
                        }
                    }
                    None => println!("Create or select a hero first."),
                },
                4 => match selected.as_deref().and_then(|name| roster.get(name)) {
                    Some(hero) => self.print_status(hero),
                    None => println!("No hero selected."),
                },
                _ => return Ok(()),
            }
        }
    }

    fn create_hero(&mut self, roster: &mut Roster) -> Result<Option<String>> {
        let name = self.input.line("Hero name: ")?;
        for (i, class) in HeroClass::ALL.iter().enumerate() {
            println!("{}. {} - {}", i + 1, class, class.description());
        }
        let choice = self.input.number("Class (0 to cancel): ", HeroClass::ALL.len())?;
        let Some(class) = choice.checked_sub(1).and_then(|i| HeroClass::ALL.get(i).copied()) else {
            return Ok(None);
        };

        match roster.create_hero(&name, class, &self.data.rules) {
            Ok(hero) => {
                self.allocate_points(hero)?;
                self.print_status(hero);
                Ok(Some(hero.name().to_string()))
            }
            Err(e) => {
                println!("{}", e);
                Ok(None)
            }
        }
    }

    fn select_hero(&mut self, roster: &Roster) -> Result<Option<String>> {
        let names: Vec<&str> = roster.names().collect();
        if names.is_empty() {
            println!("No heroes yet.");
            return Ok(None);
        }
        for (i, name) in names.iter().enumerate() {
            println!("{}. {}", i + 1, name);
        }
        let choice = self.input.number("Hero (0 to cancel): ", names.len())?;
        Ok(choice.checked_sub(1).map(|i| names[i].to_string()))
    }

    fn allocate_points(&mut self, hero: &mut Hero) -> Result<()> {
        while hero.unspent_points() > 0 {
            println!(
                "\n{} points to spend. STR {:.1} | DEF {:.1} | AGI {:.1}",
                hero.unspent_points(),
                hero.character.base.strength,
                hero.character.base.defense,
                hero.character.base.agility
            );
            for (i, attribute) in Attribute::ALL.iter().enumerate() {
                println!("{}. {}", i + 1, attribute.name());
            }
            let choice = self.input.number("Attribute: ", Attribute::ALL.len())?;
            let Some(attribute) = choice.checked_sub(1).and_then(|i| Attribute::ALL.get(i).copied()) else {
                continue;
            };
            let points = self.input.number("Points: ", hero.unspent_points() as usize)?;
            if let Err(e) = hero.allocate_points(Allocation::all_into(attribute, points as u32)) {
                println!("{}", e);
            }
        }
        Ok(())
    }

    /// Play one run to its end. Returns `None` if the run could not start.
    fn play_run(&mut self, hero: &mut Hero) -> Result<Option<RunSummary>> {
        let mut run = match self.campaign.start_run(hero, self.sink.as_mut()) {
            Ok(run) => run,
            Err(e) => {
                println!("{}", e);
                return Ok(None);
            }
        };

        loop {
            self.allocate_points(hero)?;
            let next = run.next_encounter(hero, &self.data, &mut self.rng, self.sink.as_mut())?;
            let Some(mut encounter) = next else {
                break;
            };
            self.fight(&mut encounter, hero)?;

            let resolution = run.complete_encounter(hero, &encounter, &self.data, &mut self.rng, self.sink.as_mut())?;
            if let Some(mut offer) = resolution.rewards {
                self.choose_reward(&mut offer, hero)?;
            }
        }

        let summary = self.campaign.conclude(run, hero, self.sink.as_mut())?;
        Ok(Some(summary))
    }

    fn fight(&mut self, encounter: &mut Encounter, hero: &mut Hero) -> Result<()> {
        encounter.advance(hero, &mut self.rng, self.sink.as_mut());
        while !encounter.is_resolved() {
            let foe = &encounter.foe().character;
            println!(
                "\n{}: {:.1}/{:.1} HP, {:.1}/{:.1} chaos  vs  {}: {:.1}/{:.1} HP",
                hero.name(),
                hero.character.health(),
                hero.character.max_health(),
                hero.character.resource(),
                hero.character.max_resource(),
                foe.name,
                foe.health(),
                foe.max_health()
            );
            println!("1. Attack");
            for (i, ability) in hero.abilities().iter().enumerate() {
                println!("{}. {} ({} chaos) - {}", i + 2, ability.name, ability.cost, ability.description);
            }
            println!("4. Drink potion ({})\n5. Flee\n6. Status", hero.potions.len());

            let action = match self.input.number("> ", 6)? {
                1 => Action::Attack,
                2 => Action::Ability(0),
                3 => Action::Ability(1),
                4 => match self.choose_potion(hero)? {
                    Some(index) => Action::Potion(index),
                    None => continue,
                },
                5 => Action::Flee,
                6 => {
                    self.print_status(hero);
                    continue;
                }
                _ => continue,
            };
            if let Err(e) = encounter.submit(hero, action, &mut self.rng, self.sink.as_mut()) {
                println!("{}", e);
            }
        }
        Ok(())
    }

    fn choose_potion(&mut self, hero: &Hero) -> Result<Option<usize>> {
        if hero.potions.is_empty() {
            println!("Your potion belt is empty.");
            return Ok(None);
        }
        for (i, potion) in hero.potions.iter().enumerate() {
            println!("{}. {}", i + 1, potion);
        }
        let choice = self.input.number("Potion (0 to go back): ", hero.potions.len())?;
        Ok(choice.checked_sub(1))
    }

    fn choose_reward(&mut self, offer: &mut RewardOffer, hero: &mut Hero) -> Result<()> {
        while !offer.is_closed() {
            println!("\nChoose a reward:");
            let available: Vec<usize> = offer.rewards().map(|(i, _)| i).collect();
            for (i, reward) in offer.rewards() {
                println!("{}. {}", i + 1, reward);
            }
            println!("0. Take nothing");

            let choice = self.input.number("> ", offer.rewards().map(|(i, _)| i + 1).max().unwrap_or(0))?;
            match choice.checked_sub(1) {
                None => offer.decline(hero, self.sink.as_mut()),
                Some(index) if available.contains(&index) => {
                    if let Err(e) = offer.choose(index, hero, self.sink.as_mut()) {
                        println!("{}", e);
                    }
                }
                Some(_) => println!("That reward is gone."),
            }
        }
        Ok(())
    }

    fn print_status(&self, hero: &Hero) {
        let c = &hero.character;
        println!("\n--- {} the {} ({}, level {}) ---", hero.name(), hero.class(), level_title(hero.level()), hero.level());
        match hero.xp_to_next_level() {
            Some(next) => println!("XP: {:.1}/{}", hero.xp(), next),
            None => println!("XP: max level"),
        }
        println!("HP {:.1}/{:.1} | Chaos {:.1}/{:.1}", c.health(), c.max_health(), c.resource(), c.max_resource());
        println!("STR {:.1} | DEF {:.1} | AGI {:.1} | Proficiency +{:.2}", c.strength(), c.defense(), c.agility(), hero.proficiency());
        println!("Lives: {}", self.campaign.lives_remaining(hero.name()));
        for gear in c.equipment().all_items() {
            println!("  {}: {}", gear.slot.name(), gear);
        }
        for potion in hero.potions.iter() {
            println!("  Potion: {}", potion);
        }
    }
}
