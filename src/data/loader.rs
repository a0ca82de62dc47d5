//! RON data loader
//!
//! Loads game data from a directory of RON files, with fallback to hardcoded
//! defaults for anything missing, unreadable or empty.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DataError;
use crate::items::EquipSlot;
use super::enemies::{FoeTemplate, default_boss_templates, default_enemy_templates};
use super::items::{GearNames, PotionTemplate, default_gear_names, default_potion_templates};
use super::rules::Rules;

const RULES_FILE: &str = "rules.ron";
const ENEMIES_FILE: &str = "enemies.ron";
const BOSSES_FILE: &str = "bosses.ron";
const POTIONS_FILE: &str = "potions.ron";
const GEAR_NAMES_FILE: &str = "gear_names.ron";

/// All external game data. Template tables are guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct GameData {
    /// Run and loot rules
    pub rules: Rules,
    enemies: Vec<FoeTemplate>,
    bosses: Vec<FoeTemplate>,
    potions: Vec<PotionTemplate>,
    gear_names: Vec<GearNames>,
}

impl GameData {
    /// Build from explicit tables, rejecting empty ones
    pub fn new(
        rules: Rules,
        enemies: Vec<FoeTemplate>,
        bosses: Vec<FoeTemplate>,
        potions: Vec<PotionTemplate>,
        gear_names: Vec<GearNames>,
    ) -> Result<Self, DataError> {
        rules.validate()?;
        if enemies.is_empty() {
            return Err(DataError::EmptyTable("enemy"));
        }
        if bosses.is_empty() {
            return Err(DataError::EmptyTable("boss"));
        }
        if potions.is_empty() {
            return Err(DataError::EmptyTable("potion"));
        }
        let named = |slot: &EquipSlot| {
            gear_names
                .iter()
                .any(|n| n.slot == *slot && !n.nouns.is_empty() && !n.adjectives.is_empty())
        };
        if !EquipSlot::all().iter().all(named) {
            return Err(DataError::EmptyTable("gear name"));
        }

        Ok(Self { rules, enemies, bosses, potions, gear_names })
    }

    /// Load data from a directory, falling back per file to the defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let rules = load_or_default(dir, RULES_FILE, Rules::default);
        let rules = match rules.validate() {
            Ok(()) => rules,
            Err(e) => {
                log::warn!("{} in {}. Using default rules.", e, dir.display());
                Rules::default()
            }
        };
        let enemies = load_table_or_default(dir, ENEMIES_FILE, default_enemy_templates);
        let bosses = load_table_or_default(dir, BOSSES_FILE, default_boss_templates);
        let potions = load_table_or_default(dir, POTIONS_FILE, default_potion_templates);
        let gear_names = load_or_default(dir, GEAR_NAMES_FILE, default_gear_names);

        Self::new(rules.clone(), enemies.clone(), bosses.clone(), potions.clone(), gear_names)
            .unwrap_or_else(|e| {
                log::warn!("Invalid gear names in {}: {}. Using defaults.", dir.display(), e);
                Self {
                    rules,
                    enemies,
                    bosses,
                    potions,
                    gear_names: default_gear_names(),
                }
            })
    }

    /// Enemy templates
    pub fn enemies(&self) -> &[FoeTemplate] {
        &self.enemies
    }

    /// Boss templates
    pub fn bosses(&self) -> &[FoeTemplate] {
        &self.bosses
    }

    /// Potion templates
    pub fn potions(&self) -> &[PotionTemplate] {
        &self.potions
    }

    /// Pick a random enemy template
    pub fn random_enemy(&self, rng: &mut impl Rng) -> &FoeTemplate {
        &self.enemies[rng.gen_range(0..self.enemies.len())]
    }

    /// Pick a random boss template
    pub fn random_boss(&self, rng: &mut impl Rng) -> &FoeTemplate {
        &self.bosses[rng.gen_range(0..self.bosses.len())]
    }

    /// Pick a random potion template
    pub fn random_potion(&self, rng: &mut impl Rng) -> &PotionTemplate {
        &self.potions[rng.gen_range(0..self.potions.len())]
    }

    /// Roll a "<adjective> <noun>" name for gear in the given slot
    pub fn random_gear_name(&self, slot: EquipSlot, rng: &mut impl Rng) -> String {
        match self.gear_names.iter().find(|n| n.slot == slot) {
            Some(names) => {
                let noun = &names.nouns[rng.gen_range(0..names.nouns.len())];
                let adjective = &names.adjectives[rng.gen_range(0..names.adjectives.len())];
                format!("{} {}", adjective, noun)
            }
            None => slot.name().to_string(),
        }
    }
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            enemies: default_enemy_templates(),
            bosses: default_boss_templates(),
            potions: default_potion_templates(),
            gear_names: default_gear_names(),
        }
    }
}

/// Read and parse one RON file
pub fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_or_default<T: DeserializeOwned>(dir: &Path, file: &str, default: fn() -> T) -> T {
    let path = dir.join(file);
    if !path.exists() {
        return default();
    }
    match read_ron(&path) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            default()
        }
    }
}

fn load_table_or_default<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    default: fn() -> Vec<T>,
) -> Vec<T> {
    let table = load_or_default(dir, file, default);
    if table.is_empty() {
        log::warn!("{} is empty. Using defaults.", dir.join(file).display());
        return default();
    }
    table
}

fn write_ron<T: Serialize>(dir: &Path, file: &str, value: &T) -> anyhow::Result<()> {
    let text = ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?;
    fs::write(dir.join(file), text)?;
    Ok(())
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    write_ron(dir, RULES_FILE, &Rules::default())?;
    write_ron(dir, ENEMIES_FILE, &default_enemy_templates())?;
    write_ron(dir, BOSSES_FILE, &default_boss_templates())?;
    write_ron(dir, POTIONS_FILE, &default_potion_templates())?;
    write_ron(dir, GEAR_NAMES_FILE, &default_gear_names())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("chaosdelve-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let data = GameData::load_from_dir(Path::new("/nonexistent/chaosdelve"));
        assert_eq!(data.enemies().len(), default_enemy_templates().len());
        assert_eq!(data.rules, Rules::default());
    }

    #[test]
    fn test_export_then_load() {
        let dir = scratch_dir("export");
        export_default_data(&dir).unwrap();
        assert!(dir.join(ENEMIES_FILE).exists());
        assert!(dir.join(GEAR_NAMES_FILE).exists());

        let data = GameData::load_from_dir(&dir);
        assert_eq!(data.bosses(), default_boss_templates().as_slice());
        assert_eq!(data.potions(), default_potion_templates().as_slice());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_override_and_broken_files() {
        let dir = scratch_dir("override");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(ENEMIES_FILE),
            r#"[(name: "Cave Bat", stats: (health: 12.0, strength: 3.0, defense: 1.0, agility: 14.0, resource: 0.0))]"#,
        )
        .unwrap();
        fs::write(dir.join(BOSSES_FILE), "not ron at all").unwrap();
        fs::write(dir.join(POTIONS_FILE), "[]").unwrap();

        let data = GameData::load_from_dir(&dir);
        assert_eq!(data.enemies().len(), 1);
        assert_eq!(data.enemies()[0].name, "Cave Bat");
        assert_eq!(data.bosses().len(), default_boss_templates().len());
        assert_eq!(data.potions().len(), default_potion_templates().len());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_new_rejects_empty_tables() {
        let err = GameData::new(
            Rules::default(),
            Vec::new(),
            default_boss_templates(),
            default_potion_templates(),
            default_gear_names(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::EmptyTable("enemy")));
    }

    #[test]
    fn test_invalid_rules_fall_back_to_defaults() {
        let dir = scratch_dir("rules");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(RULES_FILE), "(starting_lives: 9, resource_bonus_chance: NaN)").unwrap();

        let data = GameData::load_from_dir(&dir);
        assert_eq!(data.rules, Rules::default());
        let mut rng = StdRng::seed_from_u64(5);
        for level in 1..=5 {
            crate::items::offer_rewards(level, &data, &mut rng);
        }
        let _ = fs::remove_dir_all(&dir);

        let bad = Rules { flee_break_chance: f64::NAN, ..Rules::default() };
        let err = GameData::new(
            bad,
            default_enemy_templates(),
            default_boss_templates(),
            default_potion_templates(),
            default_gear_names(),
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidRule("flee_break_chance")));
    }

    #[test]
    fn test_gear_name_uses_slot_words() {
        let data = GameData::default();
        let mut rng = StdRng::seed_from_u64(7);
        let name = data.random_gear_name(EquipSlot::Weapon, &mut rng);
        assert!(name.ends_with("Sword") || name.ends_with("Axe"), "{}", name);
    }
}
