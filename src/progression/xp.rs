//! Experience and leveling
//!
//! XP thresholds, per-level growth and reward formulas.

use rand::Rng;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 5;

/// XP needed to advance from levels 1-4
const THRESHOLDS: [u32; 4] = [10, 25, 50, 80];

/// Attribute points granted at hero creation
pub const STARTING_POINTS: u32 = 15;
/// Attribute points granted per level-up
pub const POINTS_PER_LEVEL: u32 = 5;
/// Ability proficiency gained per level-up
pub const PROFICIENCY_PER_LEVEL: f32 = 0.05;
/// Base health gained per level-up
pub const HEALTH_PER_LEVEL: f32 = 20.0;
/// Base chaos gained per level-up
pub const RESOURCE_PER_LEVEL: f32 = 10.0;

/// XP needed to go from `level` to `level + 1` (None at max level)
pub fn xp_for_next_level(level: u32) -> Option<u32> {
    if level == 0 || level >= MAX_LEVEL {
        return None;
    }
    THRESHOLDS.get(level as usize - 1).copied()
}

/// XP awarded for defeating a foe: level x 5 plus a d5
pub fn xp_reward(foe_level: u32, rng: &mut impl Rng) -> u32 {
    foe_level * 5 + rng.gen_range(1..=5)
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        0..=1 => "Novice",
        2 => "Apprentice",
        3 => "Journeyman",
        4 => "Veteran",
        _ => "Champion",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_xp_for_next_level() {
        assert_eq!(xp_for_next_level(1), Some(10));
        assert_eq!(xp_for_next_level(2), Some(25));
        assert_eq!(xp_for_next_level(4), Some(80));
        assert_eq!(xp_for_next_level(MAX_LEVEL), None);
        assert_eq!(xp_for_next_level(0), None);
    }

    #[test]
    fn test_xp_reward_range() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let xp = xp_reward(3, &mut rng);
            assert!((16..=20).contains(&xp));
        }
    }

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(1), "Novice");
        assert_eq!(level_title(MAX_LEVEL), "Champion");
    }
}
