//! Class abilities
//!
//! Each hero class has two fixed abilities paid for with chaos. Ability
//! damage scales with strength and ignores defense.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::{Attribute, Character};
use crate::error::ValidationError;
use super::damage::magical_damage;
use super::status::StatusEffect;

/// What an ability's attached effect does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Damage-over-time on the target
    Poison { damage: f32 },
    /// Target skips its actions
    Frozen,
    /// Strength bonus on the caster
    StrengthBuff { magnitude: f32 },
}

/// An effect that may trigger when an ability lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbilityEffect {
    pub kind: EffectKind,
    /// Stated duration in turns
    pub duration: u32,
    /// Chance to trigger (0.0-1.0)
    pub chance: f64,
}

/// A class ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ability {
    pub name: &'static str,
    pub description: &'static str,
    /// Chaos cost
    pub cost: f32,
    /// Strength multiplier for damage, before proficiency
    pub multiplier: f32,
    pub effect: Option<AbilityEffect>,
}

pub const FERAL_ABILITIES: [Ability; 2] = [
    Ability {
        name: "Chaos Impact",
        description: "A crushing blow that ignores defense.",
        cost: 8.0,
        multiplier: 1.35,
        effect: None,
    },
    Ability {
        name: "Savage Fury",
        description: "Raises your own Strength for 3 turns.",
        cost: 6.0,
        multiplier: 0.0,
        effect: Some(AbilityEffect {
            kind: EffectKind::StrengthBuff { magnitude: 5.0 },
            duration: 3,
            chance: 1.0,
        }),
    },
];

pub const SHADE_ABILITIES: [Ability; 2] = [
    Ability {
        name: "Chaos Blade",
        description: "A quick, cheap magical strike.",
        cost: 4.0,
        multiplier: 1.20,
        effect: None,
    },
    Ability {
        name: "Venom Mist",
        description: "Light damage, then poison for 3 turns.",
        cost: 10.0,
        multiplier: 0.5,
        effect: Some(AbilityEffect {
            kind: EffectKind::Poison { damage: 5.0 },
            duration: 3,
            chance: 1.0,
        }),
    },
];

pub const ESSENCE_SHAPER_ABILITIES: [Ability; 2] = [
    Ability {
        name: "Chaos Orb",
        description: "A sphere of raw chaos with high damage.",
        cost: 12.0,
        multiplier: 1.50,
        effect: None,
    },
    Ability {
        name: "Freezing Ray",
        description: "Damage with a 75% chance to freeze the target.",
        cost: 15.0,
        multiplier: 0.8,
        effect: Some(AbilityEffect {
            kind: EffectKind::Frozen,
            duration: 2,
            chance: 0.75,
        }),
    },
];

/// How an attached effect played out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectOutcome {
    /// Landed on the target
    Inflicted(StatusEffect),
    /// Landed on the caster
    Buffed { attribute: Attribute, magnitude: f32, duration: u32 },
    /// Trigger roll failed
    Resisted,
}

/// Result of a successful cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastResult {
    /// Damage dealt to the target
    pub damage: f32,
    pub effect: Option<EffectOutcome>,
}

impl Ability {
    /// Does this ability deal damage before any proficiency bonus?
    pub fn is_offensive(&self) -> bool {
        self.multiplier > 0.0
    }

    /// Cast against a target. Fails without side effects if the caster
    /// lacks the chaos to pay for it.
    pub fn cast(
        &self,
        caster: &mut Character,
        proficiency: f32,
        target: &mut Character,
        rng: &mut impl Rng,
    ) -> Result<CastResult, ValidationError> {
        if !caster.spend_resource(self.cost) {
            return Err(ValidationError::InsufficientResource {
                ability: self.name.to_string(),
                cost: self.cost,
                available: caster.resource(),
            });
        }

        let damage = target.take_damage(magical_damage(caster.strength(), self.multiplier, proficiency));

        let effect = self.effect.map(|effect| {
            if rng.gen::<f64>() >= effect.chance {
                return EffectOutcome::Resisted;
            }
            match effect.kind {
                EffectKind::Poison { damage } => {
                    let status = StatusEffect::poison(damage, effect.duration);
                    target.effects.apply(status);
                    EffectOutcome::Inflicted(status)
                }
                EffectKind::Frozen => {
                    let status = StatusEffect::frozen(effect.duration);
                    target.effects.apply(status);
                    EffectOutcome::Inflicted(status)
                }
                EffectKind::StrengthBuff { magnitude } => {
                    caster.buffs.apply(Attribute::Strength, magnitude, effect.duration);
                    EffectOutcome::Buffed {
                        attribute: Attribute::Strength,
                        magnitude,
                        duration: effect.duration,
                    }
                }
            }
        });

        Ok(CastResult { damage, effect })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::status::StatusKind;
    use crate::entities::BaseStats;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn caster(resource: f32) -> Character {
        Character::new("Caster", 1, BaseStats::new(50.0, 20.0, 10.0, 10.0, resource))
    }

    fn dummy() -> Character {
        Character::new("Dummy", 1, BaseStats::new(200.0, 5.0, 100.0, 5.0, 0.0))
    }

    #[test]
    fn test_cast_ignores_defense_and_pays_cost() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut c = caster(60.0);
        let mut t = dummy();
        let result = ESSENCE_SHAPER_ABILITIES[0].cast(&mut c, 0.0, &mut t, &mut rng).unwrap();
        assert!((result.damage - 30.0).abs() < 1e-4);
        assert!((t.health() - 170.0).abs() < 1e-4);
        assert_eq!(c.resource(), 48.0);
    }

    #[test]
    fn test_insufficient_resource_changes_nothing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut c = caster(10.0);
        let mut t = dummy();
        let err = ESSENCE_SHAPER_ABILITIES[1].cast(&mut c, 0.0, &mut t, &mut rng).unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientResource { .. }));
        assert_eq!(c.resource(), 10.0);
        assert_eq!(t.health(), 200.0);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_venom_mist_poisons_target() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut c = caster(40.0);
        let mut t = dummy();
        let result = SHADE_ABILITIES[1].cast(&mut c, 0.0, &mut t, &mut rng).unwrap();
        assert!(matches!(result.effect, Some(EffectOutcome::Inflicted(_))));
        assert_eq!(
            t.effects.get(StatusKind::Poison),
            Some(&StatusEffect::Poison { damage: 5.0, remaining_turns: 4 })
        );
    }

    #[test]
    fn test_savage_fury_buffs_caster() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut c = caster(40.0);
        let mut t = dummy();
        let result = FERAL_ABILITIES[1].cast(&mut c, 0.0, &mut t, &mut rng).unwrap();
        assert_eq!(result.damage, 0.0);
        assert_eq!(t.health(), 200.0);
        assert_eq!(c.strength(), 25.0);
        assert!(!FERAL_ABILITIES[1].is_offensive());
    }

    #[test]
    fn test_savage_fury_hits_with_proficiency() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut c = caster(40.0);
        let mut t = dummy();
        // 20 str x (0 + 0.10), taken before the buff lands
        let result = FERAL_ABILITIES[1].cast(&mut c, 0.10, &mut t, &mut rng).unwrap();
        assert!((result.damage - 2.0).abs() < 1e-4);
        assert!((t.health() - 198.0).abs() < 1e-4);
        assert_eq!(c.strength(), 25.0);
    }

    #[test]
    fn test_freeze_sometimes_resisted() {
        let mut rng = StdRng::seed_from_u64(21);
        let (mut landed, mut resisted) = (0, 0);
        for _ in 0..200 {
            let mut c = caster(60.0);
            let mut t = dummy();
            match ESSENCE_SHAPER_ABILITIES[1].cast(&mut c, 0.0, &mut t, &mut rng).unwrap().effect {
                Some(EffectOutcome::Inflicted(_)) => landed += 1,
                Some(EffectOutcome::Resisted) => resisted += 1,
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(landed > resisted);
        assert!(resisted > 0);
    }
}
