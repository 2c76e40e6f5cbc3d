//! Combat resolution.
//!
//! The engine never computes damage itself; it hands attacks to a
//! [`CombatExecutor`]. Melee attacks resolve immediately, ranged attacks
//! freeze the attacker's side into an [`EffectPayload`] at launch and are
//! resolved later against the target's live defenses. Both paths share the
//! same resolution so a deferred hit is indistinguishable from an instant
//! one.
mod damage;
mod executor;
mod hit;

pub use damage::calculate_damage;
pub use executor::{CombatExecutor, StandardCombat};
pub use hit::{calculate_hit_chance, check_hit};

use crate::state::{ActorId, ActorState, Infliction};

/// Balance parameters for hit and damage rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatParams {
    /// Hit chance before accuracy and evasion, in percent.
    pub hit_base: i32,
    pub hit_min: u32,
    pub hit_max: u32,
    /// Damage dealt by any landed hit regardless of armor.
    pub min_damage: u32,
}

impl CombatParams {
    /// Parameters under which every attack lands.
    pub const fn always_hit() -> Self {
        Self {
            hit_base: 100,
            hit_min: 100,
            hit_max: 100,
            min_damage: 1,
        }
    }
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            hit_base: 75,
            hit_min: 5,
            hit_max: 95,
            min_damage: 1,
        }
    }
}

/// Attacker-side values of one strike, frozen when the attack is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectPayload {
    pub attack: String,
    pub accuracy: i32,
    pub damage: u32,
    pub inflicts: Option<Infliction>,
    /// Seed of the hit roll.
    pub seed: u64,
}

impl EffectPayload {
    /// Captures an attack of `attacker`. `None` if the slot is empty.
    pub fn capture(attacker: &ActorState, attack: usize, seed: u64) -> Option<Self> {
        let weapon = attacker.attack(attack)?;
        Some(Self {
            attack: weapon.name.clone(),
            accuracy: attacker.accuracy,
            damage: weapon.damage,
            inflicts: weapon.inflicts,
            seed,
        })
    }
}

/// Result of one resolved strike.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatOutcome {
    pub attack: String,
    pub hit: bool,
    pub roll: u32,
    pub damage: u32,
    /// Status the caller must route through the interrupt controller.
    pub inflicted: Option<Infliction>,
    pub killed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("attacker {0} does not exist")]
    UnknownSource(ActorId),

    #[error("defender {0} does not exist")]
    UnknownTarget(ActorId),

    #[error("attacker has no attack in slot {0}")]
    NoSuchAttack(usize),
}
