//! Speed and action cost.
//!
//! Speed values determine how often an actor gets to act. Every registered
//! actor gains energy at the same rate, so an action's cost is what makes a
//! fast actor fast: the cost shrinks as speed grows.
//!
//! Formulas:
//! - effective_speed = clamp(BonusStack(base_speed + equipment) × statuses, MIN_SPEED, MAX_SPEED)
//! - final_cost = max(base_cost × normal_speed / effective_speed, min_cost)

use super::bonus::{Bonus, BonusStack};
use crate::config::GameConfig;
use crate::state::{Aut, StatusEffects, StatusKind};

/// Speed multiplier granted by haste, as a "more" percentage.
pub const HASTE_PERCENT: i32 = 50;

/// Speed reduction inflicted by slow, as a "less" percentage.
pub const SLOW_PERCENT: i32 = 50;

/// Computes the effective speed of an actor.
///
/// `equipment` holds additive/multiplicative bonuses contributed by gear;
/// statuses are appended as final multipliers.
pub fn effective_speed(base_speed: i32, equipment: &BonusStack, statuses: &StatusEffects) -> i32 {
    let mut stack = equipment.clone();
    if statuses.has(StatusKind::Hasted) {
        stack.add(Bonus::More(HASTE_PERCENT));
    }
    if statuses.has(StatusKind::Slowed) {
        stack.add(Bonus::Less(SLOW_PERCENT));
    }
    stack.apply(base_speed, GameConfig::MIN_SPEED, GameConfig::MAX_SPEED)
}

/// Calculate the final action cost from base cost and speed.
///
/// # Examples
/// - Normal action (cost 10, speed 10): 10 × 10 / 10 = 10
/// - Fast actor (cost 10, speed 20): 10 × 10 / 20 = 5
/// - Slow actor (cost 10, speed 5): 10 × 10 / 5 = 20
pub fn calculate_action_cost(base_cost: Aut, speed: i32, normal_speed: i32, min_cost: Aut) -> Aut {
    let speed = speed.clamp(GameConfig::MIN_SPEED, GameConfig::MAX_SPEED) as Aut;
    let cost = base_cost * normal_speed as Aut / speed;
    cost.max(min_cost)
}
