//! Damage calculation.

use super::CombatParams;

/// Damage of a landed hit against the defender's current armor.
///
/// ```text
/// final_damage = max(raw - armor, minimum)
/// ```
pub fn calculate_damage(raw: u32, armor: i32, params: &CombatParams) -> u32 {
    let reduced = raw.saturating_sub(armor.max(0) as u32);
    reduced.max(params.min_damage)
}
