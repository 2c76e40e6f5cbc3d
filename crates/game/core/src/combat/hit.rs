//! Hit chance and accuracy calculations.

use super::CombatParams;

/// Hit chance in percent.
///
/// ```text
/// hit_chance = clamp(base + accuracy - evasion, min, max)
/// ```
pub fn calculate_hit_chance(accuracy: i32, evasion: i32, params: &CombatParams) -> u32 {
    let chance = params.hit_base + accuracy - evasion;
    chance.clamp(params.hit_min as i32, params.hit_max as i32) as u32
}

/// True if a d100 `roll` lands.
pub fn check_hit(accuracy: i32, evasion: i32, roll: u32, params: &CombatParams) -> bool {
    roll <= calculate_hit_chance(accuracy, evasion, params)
}
