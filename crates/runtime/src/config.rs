//! Runtime configuration structures and loaders.
use std::env;

use game_core::{Aut, CombatParams, GameConfig};

use crate::logging::init_tracing;

/// Configuration required to bootstrap a runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub combat: CombatParams,
    /// Level seed mixed into every roll.
    pub seed: u64,
    /// Directive used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            combat: CombatParams::default(),
            seed: 0,
            log_filter: "info".to_owned(),
        }
    }
}

impl RuntimeConfig {
    /// Loads a `.env` file if present, then reads the environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!("ignoring unreadable .env file: {}", err),
        }
        Self::from_env()
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GAME_SEED` - Level seed (default: 0)
    /// - `AI_THINK_CAP` - Consecutive thinking turns before an AI fault (default: 8)
    /// - `AI_MAX_GOAL_DEPTH` - Deepest tolerated goal stack (default: 16)
    /// - `THINK_COST` - Aut charged for a thinking turn (default: 1)
    /// - `LOG_FILTER` - Fallback tracing directive (default: info)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    /// Unparsable values are logged and ignored. Caps below their minimum
    /// (one thinking turn, a goal depth of two) are raised with a warning.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_var::<u64>(&lookup, "GAME_SEED") {
            config.seed = seed;
        }
        if let Some(cap) = read_var::<u32>(&lookup, "AI_THINK_CAP") {
            config.game = config.game.with_think_cap(cap);
            warn_if_raised("AI_THINK_CAP", cap, config.game.max_think_streak);
        }
        if let Some(depth) = read_var::<usize>(&lookup, "AI_MAX_GOAL_DEPTH") {
            config.game = config.game.with_max_goal_depth(depth);
            warn_if_raised("AI_MAX_GOAL_DEPTH", depth, config.game.max_goal_depth);
        }
        if let Some(cost) = read_var::<Aut>(&lookup, "THINK_COST") {
            config.game = config.game.with_think_cost(cost);
        }
        if let Some(filter) = lookup("LOG_FILTER") {
            config.log_filter = filter;
        }

        config
    }

    /// Installs the global subscriber with [`Self::log_filter`] as the
    /// fallback directive. Returns false if one was already installed.
    pub fn init_logging(&self) -> bool {
        init_tracing(&self.log_filter)
    }
}

fn warn_if_raised<T>(key: &str, requested: T, applied: T)
where
    T: PartialEq + std::fmt::Display,
{
    if requested != applied {
        tracing::warn!("{}={} is below the minimum; using {}", key, requested, applied);
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_known_variables() {
        let config = RuntimeConfig::from_vars(vars(&[
            ("GAME_SEED", "42"),
            ("AI_THINK_CAP", "3"),
            ("AI_MAX_GOAL_DEPTH", "6"),
            ("THINK_COST", "2"),
            ("LOG_FILTER", "game_core=trace"),
        ]));

        assert_eq!(config.seed, 42);
        assert_eq!(config.game.max_think_streak, 3);
        assert_eq!(config.game.max_goal_depth, 6);
        assert_eq!(config.game.think_cost, 2);
        assert_eq!(config.log_filter, "game_core=trace");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = RuntimeConfig::from_vars(vars(&[("GAME_SEED", "soon"), ("THINK_COST", "")]));
        assert_eq!(config.seed, 0);
        assert_eq!(config.game.think_cost, GameConfig::default().think_cost);
    }

    #[test]
    fn caps_below_the_minimum_are_raised() {
        let config = RuntimeConfig::from_vars(vars(&[
            ("AI_THINK_CAP", "0"),
            ("AI_MAX_GOAL_DEPTH", "1"),
        ]));
        assert_eq!(config.game.max_think_streak, 1);
        assert_eq!(config.game.max_goal_depth, 2);
    }
}
