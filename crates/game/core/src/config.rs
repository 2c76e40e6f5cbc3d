use crate::state::Aut;

/// Base delay of each action kind before speed scaling, in aut.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseCosts {
    pub wait: Aut,
    pub movement: Aut,
    pub attack: Aut,
    pub fire: Aut,
    pub use_item: Aut,
    pub pick_up: Aut,
}

impl Default for BaseCosts {
    fn default() -> Self {
        Self {
            wait: 10,
            movement: 10,
            attack: 10,
            fire: 10,
            use_item: 10,
            pick_up: 10,
        }
    }
}

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Energy balance at or above which an actor is ready to act.
    pub ready_threshold: Aut,

    /// Speed at which an action costs exactly its base cost.
    pub normal_speed: i32,

    /// Smallest cost the ledger accepts. Zero or negative charges are raised
    /// to this value so an actor always yields the turn.
    pub min_action_cost: Aut,

    /// Flat cost charged when an AI evaluation pushes a sub-goal instead of
    /// producing an action.
    pub think_cost: Aut,

    /// Consecutive evaluations without an action before the AI is declared
    /// stuck and forced to wait.
    pub max_think_streak: u32,

    /// Deepest goal stack tolerated before the AI is declared stuck.
    pub max_goal_depth: usize,

    pub base_costs: BaseCosts,

    /// Below this HP percentage a threatened actor tries to flee.
    pub flee_hp_percent: u32,

    /// Below this HP percentage an actor drinks a healing consumable.
    pub heal_hp_percent: u32,

    /// Steps taken by one wander leg before re-evaluating.
    pub wander_steps: u32,

    /// Steps a path-to sub-goal walks before handing control back.
    pub path_step_budget: u32,

    /// Distance a follower keeps from its leader.
    pub follow_distance: u32,

    /// Distance a skirmisher tries to keep from its target.
    pub skirmish_distance: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_ATTACKS: usize = 4;
    pub const MAX_CONSUMABLES: usize = 8;

    pub const MIN_SPEED: i32 = 1;
    pub const MAX_SPEED: i32 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_NORMAL_SPEED: i32 = 10;
    pub const DEFAULT_THINK_COST: Aut = 1;
    pub const DEFAULT_MAX_THINK_STREAK: u32 = 8;
    pub const DEFAULT_MAX_GOAL_DEPTH: usize = 16;

    pub fn new() -> Self {
        Self {
            ready_threshold: 0,
            normal_speed: Self::DEFAULT_NORMAL_SPEED,
            min_action_cost: 1,
            think_cost: Self::DEFAULT_THINK_COST,
            max_think_streak: Self::DEFAULT_MAX_THINK_STREAK,
            max_goal_depth: Self::DEFAULT_MAX_GOAL_DEPTH,
            base_costs: BaseCosts::default(),
            flee_hp_percent: 25,
            heal_hp_percent: 50,
            wander_steps: 5,
            path_step_budget: 3,
            follow_distance: 2,
            skirmish_distance: 3,
        }
    }

    /// Sets the thinking-turn cap, never below one.
    pub fn with_think_cap(mut self, max_think_streak: u32) -> Self {
        self.max_think_streak = max_think_streak.max(1);
        self
    }

    pub fn with_think_cost(mut self, think_cost: Aut) -> Self {
        self.think_cost = think_cost;
        self
    }

    /// Sets the deepest tolerated goal stack, never below two.
    pub fn with_max_goal_depth(mut self, depth: usize) -> Self {
        self.max_goal_depth = depth.max(2);
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
