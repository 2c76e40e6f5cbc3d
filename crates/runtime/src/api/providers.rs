//! Abstraction for sourcing player intent.
//!
//! The core pauses on the player's turn until an action arrives. Runtime
//! users plug in an [`ActionProvider`] so the simulation can run with human
//! input, scripted fixtures or a replay.
use std::collections::VecDeque;

use game_core::{Action, ActorId, EngineError, GameState};

/// Source of player decisions.
pub trait ActionProvider {
    /// Action for the player, or `None` if none is available yet. The
    /// runtime asks again on the next step.
    fn provide_action(&mut self, actor: ActorId, state: &GameState) -> Option<Action>;

    /// Called when the engine rejected the last provided action. The turn
    /// is still pending.
    fn rejected(&mut self, _action: Action, _error: &EngineError) {}
}

/// Always waits. Useful for headless runs and as a fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct WaitActionProvider;

impl ActionProvider for WaitActionProvider {
    fn provide_action(&mut self, _actor: ActorId, _state: &GameState) -> Option<Action> {
        Some(Action::Wait)
    }
}

/// Plays back a fixed list of actions, then stalls.
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    actions: VecDeque<Action>,
    rejections: usize,
}

impl ScriptedProvider {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            rejections: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }

    /// Number of scripted actions the engine refused.
    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

impl ActionProvider for ScriptedProvider {
    fn provide_action(&mut self, _actor: ActorId, _state: &GameState) -> Option<Action> {
        self.actions.pop_front()
    }

    fn rejected(&mut self, action: Action, error: &EngineError) {
        tracing::debug!("scripted {:?} rejected: {}", action, error);
        self.rejections += 1;
    }
}
