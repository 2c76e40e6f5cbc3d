use std::fmt;

use super::AiContext;
use crate::action::Action;

/// A self-contained behavior.
///
/// Goals may read the world through the [`AiContext`] but never mutate
/// anything besides their own fields; effects happen through the action
/// they return.
pub trait Goal: fmt::Debug {
    /// Label shown as the actor's intent.
    fn name(&self) -> &'static str;

    /// True once the goal has nothing left to do. Finished goals are popped
    /// before the next decision.
    fn is_finished(&self, ctx: &AiContext<'_>) -> bool;

    /// Decides this turn's action or delegates to a sub-goal.
    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision;
}

/// What a goal decided for the current evaluation.
#[derive(Debug)]
pub enum Decision {
    Act(Action),
    /// Suspend the current goal under a new one. No action is taken this
    /// evaluation.
    Push(Box<dyn Goal>),
}

impl Decision {
    pub fn push(goal: impl Goal + 'static) -> Self {
        Decision::Push(Box::new(goal))
    }

    pub fn wait() -> Self {
        Decision::Act(Action::Wait)
    }
}

impl From<Action> for Decision {
    fn from(action: Action) -> Self {
        Decision::Act(action)
    }
}
