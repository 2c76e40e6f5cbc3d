use super::goals::Bored;
use super::{AiContext, Decision, Goal};
use crate::action::Action;
use crate::state::StatusKind;

/// Conditions under which an actor's AI is declared broken for a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AiFault {
    #[error("{streak} consecutive evaluations without an action")]
    ThinkCapExceeded { streak: u32 },

    #[error("goal stack grew to {depth} goals")]
    GoalDepthExceeded { depth: usize },

    #[error("goal stack was empty")]
    EmptyStack,

    #[error("actor has no goal stack")]
    MissingMind,
}

/// Result of one evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Evaluation {
    Act(Action),
    /// A sub-goal was pushed; the actor only thought this turn.
    Pushed { goal: &'static str },
    /// The stack was reset and the actor must wait.
    Fault(AiFault),
}

/// Per-actor stack of goals; the top is current.
///
/// The bottom entry is always the stateless [`Bored`] fallback and is never
/// popped. An interrupt installs its override with
/// [`GoalStack::reset_with_override`], which leaves exactly
/// `[Bored, override]`.
#[derive(Debug)]
pub struct GoalStack {
    goals: Vec<Box<dyn Goal>>,
    override_kind: Option<StatusKind>,
    think_streak: u32,
}

impl GoalStack {
    pub fn new() -> Self {
        Self {
            goals: vec![Box::new(Bored)],
            override_kind: None,
            think_streak: 0,
        }
    }

    /// Clears everything back to the fallback.
    pub fn reset(&mut self) {
        self.goals.clear();
        self.goals.push(Box::new(Bored));
        self.override_kind = None;
        self.think_streak = 0;
    }

    /// Replaces the stack with `[Bored, goal]` owned by `kind`.
    pub fn reset_with_override(&mut self, kind: StatusKind, goal: Box<dyn Goal>) {
        self.reset();
        self.goals.push(goal);
        self.override_kind = Some(kind);
    }

    pub fn push(&mut self, goal: Box<dyn Goal>) {
        self.goals.push(goal);
    }

    /// Status whose override goal currently occupies the stack.
    pub fn override_kind(&self) -> Option<StatusKind> {
        self.override_kind
    }

    pub fn depth(&self) -> usize {
        self.goals.len()
    }

    /// Goal labels from bottom to top.
    pub fn labels(&self) -> Vec<&'static str> {
        self.goals.iter().map(|goal| goal.name()).collect()
    }

    /// Label of the current goal.
    pub fn intent(&self) -> &'static str {
        self.goals.last().map_or(Bored::NAME, |goal| goal.name())
    }

    /// Runs one decision.
    ///
    /// Finished goals are popped (never the bottom), then the top goal is
    /// asked once. A push ends the evaluation; too many pushes in a row or
    /// too deep a stack resets the stack and reports a fault.
    pub fn evaluate(&mut self, ctx: &AiContext<'_>) -> Evaluation {
        while self.goals.len() > 1 && self.goals.last().is_some_and(|g| g.is_finished(ctx)) {
            if let Some(done) = self.goals.pop() {
                tracing::trace!("{} finished {}", ctx.actor.id, done.name());
            }
        }

        let Some(top) = self.goals.last_mut() else {
            return self.fault(ctx, AiFault::EmptyStack);
        };

        match top.take_action(ctx) {
            Decision::Act(action) => {
                self.think_streak = 0;
                Evaluation::Act(action)
            }
            Decision::Push(goal) => {
                let name = goal.name();
                self.goals.push(goal);
                self.think_streak += 1;

                if self.goals.len() > ctx.config.max_goal_depth {
                    let depth = self.goals.len();
                    return self.fault(ctx, AiFault::GoalDepthExceeded { depth });
                }
                if self.think_streak > ctx.config.max_think_streak {
                    let streak = self.think_streak;
                    return self.fault(ctx, AiFault::ThinkCapExceeded { streak });
                }

                tracing::debug!("{} pushed {} (depth {})", ctx.actor.id, name, self.goals.len());
                Evaluation::Pushed { goal: name }
            }
        }
    }

    fn fault(&mut self, ctx: &AiContext<'_>, fault: AiFault) -> Evaluation {
        tracing::error!(
            "AI fault for {} ({}): {}; stack {:?} reset",
            ctx.actor.id,
            ctx.actor.name,
            fault,
            self.labels()
        );
        self.reset();
        Evaluation::Fault(fault)
    }
}

impl Default for GoalStack {
    fn default() -> Self {
        Self::new()
    }
}
