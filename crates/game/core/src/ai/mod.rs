//! Goal-stack AI for non-player actors.
//!
//! Each actor owns a [`GoalStack`]. The goal on top decides every turn:
//! it either returns a concrete [`crate::Action`] or pushes a sub-goal and
//! hands control to it on the next evaluation. The stateless
//! [`goals::Bored`] fallback sits at the bottom and picks a behavior from
//! the actor's static [`BehaviorKind`].
mod behavior;
mod context;
mod goal;
pub mod goals;
mod stack;

pub use behavior::{BehaviorError, BehaviorKind};
pub use context::AiContext;
pub use goal::{Decision, Goal};
pub use stack::{AiFault, Evaluation, GoalStack};
