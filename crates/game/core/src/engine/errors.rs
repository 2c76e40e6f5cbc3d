//! Errors surfaced to the host driving the engine.
//!
//! AI misbehavior never appears here: it is logged, reported as
//! [`crate::GameEvent::AiFault`] and turned into a wait. These errors mean
//! the host asked for something that cannot be done.

use super::TurnError;
use crate::action::ActionError;
use crate::combat::CombatError;
use crate::interrupt::InterruptError;
use crate::state::{ActorId, WorldError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("actor {0} does not exist")]
    UnknownActor(ActorId),

    #[error("no player is present")]
    NoPlayer,

    #[error("it is not the player's turn (current: {current:?})")]
    NotPlayersTurn { current: Option<ActorId> },

    #[error("invalid action: {0}")]
    Action(#[from] ActionError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Interrupt(#[from] InterruptError),

    #[error("combat failed: {0}")]
    Combat(#[from] CombatError),
}

impl EngineError {
    /// True if the error leaves the pending turn untouched and the host may
    /// simply retry with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::Action(_) | EngineError::NotPlayersTurn { .. } | EngineError::Interrupt(_)
        )
    }
}
