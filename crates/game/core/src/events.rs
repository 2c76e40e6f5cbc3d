//! Notifications emitted by the core.
//!
//! The engine queues [`GameEvent`]s while it works; hosts drain the queue
//! once per step and fan the events out to observers. Nothing in the core
//! reacts to its own events.

use std::time::Duration;

use crate::action::Action;
use crate::ai::AiFault;
use crate::combat::CombatOutcome;
use crate::deferred::{FizzleReason, ResolutionHandle};
use crate::state::{ActorId, Aut, StatusKind, Tick};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// An actor was selected to act.
    TurnStarted { actor: ActorId, clock: Tick },

    /// An actor committed an action and paid for it.
    ActionTaken {
        actor: ActorId,
        action: Action,
        cost: Aut,
    },

    /// The goal on top of an actor's stack changed.
    IntentChanged {
        actor: ActorId,
        intent: &'static str,
    },

    /// Every registered actor has been selected at least once since the
    /// previous boundary.
    RoundBoundary { generation: u64 },

    /// A strike was resolved, whether instant or deferred.
    Combat {
        source: ActorId,
        target: ActorId,
        outcome: CombatOutcome,
    },

    StatusApplied {
        actor: ActorId,
        kind: StatusKind,
        remaining: u32,
    },

    StatusExpired { actor: ActorId, kind: StatusKind },

    /// A deferred effect is in flight; the presentation layer must resolve
    /// or cancel the handle.
    ProjectileLaunched {
        handle: ResolutionHandle,
        source: ActorId,
        target: Option<ActorId>,
        travel: Duration,
    },

    /// A deferred effect landed without effect.
    ProjectileFizzled {
        handle: ResolutionHandle,
        reason: FizzleReason,
    },

    ActorDied { actor: ActorId },

    /// An actor's AI misbehaved and was forced to wait.
    AiFault { actor: ActorId, fault: AiFault },
}

impl GameEvent {
    pub fn actor(&self) -> Option<ActorId> {
        match self {
            GameEvent::TurnStarted { actor, .. }
            | GameEvent::ActionTaken { actor, .. }
            | GameEvent::IntentChanged { actor, .. }
            | GameEvent::StatusApplied { actor, .. }
            | GameEvent::StatusExpired { actor, .. }
            | GameEvent::ActorDied { actor }
            | GameEvent::AiFault { actor, .. } => Some(*actor),
            GameEvent::Combat { source, .. } | GameEvent::ProjectileLaunched { source, .. } => {
                Some(*source)
            }
            GameEvent::RoundBoundary { .. } | GameEvent::ProjectileFizzled { .. } => None,
        }
    }
}

/// FIFO of events waiting to be drained.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!("event {:?}", event);
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
