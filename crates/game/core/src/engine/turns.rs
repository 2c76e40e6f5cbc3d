//! Turn orchestration state.
//!
//! ```text
//! Idle -> SelectingActor -> ActorDeciding -> ApplyingCost -> SelectingActor ...
//! ```
//!
//! The scheduler only tracks whose turn it is; deciding and applying
//! actions is the engine's job.

use std::collections::BTreeSet;

use super::ledger::{EnergyLedger, LedgerError};
use crate::config::GameConfig;
use crate::state::{ActorId, Aut, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum TurnPhase {
    /// Nothing scheduled yet.
    Idle,
    SelectingActor,
    /// Waiting for the current actor's decision. Player turns stay here
    /// until input arrives.
    ActorDeciding,
    ApplyingCost,
}

/// Errors that can occur during turn operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("no actor is deciding (phase {0:?})")]
    NotDeciding(TurnPhase),

    #[error("it is {expected}'s turn, not {actual}'s")]
    WrongActor { expected: ActorId, actual: ActorId },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Clone, Debug)]
pub struct TurnScheduler {
    ledger: EnergyLedger,
    phase: TurnPhase,
    current: Option<ActorId>,
    generation: u64,
    /// Actors selected since the last round boundary.
    acted: BTreeSet<ActorId>,
}

impl TurnScheduler {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            ledger: EnergyLedger::new(config.ready_threshold, config.min_action_cost),
            phase: TurnPhase::Idle,
            current: None,
            generation: 0,
            acted: BTreeSet::new(),
        }
    }

    pub fn register(&mut self, actor: ActorId, base_speed: i32) -> Result<(), TurnError> {
        self.ledger.register(actor, base_speed)?;
        if self.phase == TurnPhase::Idle {
            self.phase = TurnPhase::SelectingActor;
        }
        Ok(())
    }

    /// Removes an actor. If it was mid-decision the turn is abandoned.
    /// Returns the new generation if everyone left has already acted this
    /// round.
    pub fn unregister(&mut self, actor: ActorId) -> Option<u64> {
        self.acted.remove(&actor);
        if self.current == Some(actor) {
            self.current = None;
            self.phase = TurnPhase::SelectingActor;
        }
        if !self.ledger.unregister(actor) {
            return None;
        }
        if self.ledger.is_empty() {
            self.phase = TurnPhase::Idle;
        }
        self.close_round()
    }

    /// Picks the next actor and enters `ActorDeciding`. An actor already
    /// deciding is returned again.
    pub fn select(&mut self) -> Option<ActorId> {
        if self.phase == TurnPhase::ActorDeciding {
            return self.current;
        }
        self.phase = TurnPhase::SelectingActor;
        let actor = self.ledger.next_ready()?;
        self.current = Some(actor);
        self.phase = TurnPhase::ActorDeciding;
        Some(actor)
    }

    /// Charges the deciding actor and ends its turn. Returns the new
    /// generation if this completed a round.
    pub fn finish(&mut self, actor: ActorId, cost: Aut) -> Result<Option<u64>, TurnError> {
        let expected = match (self.phase, self.current) {
            (TurnPhase::ActorDeciding, Some(current)) => current,
            _ => return Err(TurnError::NotDeciding(self.phase)),
        };
        if expected != actor {
            return Err(TurnError::WrongActor {
                expected,
                actual: actor,
            });
        }

        self.phase = TurnPhase::ApplyingCost;
        self.ledger.charge(actor, cost)?;
        self.acted.insert(actor);
        self.current = None;
        self.phase = TurnPhase::SelectingActor;

        Ok(self.close_round())
    }

    fn close_round(&mut self) -> Option<u64> {
        if self.acted.is_empty() || !self.ledger.actors().all(|id| self.acted.contains(&id)) {
            return None;
        }
        self.acted.clear();
        self.generation += 1;
        tracing::debug!("round {} complete at {}", self.generation, self.ledger.clock());
        Some(self.generation)
    }

    pub fn current(&self) -> Option<ActorId> {
        self.current
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Completed rounds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clock(&self) -> Tick {
        self.ledger.clock()
    }

    pub fn ledger(&self) -> &EnergyLedger {
        &self.ledger
    }

    pub fn is_registered(&self, actor: ActorId) -> bool {
        self.ledger.contains(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_follow_the_turn_cycle() {
        let mut turns = TurnScheduler::new(&GameConfig::default());
        assert_eq!(turns.phase(), TurnPhase::Idle);
        turns.register(ActorId(1), 10).unwrap();
        assert_eq!(turns.phase(), TurnPhase::SelectingActor);

        let actor = turns.select().unwrap();
        assert_eq!(turns.phase(), TurnPhase::ActorDeciding);
        assert_eq!(turns.select(), Some(actor));

        turns.finish(actor, 10).unwrap();
        assert_eq!(turns.phase(), TurnPhase::SelectingActor);
        assert_eq!(turns.current(), None);
    }

    #[test]
    fn round_boundary_waits_for_every_actor() {
        let mut turns = TurnScheduler::new(&GameConfig::default());
        turns.register(ActorId(1), 10).unwrap();
        turns.register(ActorId(2), 20).unwrap();

        let mut boundaries = Vec::new();
        let mut order = Vec::new();
        for _ in 0..3 {
            let actor = turns.select().unwrap();
            order.push(actor);
            let cost = if actor == ActorId(2) { 5 } else { 10 };
            boundaries.push(turns.finish(actor, cost).unwrap());
        }

        assert_eq!(order, vec![ActorId(2), ActorId(1), ActorId(2)]);
        assert_eq!(boundaries, vec![None, Some(1), None]);
    }

    #[test]
    fn removing_the_last_pending_actor_closes_the_round() {
        let mut turns = TurnScheduler::new(&GameConfig::default());
        turns.register(ActorId(1), 10).unwrap();
        turns.register(ActorId(2), 10).unwrap();
        turns.register(ActorId(3), 10).unwrap();

        let first = turns.select().unwrap();
        assert_eq!(turns.finish(first, 10).unwrap(), None);
        let second = turns.select().unwrap();
        assert_eq!(turns.finish(second, 10).unwrap(), None);

        assert_eq!(turns.unregister(ActorId(3)), Some(1));
        assert_eq!(turns.generation(), 1);
        assert_eq!(turns.unregister(ActorId(3)), None);
        assert_eq!(turns.unregister(first), None);
    }

    #[test]
    fn finishing_out_of_turn_is_rejected() {
        let mut turns = TurnScheduler::new(&GameConfig::default());
        turns.register(ActorId(1), 10).unwrap();
        turns.register(ActorId(2), 10).unwrap();
        assert_eq!(
            turns.finish(ActorId(1), 10),
            Err(TurnError::NotDeciding(TurnPhase::SelectingActor))
        );
        let actor = turns.select().unwrap();
        assert_eq!(actor, ActorId(1));
        assert_eq!(
            turns.finish(ActorId(2), 10),
            Err(TurnError::WrongActor {
                expected: ActorId(1),
                actual: ActorId(2),
            })
        );
    }
}
