//! Turn scheduling and action execution.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Each
//! [`GameEngine::step`] selects the next ready actor from the energy ledger,
//! lets its goal stack decide (or pauses for player input), validates and
//! applies the action, charges its cost and ticks the actor's statuses.
//! Ranged attacks are handed to the deferred-effect bridge and resolved
//! later through [`GameEngine::resolve_deferred`], never in the middle of a
//! step.

mod errors;
mod ledger;
mod turns;

pub use errors::EngineError;
pub use ledger::{EnergyLedger, LedgerError};
pub use turns::{TurnError, TurnPhase, TurnScheduler};

use crate::action::{Action, ActionCostModel, ActionError, pre_validate};
use crate::ai::{AiContext, AiFault, BehaviorKind, Evaluation, GoalStack};
use crate::combat::{CombatExecutor, CombatOutcome, EffectPayload};
use crate::deferred::{FizzleReason, Resolution, ResolutionHandle};
use crate::env::{Env, RngOracle, compute_seed};
use crate::events::GameEvent;
use crate::interrupt::InterruptController;
use crate::registry::Archetype;
use crate::state::{
    ActorId, ActorState, Aut, Consumable, GameState, Position, StatusAdd, StatusKind,
};

/// What one committed turn did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub actor: ActorId,
    pub action: Action,
    pub cost: Aut,
    /// New generation if this turn completed a round.
    pub round_completed: Option<u64>,
    /// Set when the action was forced by an AI fault.
    pub fault: Option<AiFault>,
}

/// Result of one [`GameEngine::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// No actor is registered.
    NoActors,
    /// The player is deciding; submit an action to continue.
    AwaitingInput(ActorId),
    Acted(TurnReport),
    /// The actor pushed a sub-goal and paid the think cost.
    Thought {
        actor: ActorId,
        goal: &'static str,
        cost: Aut,
    },
}

/// Game engine that manages turn scheduling, AI decisions and action
/// application.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    /// Creates a new game engine with the given state.
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    // ===== population =====

    /// Spawns an AI actor with the archetype's behavior.
    pub fn spawn(&mut self, archetype: &Archetype, position: Position) -> Result<ActorId, EngineError> {
        self.spawn_with_behavior(archetype, position, archetype.behavior.clone())
    }

    /// Spawns an AI actor with a behavior chosen at spawn time, e.g. to
    /// name a leader. Invalid behavior falls back to idling.
    pub fn spawn_with_behavior(
        &mut self,
        archetype: &Archetype,
        position: Position,
        behavior: BehaviorKind,
    ) -> Result<ActorId, EngineError> {
        let id = self.state.world.allocate_id();
        let mut actor = ActorState::from_archetype(id, archetype, position);
        actor.behavior = match behavior.validate(id, &self.state.world) {
            Ok(()) => behavior,
            Err(err) => {
                tracing::warn!(
                    "{} ({}) has unusable {} behavior: {}; idling instead",
                    id,
                    archetype.name,
                    behavior.label(),
                    err
                );
                BehaviorKind::Idle
            }
        };
        self.insert(actor, Some(GoalStack::new()))
    }

    /// Spawns the player character, which decides through external input.
    pub fn spawn_player(&mut self, archetype: &Archetype, position: Position) -> Result<ActorId, EngineError> {
        let id = self.state.world.allocate_player_id();
        let actor = ActorState::from_archetype(id, archetype, position);
        self.insert(actor, None)
    }

    fn insert(&mut self, actor: ActorState, mind: Option<GoalStack>) -> Result<ActorId, EngineError> {
        let id = actor.id;
        let speed = actor.base_speed;
        tracing::info!("spawning {} {} at {}", actor.name, id, actor.position);
        match mind {
            Some(mind) => self.state.world.insert(actor, Some(mind))?,
            None => self.state.world.insert_player(actor)?,
        }
        self.state.turn.register(id, speed)?;
        Ok(id)
    }

    /// Removes an actor from the level entirely. Pending effects involving
    /// it will fizzle when resolved.
    pub fn despawn(&mut self, actor: ActorId) -> Result<ActorState, EngineError> {
        let state = self
            .state
            .world
            .remove(actor)
            .ok_or(EngineError::UnknownActor(actor))?;
        tracing::info!("despawned {} {}", state.name, actor);
        let round = self.state.turn.unregister(actor);
        self.publish_round(round);
        Ok(state)
    }

    // ===== turn loop =====

    /// Advances the simulation by one decision.
    ///
    /// Returns immediately with [`StepOutcome::AwaitingInput`] while the
    /// player is deciding.
    pub fn step(
        &mut self,
        env: &Env<'_>,
        combat: &dyn CombatExecutor,
    ) -> Result<StepOutcome, EngineError> {
        let resumed = self.state.turn.phase() == TurnPhase::ActorDeciding;
        let Some(actor) = self.state.turn.select() else {
            return Ok(StepOutcome::NoActors);
        };
        if !resumed {
            tracing::trace!("{}'s turn at {}", actor, self.state.turn.clock());
            self.state.events.push(GameEvent::TurnStarted {
                actor,
                clock: self.state.turn.clock(),
            });
        }

        if self.state.world.player() == Some(actor) {
            return Ok(StepOutcome::AwaitingInput(actor));
        }

        let intent_before = self.state.intent_of(actor);
        let evaluation = self.evaluate(actor, env);
        let intent_after = self.state.intent_of(actor);
        if let Some(intent) = intent_after
            && intent_after != intent_before
        {
            self.state
                .events
                .push(GameEvent::IntentChanged { actor, intent });
        }

        match evaluation {
            Evaluation::Act(action) => {
                let action = match pre_validate(&self.state.world, env, actor, action) {
                    Ok(action) => action,
                    Err(err) => {
                        tracing::debug!("{} cannot {:?} ({}); waiting", actor, action, err);
                        Action::Wait
                    }
                };
                match self.perform(actor, action, env, combat, None) {
                    Err(err) if err.is_recoverable() => {
                        tracing::warn!("{} failed to {:?}: {}; waiting", actor, action, err);
                        self.perform(actor, Action::Wait, env, combat, None)
                    }
                    other => other,
                }
                .map(StepOutcome::Acted)
            }
            Evaluation::Pushed { goal } => {
                let cost = ActionCostModel::new(&self.state.config).think_cost();
                let round = self.state.turn.finish(actor, cost)?;
                self.publish_round(round);
                Ok(StepOutcome::Thought { actor, goal, cost })
            }
            Evaluation::Fault(fault) => {
                self.state
                    .events
                    .push(GameEvent::AiFault { actor, fault });
                InterruptController::reinstall(&mut self.state.world, actor);
                self.perform(actor, Action::Wait, env, combat, Some(fault))
                    .map(StepOutcome::Acted)
            }
        }
    }

    /// Commits the player's decision. Invalid actions are rejected and the
    /// player keeps the turn.
    pub fn submit_player_action(
        &mut self,
        env: &Env<'_>,
        combat: &dyn CombatExecutor,
        action: Action,
    ) -> Result<TurnReport, EngineError> {
        let player = self.state.world.player().ok_or(EngineError::NoPlayer)?;
        let current = self.state.turn.current();
        if self.state.turn.phase() != TurnPhase::ActorDeciding || current != Some(player) {
            return Err(EngineError::NotPlayersTurn { current });
        }
        let action = pre_validate(&self.state.world, env, player, action)?;
        self.perform(player, action, env, combat, None)
    }

    fn evaluate(&mut self, actor: ActorId, env: &Env<'_>) -> Evaluation {
        let seed = self.next_seed(actor);
        let Some(mut mind) = self.state.world.take_mind(actor) else {
            tracing::error!("{} has no goal stack", actor);
            return Evaluation::Fault(AiFault::MissingMind);
        };

        let evaluation = match self.state.world.actor(actor) {
            Some(state) => {
                let ctx = AiContext::new(state, &self.state.world, *env, &self.state.config, seed);
                mind.evaluate(&ctx)
            }
            None => Evaluation::Fault(AiFault::MissingMind),
        };
        self.state.world.restore_mind(actor, mind);
        evaluation
    }

    fn perform(
        &mut self,
        actor: ActorId,
        action: Action,
        env: &Env<'_>,
        combat: &dyn CombatExecutor,
        fault: Option<AiFault>,
    ) -> Result<TurnReport, EngineError> {
        let cost = {
            let state = self
                .state
                .world
                .actor(actor)
                .ok_or(EngineError::UnknownActor(actor))?;
            ActionCostModel::new(&self.state.config).cost(state, &action)
        };

        self.apply(actor, action, env, combat)?;
        tracing::debug!("{} {} for {} aut", actor, action.kind(), cost);
        self.state.events.push(GameEvent::ActionTaken {
            actor,
            action,
            cost,
        });

        let round = self.state.turn.finish(actor, cost)?;
        self.publish_round(round);
        InterruptController::tick(&mut self.state.world, actor, &mut self.state.events);
        let round = round.or(self.reap());

        Ok(TurnReport {
            actor,
            action,
            cost,
            round_completed: round,
            fault,
        })
    }

    fn apply(
        &mut self,
        actor: ActorId,
        action: Action,
        env: &Env<'_>,
        combat: &dyn CombatExecutor,
    ) -> Result<(), EngineError> {
        match action {
            Action::Wait => {}

            Action::Move(dir) => {
                if let Some(state) = self.state.world.actor_mut(actor) {
                    state.position = state.position.step(dir);
                }
            }

            Action::Attack { target, attack } => {
                let seed = self.next_seed(actor);
                let outcome =
                    combat.apply_attack(&mut self.state.world, actor, target, attack, env.rng, seed)?;
                self.publish_strike(actor, target, outcome);
            }

            Action::Fire { target, attack } => {
                let seed = self.next_seed(actor);
                let state = self
                    .state
                    .world
                    .actor(actor)
                    .ok_or(EngineError::UnknownActor(actor))?;
                let travel = state
                    .attack(attack)
                    .and_then(|weapon| weapon.ranged.as_ref())
                    .map(|profile| profile.travel)
                    .ok_or(ActionError::NoSuchAttack(attack))?;
                let payload = EffectPayload::capture(state, attack, seed)
                    .ok_or(ActionError::NoSuchAttack(attack))?;

                let launched_at = self.state.turn.clock();
                let handle =
                    self.state
                        .deferred
                        .begin(actor, Some(target), payload, travel, launched_at);
                tracing::debug!("{} fired at {} ({})", actor, target, handle);
                self.state.events.push(GameEvent::ProjectileLaunched {
                    handle,
                    source: actor,
                    target: Some(target),
                    travel,
                });
            }

            Action::UseItem { slot } => {
                let item = self
                    .state
                    .world
                    .actor_mut(actor)
                    .and_then(|state| state.consumables.pop_at(slot))
                    .ok_or(ActionError::NoSuchItem(slot))?;
                match item {
                    Consumable::Healing { amount } => {
                        if let Some(state) = self.state.world.actor_mut(actor) {
                            state.heal(amount);
                        }
                    }
                    Consumable::Remedy => {
                        for kind in [StatusKind::Confused, StatusKind::Frightened] {
                            InterruptController::remove(
                                &mut self.state.world,
                                actor,
                                kind,
                                &mut self.state.events,
                            )?;
                        }
                    }
                }
            }

            Action::PickUp => {
                let position = self
                    .state
                    .world
                    .actor(actor)
                    .map(|state| state.position)
                    .ok_or(EngineError::UnknownActor(actor))?;
                let item = self
                    .state
                    .world
                    .take_item(position)
                    .ok_or(ActionError::NothingToPickUp(position))?;
                let stored = self
                    .state
                    .world
                    .actor_mut(actor)
                    .is_some_and(|state| state.consumables.try_push(item).is_ok());
                if !stored {
                    self.state.world.place_item(position, item);
                    return Err(ActionError::InventoryFull.into());
                }
            }
        }
        Ok(())
    }

    // ===== statuses =====

    /// Applies a status through the interrupt controller.
    pub fn apply_interrupt(
        &mut self,
        actor: ActorId,
        kind: StatusKind,
        duration: u32,
        source: Option<ActorId>,
    ) -> Result<StatusAdd, EngineError> {
        Ok(InterruptController::apply(
            &mut self.state.world,
            actor,
            kind,
            duration,
            source,
            &mut self.state.events,
        )?)
    }

    /// Ends a status early.
    pub fn remove_interrupt(&mut self, actor: ActorId, kind: StatusKind) -> Result<bool, EngineError> {
        Ok(InterruptController::remove(
            &mut self.state.world,
            actor,
            kind,
            &mut self.state.events,
        )?)
    }

    // ===== deferred effects =====

    /// Resolves a deferred effect. Runs at most once per handle; repeated,
    /// unknown and cancelled handles are ignored, and invalid actors make
    /// the effect fizzle.
    pub fn resolve_deferred(
        &mut self,
        handle: ResolutionHandle,
        rng: &dyn RngOracle,
        combat: &dyn CombatExecutor,
    ) -> Resolution {
        let Some(pending) = self.state.deferred.take(handle) else {
            tracing::debug!("ignoring resolution of {}", handle);
            return Resolution::Ignored;
        };

        if !self.state.world.is_valid(pending.source) {
            return self.fizzle(handle, FizzleReason::SourceGone);
        }
        let Some(target) = pending.target else {
            return self.fizzle(handle, FizzleReason::NoTarget);
        };
        if !self.state.world.is_valid(target) {
            return self.fizzle(handle, FizzleReason::TargetGone);
        }

        match combat.apply_effect(&mut self.state.world, &pending.payload, target, rng) {
            Ok(outcome) => {
                self.publish_strike(pending.source, target, outcome.clone());
                self.reap();
                Resolution::Applied(outcome)
            }
            Err(err) => {
                tracing::warn!("deferred effect {} failed: {}", handle, err);
                self.fizzle(handle, FizzleReason::TargetGone)
            }
        }
    }

    /// Cancels one pending effect. Safe for resolved or unknown handles.
    pub fn cancel_deferred(&mut self, handle: ResolutionHandle) -> bool {
        self.state.deferred.cancel(handle)
    }

    /// Cancels every pending effect, e.g. on level teardown.
    pub fn cancel_all_deferred(&mut self) -> Vec<ResolutionHandle> {
        let cancelled = self.state.deferred.cancel_all();
        if !cancelled.is_empty() {
            tracing::info!("cancelled {} pending effects", cancelled.len());
        }
        cancelled
    }

    fn fizzle(&mut self, handle: ResolutionHandle, reason: FizzleReason) -> Resolution {
        tracing::debug!("{} fizzled: {:?}", handle, reason);
        self.state
            .events
            .push(GameEvent::ProjectileFizzled { handle, reason });
        Resolution::Fizzled(reason)
    }

    // ===== helpers =====

    fn next_seed(&mut self, actor: ActorId) -> u64 {
        self.state.nonce += 1;
        compute_seed(self.state.seed, self.state.nonce, actor.0, 0)
    }

    fn publish_strike(&mut self, source: ActorId, target: ActorId, outcome: CombatOutcome) {
        let inflicted = outcome.inflicted.filter(|_| outcome.hit);
        self.state.events.push(GameEvent::Combat {
            source,
            target,
            outcome,
        });

        if let Some(infliction) = inflicted
            && self.state.world.is_valid(target)
            && let Err(err) = InterruptController::apply(
                &mut self.state.world,
                target,
                infliction.kind,
                infliction.duration,
                Some(source),
                &mut self.state.events,
            )
        {
            tracing::warn!("{} could not inflict {:?}: {}", source, infliction.kind, err);
        }
    }

    fn publish_round(&mut self, round: Option<u64>) {
        if let Some(generation) = round {
            self.state
                .events
                .push(GameEvent::RoundBoundary { generation });
        }
    }

    /// Unregisters actors that died and drops their minds. Returns the new
    /// generation if a death closed the round.
    fn reap(&mut self) -> Option<u64> {
        let dead: Vec<ActorId> = self
            .state
            .world
            .actors()
            .filter(|actor| !actor.alive && self.state.turn.is_registered(actor.id))
            .map(|actor| actor.id)
            .collect();

        let mut closed = None;
        for actor in dead {
            tracing::info!("{} died", actor);
            let round = self.state.turn.unregister(actor);
            self.state.world.drop_mind(actor);
            self.state.events.push(GameEvent::ActorDied { actor });
            self.publish_round(round);
            closed = closed.or(round);
        }
        closed
    }
}
