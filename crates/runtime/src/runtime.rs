//! Single-threaded step loop around the core engine.
//!
//! Every [`Runtime::step`] does three things in order:
//!
//! 1. resolve deferred effects whose visuals completed since the last step
//! 2. advance the engine by one decision, asking the [`ActionProvider`]
//!    when the player is up
//! 3. drain the core's event queue, forwarding launches to the
//!    [`Presentation`] and everything to the [`EventBus`]
//!
//! Resolution therefore never runs while a turn is being evaluated.

use std::collections::VecDeque;

use game_core::{
    ActorId, ArchetypeRegistry, BehaviorKind, CombatExecutor, GameEngine, GameEvent, GameState,
    GridMap, Position, Resolution, ResolutionHandle, StandardCombat, StatusAdd, StatusKind,
    StepOutcome,
};

use crate::api::{
    ActionProvider, InstantPresentation, Presentation, Result, RuntimeError, WaitActionProvider,
};
use crate::config::RuntimeConfig;
use crate::events::{EventBus, EventObserver, Topic};
use crate::oracle::OracleManager;

/// Main runtime that owns the game state and its collaborators.
pub struct Runtime {
    state: GameState,
    oracles: OracleManager,
    registry: ArchetypeRegistry,
    combat: Box<dyn CombatExecutor>,
    player: Box<dyn ActionProvider>,
    presentation: Box<dyn Presentation>,
    bus: EventBus,
    /// Completions reported directly through [`Runtime::complete_effect`].
    completions: VecDeque<ResolutionHandle>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.oracles
    }

    pub fn registry(&self) -> &ArchetypeRegistry {
        &self.registry
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Spawns an AI actor from the registry.
    pub fn spawn(&mut self, archetype: &str, position: Position) -> Result<ActorId> {
        let archetype = self.registry.get(archetype)?;
        let id = GameEngine::new(&mut self.state).spawn(archetype, position)?;
        self.flush();
        Ok(id)
    }

    /// Spawns an AI actor with a behavior decided at spawn time.
    pub fn spawn_with_behavior(
        &mut self,
        archetype: &str,
        position: Position,
        behavior: BehaviorKind,
    ) -> Result<ActorId> {
        let archetype = self.registry.get(archetype)?;
        let id = GameEngine::new(&mut self.state).spawn_with_behavior(archetype, position, behavior)?;
        self.flush();
        Ok(id)
    }

    pub fn spawn_player(&mut self, archetype: &str, position: Position) -> Result<ActorId> {
        let archetype = self.registry.get(archetype)?;
        let id = GameEngine::new(&mut self.state).spawn_player(archetype, position)?;
        self.flush();
        Ok(id)
    }

    pub fn despawn(&mut self, actor: ActorId) -> Result<()> {
        GameEngine::new(&mut self.state).despawn(actor)?;
        self.flush();
        Ok(())
    }

    pub fn apply_interrupt(
        &mut self,
        actor: ActorId,
        kind: StatusKind,
        duration: u32,
        source: Option<ActorId>,
    ) -> Result<StatusAdd> {
        let outcome =
            GameEngine::new(&mut self.state).apply_interrupt(actor, kind, duration, source)?;
        self.flush();
        Ok(outcome)
    }

    /// Reports a finished visual out of band. The effect is resolved at
    /// the start of the next step.
    pub fn complete_effect(&mut self, handle: ResolutionHandle) {
        self.completions.push_back(handle);
    }

    /// Runs one step of the loop.
    pub fn step(&mut self) -> Result<StepOutcome> {
        self.resolve_completed();

        let env = self.oracles.env();
        let outcome = GameEngine::new(&mut self.state).step(&env, self.combat.as_ref())?;
        let outcome = match outcome {
            StepOutcome::AwaitingInput(player) => self.poll_player(player)?,
            other => other,
        };

        self.flush();
        Ok(outcome)
    }

    /// Steps until the player waits for input, nobody is left, or
    /// `max_steps` is reached. Returns the number of steps taken.
    pub fn run(&mut self, max_steps: usize) -> Result<usize> {
        for taken in 0..max_steps {
            match self.step()? {
                StepOutcome::AwaitingInput(_) | StepOutcome::NoActors => return Ok(taken + 1),
                StepOutcome::Acted(_) | StepOutcome::Thought { .. } => {}
            }
        }
        Ok(max_steps)
    }

    /// Cancels every pending deferred effect, e.g. before the level is
    /// discarded, and tells the presentation layer.
    pub fn teardown_level(&mut self) -> Vec<ResolutionHandle> {
        let cancelled = GameEngine::new(&mut self.state).cancel_all_deferred();
        self.completions.clear();
        self.presentation.cancelled(&cancelled);
        tracing::info!("level torn down, {} effects cancelled", cancelled.len());
        cancelled
    }

    fn poll_player(&mut self, player: ActorId) -> Result<StepOutcome> {
        let Some(action) = self.player.provide_action(player, &self.state) else {
            return Ok(StepOutcome::AwaitingInput(player));
        };

        let env = self.oracles.env();
        let submitted = GameEngine::new(&mut self.state).submit_player_action(
            &env,
            self.combat.as_ref(),
            action,
        );
        match submitted {
            Ok(report) => Ok(StepOutcome::Acted(report)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("player action {:?} rejected: {}", action, err);
                self.player.rejected(action, &err);
                Ok(StepOutcome::AwaitingInput(player))
            }
            Err(err) => Err(RuntimeError::Engine(err)),
        }
    }

    fn resolve_completed(&mut self) {
        let mut handles = self.presentation.poll_completed();
        handles.extend(self.completions.drain(..));
        if handles.is_empty() {
            return;
        }

        let rng = self.oracles.rng();
        let mut engine = GameEngine::new(&mut self.state);
        for handle in handles {
            match engine.resolve_deferred(handle, rng, self.combat.as_ref()) {
                Resolution::Applied(outcome) => {
                    tracing::debug!("{} landed: {:?}", handle, outcome)
                }
                Resolution::Fizzled(reason) => tracing::debug!("{} fizzled: {:?}", handle, reason),
                Resolution::Ignored => {}
            }
        }
        self.flush();
    }

    /// Forwards queued core events to the presentation and observers.
    fn flush(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::ProjectileLaunched {
                handle,
                source,
                target,
                travel,
            } = &event
            {
                self.presentation.begin(*handle, *source, *target, *travel);
            }
            self.bus.publish(&event);
        }
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    registry: ArchetypeRegistry,
    combat: Option<Box<dyn CombatExecutor>>,
    player: Option<Box<dyn ActionProvider>>,
    presentation: Option<Box<dyn Presentation>>,
    bus: EventBus,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            oracles: None,
            registry: ArchetypeRegistry::new(),
            combat: None,
            player: None,
            presentation: None,
            bus: EventBus::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Shorthand for [`Self::oracles`] with a fresh map.
    pub fn map(self, map: GridMap) -> Self {
        self.oracles(OracleManager::new(map))
    }

    pub fn archetypes(mut self, registry: ArchetypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the default [`StandardCombat`] executor.
    pub fn combat(mut self, combat: impl CombatExecutor + 'static) -> Self {
        self.combat = Some(Box::new(combat));
        self
    }

    /// Set player action provider (default: always wait)
    pub fn player_provider(mut self, provider: impl ActionProvider + 'static) -> Self {
        self.player = Some(Box::new(provider));
        self
    }

    /// Set presentation layer (default: effects land on the next step)
    pub fn presentation(mut self, presentation: impl Presentation + 'static) -> Self {
        self.presentation = Some(Box::new(presentation));
        self
    }

    pub fn observer(mut self, topic: Topic, observer: impl EventObserver + 'static) -> Self {
        self.bus.subscribe(topic, observer);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let combat = self
            .combat
            .unwrap_or_else(|| Box::new(StandardCombat::new(self.config.combat)));

        tracing::info!(
            "starting runtime: seed {}, {} archetypes",
            self.config.seed,
            self.registry.len()
        );
        Ok(Runtime {
            state: GameState::new(self.config.game, self.config.seed),
            oracles,
            registry: self.registry,
            combat,
            player: self.player.unwrap_or_else(|| Box::new(WaitActionProvider)),
            presentation: self
                .presentation
                .unwrap_or_else(|| Box::new(InstantPresentation::default())),
            bus: self.bus,
            completions: VecDeque::new(),
        })
    }
}
