//! Deterministic roguelike turn core.
//!
//! `game-core` owns the canonical rules: energy-based turn scheduling, the
//! goal-stack AI, status interrupts and deferred resolution of ranged
//! effects. All state mutation flows through [`engine::GameEngine`]; hosts
//! supply read-only oracles through [`env::Env`] and drain
//! [`events::GameEvent`]s after every step.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod deferred;
pub mod engine;
pub mod env;
pub mod events;
pub mod interrupt;
pub mod registry;
pub mod state;
pub mod stats;

pub use action::{Action, ActionCostModel, ActionError, ActionKind};
pub use ai::{AiFault, BehaviorKind, GoalStack};
pub use combat::{CombatExecutor, CombatOutcome, CombatParams, EffectPayload, StandardCombat};
pub use config::GameConfig;
pub use deferred::{DeferredEffectBridge, FizzleReason, Resolution, ResolutionHandle};
pub use engine::{
    EnergyLedger, EngineError, GameEngine, StepOutcome, TurnPhase, TurnReport, TurnScheduler,
};
pub use env::{Env, GridMap, MapOracle, PathOracle, PcgRng, RngOracle, VisionOracle};
pub use events::{EventQueue, GameEvent};
pub use interrupt::{InterruptController, InterruptError};
pub use registry::{Archetype, ArchetypeRegistry, RegistryError};
pub use state::{
    ActorId, ActorState, Attack, Aut, Consumable, Direction, Faction, GameState, Position,
    StatusAdd, StatusKind, Tick, World,
};
