//! Authoritative game state representation.
//!
//! This module owns the data structures that describe actors, their minds,
//! floor items and turn bookkeeping. Runtime layers query this state but
//! mutate it exclusively through the engine.
mod actor;
mod common;
mod status;
mod world;

pub use actor::{
    ActorState, Attack, Consumable, Faction, Infliction, RangedProfile, SHIELD_ARMOR,
};
pub use common::{ActorId, Aut, Direction, Position, ResourceMeter, Tick};
pub use status::{StatusAdd, StatusEffect, StatusEffects, StatusKind};
pub use world::{World, WorldError};

use crate::config::GameConfig;
use crate::deferred::DeferredEffectBridge;
use crate::engine::TurnScheduler;
use crate::events::{EventQueue, GameEvent};

/// Canonical state of a running level.
#[derive(Debug)]
pub struct GameState {
    /// RNG seed for deterministic random generation.
    ///
    /// Set once at game initialization and never modified. Combined with
    /// `nonce` to derive a unique seed for each random event.
    pub seed: u64,

    /// Number of decisions taken so far; mixed into every roll.
    pub nonce: u64,

    pub config: GameConfig,
    pub world: World,
    pub turn: TurnScheduler,
    pub deferred: DeferredEffectBridge,
    pub events: EventQueue,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let turn = TurnScheduler::new(&config);
        Self {
            seed,
            nonce: 0,
            config,
            world: World::new(),
            turn,
            deferred: DeferredEffectBridge::new(),
            events: EventQueue::new(),
        }
    }

    /// Label of the goal currently on top of an actor's stack.
    pub fn intent_of(&self, actor: ActorId) -> Option<&'static str> {
        self.world.mind(actor).map(|mind| mind.intent())
    }

    /// Drains queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn clock(&self) -> Tick {
        self.turn.clock()
    }
}
