//! Runtime orchestration for the deterministic turn core.
//!
//! This crate owns a [`game_core::GameState`] together with the
//! collaborators the core only knows as seams: the player's
//! [`ActionProvider`], the [`Presentation`] layer that animates projectiles
//! and the observers listening on the [`EventBus`]. Consumers build a
//! [`Runtime`] and call [`Runtime::step`] in their own loop.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the step loop and builder
//! - [`api`] exposes the traits and errors downstream clients implement or match
//! - [`events`] routes core events to topic observers
//! - [`oracle`] bundles the static map and rng oracles
//! - [`config`], [`logging`] and [`content`] cover process setup
pub mod api;
pub mod config;
pub mod content;
pub mod events;
pub mod logging;
pub mod oracle;
pub mod runtime;

pub use api::{
    ActionProvider, InstantPresentation, Presentation, Result, RuntimeError, ScriptedProvider,
    TimedPresentation, WaitActionProvider,
};
pub use config::RuntimeConfig;
pub use content::load_archetypes;
pub use events::{EventBus, EventObserver, Topic};
pub use logging::init_tracing;
pub use oracle::OracleManager;
pub use runtime::{Runtime, RuntimeBuilder};
