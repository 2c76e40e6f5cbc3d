//! Public runtime API surface.
//!
//! Traits that hosts implement to plug input and visuals into the step
//! loop, plus the error type every runtime call returns.

pub mod errors;
pub mod presentation;
pub mod providers;

pub use errors::{Result, RuntimeError};
pub use presentation::{InstantPresentation, Presentation, TimedPresentation};
pub use providers::{ActionProvider, ScriptedProvider, WaitActionProvider};
