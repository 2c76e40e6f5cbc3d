//! Topic-based routing of core events.
//!
//! The core queues [`game_core::GameEvent`]s while it works; the runtime
//! drains that queue once per step and publishes each event to the
//! observers subscribed to its topic.

mod bus;

pub use bus::{EventBus, EventObserver, Topic};
