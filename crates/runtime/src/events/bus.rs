//! Topic-based event bus implementation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use game_core::GameEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Topic {
    /// Turn starts, committed actions, round boundaries and deaths
    Turn,
    /// Resolved strikes, instant or deferred
    Combat,
    /// Status applications and expirations
    Status,
    /// Intent changes and AI faults
    Ai,
    /// Projectile launches and fizzles
    Projectile,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Turn,
        Topic::Combat,
        Topic::Status,
        Topic::Ai,
        Topic::Projectile,
    ];

    pub fn of(event: &GameEvent) -> Topic {
        match event {
            GameEvent::TurnStarted { .. }
            | GameEvent::ActionTaken { .. }
            | GameEvent::RoundBoundary { .. }
            | GameEvent::ActorDied { .. } => Topic::Turn,
            GameEvent::Combat { .. } => Topic::Combat,
            GameEvent::StatusApplied { .. } | GameEvent::StatusExpired { .. } => Topic::Status,
            GameEvent::IntentChanged { .. } | GameEvent::AiFault { .. } => Topic::Ai,
            GameEvent::ProjectileLaunched { .. } | GameEvent::ProjectileFizzled { .. } => {
                Topic::Projectile
            }
        }
    }
}

/// Receives published events.
pub trait EventObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> EventObserver for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Topic-based event bus
///
/// Observers subscribe to specific topics and only receive events they
/// care about. Delivery is synchronous and in emission order.
#[derive(Default)]
pub struct EventBus {
    topics: BTreeMap<Topic, Vec<Box<dyn EventObserver>>>,
    wildcard: Vec<Box<dyn EventObserver>>,
    published: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&mut self, topic: Topic, observer: impl EventObserver + 'static) {
        self.topics
            .entry(topic)
            .or_default()
            .push(Box::new(observer));
    }

    /// Subscribe to every topic
    pub fn subscribe_all(&mut self, observer: impl EventObserver + 'static) {
        self.wildcard.push(Box::new(observer));
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&mut self, event: &GameEvent) {
        let topic = Topic::of(event);
        self.published += 1;

        let observers = self.topics.get_mut(&topic);
        if observers.is_none() && self.wildcard.is_empty() {
            tracing::trace!("No subscribers for topic {:?}", topic);
            return;
        }
        for observer in observers.into_iter().flatten() {
            observer.on_event(event);
        }
        for observer in &mut self.wildcard {
            observer.on_event(event);
        }
    }

    pub fn observer_count(&self, topic: Topic) -> usize {
        self.topics.get(&topic).map_or(0, Vec::len) + self.wildcard.len()
    }

    /// Events published since creation.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topics.keys().collect::<Vec<_>>())
            .field("wildcard", &self.wildcard.len())
            .field("published", &self.published)
            .finish()
    }
}
