//! Seam between deferred effects and whatever animates them.
//!
//! When an actor fires, the core hands out a [`ResolutionHandle`] and keeps
//! simulating. The presentation layer animates the projectile and reports
//! the handle back as completed; the runtime resolves completed handles at
//! the start of its next step, never in the middle of a turn.
use std::collections::BTreeMap;
use std::time::Duration;

use game_core::{ActorId, ResolutionHandle};

pub trait Presentation {
    /// A projectile started flying.
    fn begin(
        &mut self,
        handle: ResolutionHandle,
        source: ActorId,
        target: Option<ActorId>,
        travel: Duration,
    );

    /// Handles whose visuals finished since the last poll.
    fn poll_completed(&mut self) -> Vec<ResolutionHandle>;

    /// The given handles were cancelled in bulk, e.g. on level teardown.
    fn cancelled(&mut self, _handles: &[ResolutionHandle]) {}
}

/// Headless presentation: every effect lands on the following step.
#[derive(Clone, Debug, Default)]
pub struct InstantPresentation {
    in_flight: Vec<ResolutionHandle>,
}

impl Presentation for InstantPresentation {
    fn begin(
        &mut self,
        handle: ResolutionHandle,
        _source: ActorId,
        _target: Option<ActorId>,
        _travel: Duration,
    ) {
        self.in_flight.push(handle);
    }

    fn poll_completed(&mut self) -> Vec<ResolutionHandle> {
        std::mem::take(&mut self.in_flight)
    }

    fn cancelled(&mut self, handles: &[ResolutionHandle]) {
        self.in_flight.retain(|handle| !handles.contains(handle));
    }
}

/// Simulated wall clock: each poll advances time by one frame and completes
/// every projectile whose travel time has elapsed.
#[derive(Clone, Debug)]
pub struct TimedPresentation {
    frame: Duration,
    now: Duration,
    in_flight: BTreeMap<ResolutionHandle, Duration>,
}

impl TimedPresentation {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame,
            now: Duration::ZERO,
            in_flight: BTreeMap::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl Presentation for TimedPresentation {
    fn begin(
        &mut self,
        handle: ResolutionHandle,
        _source: ActorId,
        _target: Option<ActorId>,
        travel: Duration,
    ) {
        self.in_flight.insert(handle, self.now + travel);
    }

    fn poll_completed(&mut self) -> Vec<ResolutionHandle> {
        self.now += self.frame;
        let now = self.now;
        let landed: Vec<ResolutionHandle> = self
            .in_flight
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(handle, _)| *handle)
            .collect();
        for handle in &landed {
            self.in_flight.remove(handle);
        }
        landed
    }

    fn cancelled(&mut self, handles: &[ResolutionHandle]) {
        for handle in handles {
            self.in_flight.remove(handle);
        }
    }
}
