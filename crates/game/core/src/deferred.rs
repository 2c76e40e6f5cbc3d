//! Effects whose resolution waits on the presentation layer.
//!
//! A ranged attack registers a [`PendingEffectResolution`] and the turn
//! loop moves on immediately. The presentation layer later resolves or
//! cancels the returned [`ResolutionHandle`]. Taking a pending entry
//! removes it, so each handle can resolve at most once; unknown, already
//! resolved and cancelled handles are indistinguishable and ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::combat::{CombatOutcome, EffectPayload};
use crate::state::{ActorId, Tick};

/// Opaque token identifying one deferred effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionHandle(pub u64);

impl fmt::Display for ResolutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Everything needed to resolve an effect later, frozen at launch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingEffectResolution {
    pub source: ActorId,
    pub target: Option<ActorId>,
    pub payload: EffectPayload,
    pub travel: Duration,
    pub launched_at: Tick,
}

/// Why a resolution had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FizzleReason {
    /// The source died or left before impact.
    SourceGone,
    /// The target died or left before impact.
    TargetGone,
    /// The effect was aimed at a tile, not an actor.
    NoTarget,
}

/// Result of resolving a handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied(CombatOutcome),
    Fizzled(FizzleReason),
    /// Unknown, already resolved or cancelled handle.
    Ignored,
}

/// Registry of effects in flight.
#[derive(Clone, Debug, Default)]
pub struct DeferredEffectBridge {
    pending: BTreeMap<ResolutionHandle, PendingEffectResolution>,
    next_handle: u64,
}

impl DeferredEffectBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an effect and returns its handle. Never blocks.
    pub fn begin(
        &mut self,
        source: ActorId,
        target: Option<ActorId>,
        payload: EffectPayload,
        travel: Duration,
        launched_at: Tick,
    ) -> ResolutionHandle {
        self.next_handle += 1;
        let handle = ResolutionHandle(self.next_handle);
        self.pending.insert(
            handle,
            PendingEffectResolution {
                source,
                target,
                payload,
                travel,
                launched_at,
            },
        );
        handle
    }

    /// Removes and returns a pending entry. The one-shot guard: a second
    /// call for the same handle yields `None`.
    pub fn take(&mut self, handle: ResolutionHandle) -> Option<PendingEffectResolution> {
        self.pending.remove(&handle)
    }

    /// Drops a pending entry. Safe for resolved and unknown handles.
    pub fn cancel(&mut self, handle: ResolutionHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    /// Drops every pending entry, returning the cancelled handles.
    pub fn cancel_all(&mut self) -> Vec<ResolutionHandle> {
        std::mem::take(&mut self.pending).into_keys().collect()
    }

    pub fn get(&self, handle: ResolutionHandle) -> Option<&PendingEffectResolution> {
        self.pending.get(&handle)
    }

    pub fn is_pending(&self, handle: ResolutionHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn handles(&self) -> impl Iterator<Item = ResolutionHandle> + '_ {
        self.pending.keys().copied()
    }
}
