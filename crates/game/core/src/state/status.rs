//! Status effect bookkeeping for actors.
//!
//! Status effects are timed conditions attached to an actor. Durations are
//! counted in the actor's own acting turns: the interrupt controller ticks
//! them once after each turn in which the actor performed an action.
//!
//! Some kinds are *overriding*: while active they replace the actor's goal
//! stack with a single override goal (see [`crate::interrupt`]). The rest
//! only modify stats (speed, armor).

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::ActorId;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Goal overrides
    // ========================================================================
    /// Stumbles around at random, attacking whatever it bumps into.
    Confused,

    /// Runs from the source of the fear.
    Frightened,

    /// Follows the charmer and fights on its side.
    Charmed,

    // ========================================================================
    // Stat modifiers
    // ========================================================================
    /// Acts faster.
    Hasted,

    /// Acts slower.
    Slowed,

    /// Bonus armor.
    Shielded,
}

impl StatusKind {
    /// Returns true if this status replaces the goal stack while active.
    pub const fn overrides_goals(self) -> bool {
        matches!(
            self,
            StatusKind::Confused | StatusKind::Frightened | StatusKind::Charmed
        )
    }

    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// A single status effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Acting turns left before the effect expires.
    pub remaining: u32,
    /// Actor that inflicted the effect, if any.
    pub source: Option<ActorId>,
    /// Order of application, used to find the most recent override.
    pub applied_seq: u64,
}

/// Result of adding a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusAdd {
    /// The effect was not active before.
    Added,
    /// The effect was already active; duration now holds the longer of both.
    Refreshed,
    /// No free slot was left.
    Rejected,
}

/// Active status effects on an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
    next_seq: u64,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn remaining(&self, kind: StatusKind) -> Option<u32> {
        self.get(kind).map(|e| e.remaining)
    }

    /// Adds a status effect.
    ///
    /// If the effect already exists its duration is extended to the longer
    /// of the two and its source is kept; stacking never creates a second
    /// entry of the same kind.
    pub fn add(&mut self, kind: StatusKind, duration: u32, source: Option<ActorId>) -> StatusAdd {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            return StatusAdd::Refreshed;
        }

        if self.effects.is_full() {
            return StatusAdd::Rejected;
        }

        self.next_seq += 1;
        self.effects.push(StatusEffect {
            kind,
            remaining: duration,
            source,
            applied_seq: self.next_seq,
        });
        StatusAdd::Added
    }

    /// Removes a status effect immediately. Returns true if it was present.
    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before != self.effects.len()
    }

    /// Decrements every duration by one turn and returns the kinds that ran
    /// out, in application order.
    pub fn tick(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        expired
    }

    /// The most recently applied goal-overriding effect, if any.
    pub fn latest_override(&self) -> Option<&StatusEffect> {
        self.effects
            .iter()
            .filter(|e| e.kind.overrides_goals())
            .max_by_key(|e| e.applied_seq)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_adding_extends_instead_of_duplicating() {
        let mut statuses = StatusEffects::empty();
        assert_eq!(statuses.add(StatusKind::Confused, 2, None), StatusAdd::Added);
        assert_eq!(statuses.add(StatusKind::Confused, 5, None), StatusAdd::Refreshed);
        assert_eq!(statuses.add(StatusKind::Confused, 1, None), StatusAdd::Refreshed);

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.remaining(StatusKind::Confused), Some(5));
    }

    #[test]
    fn tick_reports_and_drops_expired_effects() {
        let mut statuses = StatusEffects::empty();
        statuses.add(StatusKind::Hasted, 1, None);
        statuses.add(StatusKind::Slowed, 3, None);

        assert_eq!(statuses.tick(), vec![StatusKind::Hasted]);
        assert!(!statuses.has(StatusKind::Hasted));
        assert_eq!(statuses.remaining(StatusKind::Slowed), Some(2));
    }

    #[test]
    fn latest_override_ignores_stat_modifiers() {
        let mut statuses = StatusEffects::empty();
        statuses.add(StatusKind::Frightened, 4, None);
        statuses.add(StatusKind::Confused, 4, None);
        statuses.add(StatusKind::Shielded, 4, None);

        let latest = statuses.latest_override().map(|e| e.kind);
        assert_eq!(latest, Some(StatusKind::Confused));
    }

    #[test]
    fn rejects_when_full() {
        let mut statuses = StatusEffects::empty();
        // Only six kinds exist, so fill the remaining slots by hand.
        for _ in 0..GameConfig::MAX_STATUS_EFFECTS {
            statuses.effects.push(StatusEffect {
                kind: StatusKind::Hasted,
                remaining: 1,
                source: None,
                applied_seq: 0,
            });
        }
        assert_eq!(statuses.add(StatusKind::Slowed, 2, None), StatusAdd::Rejected);
    }
}
