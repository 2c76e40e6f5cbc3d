//! Status-driven goal overrides.
//!
//! Applying an overriding status (Confused, Frightened, Charmed) clears
//! the actor's goal stack and installs exactly `[Bored, override]`. When
//! the status ends the stack is cleared again and falls back to `[Bored]`,
//! or to the goal of another override that is still running. No prior
//! stack is ever saved, so nothing can dangle or be restored twice.
//!
//! Re-applying an active status only extends its timer. If several
//! different overrides are active, the most recently applied one owns the
//! stack.

use crate::ai::goals::{ConfusedWander, Flee, FollowLeader};
use crate::ai::{Goal, GoalStack};
use crate::events::{EventQueue, GameEvent};
use crate::state::{ActorId, ActorState, StatusAdd, StatusEffect, StatusKind, World};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterruptError {
    #[error("actor {0} does not exist or is dead")]
    UnknownActor(ActorId),

    #[error("status duration must be at least one turn")]
    ZeroDuration,

    #[error("{0:?} needs a source actor")]
    MissingSource(StatusKind),

    #[error("actor {0} has no free status slot")]
    NoFreeSlot(ActorId),
}

/// Applies, ticks and removes statuses and keeps goal stacks in sync.
#[derive(Clone, Copy, Debug, Default)]
pub struct InterruptController;

impl InterruptController {
    /// Attaches a status for `duration` of the actor's own turns.
    pub fn apply(
        world: &mut World,
        actor: ActorId,
        kind: StatusKind,
        duration: u32,
        source: Option<ActorId>,
        events: &mut EventQueue,
    ) -> Result<StatusAdd, InterruptError> {
        if duration == 0 {
            return Err(InterruptError::ZeroDuration);
        }
        if kind == StatusKind::Charmed && source.is_none() {
            return Err(InterruptError::MissingSource(kind));
        }
        let (state, mind) = world
            .actor_and_mind_mut(actor)
            .filter(|(state, _)| state.alive)
            .ok_or(InterruptError::UnknownActor(actor))?;

        let outcome = state.statuses.add(kind, duration, source);
        if outcome == StatusAdd::Rejected {
            tracing::warn!("{} has no room for {:?}", actor, kind);
            return Err(InterruptError::NoFreeSlot(actor));
        }

        let remaining = state.statuses.remaining(kind).unwrap_or(duration);
        tracing::debug!("{} {:?}: {:?} for {} turns", actor, outcome, kind, remaining);
        events.push(GameEvent::StatusApplied {
            actor,
            kind,
            remaining,
        });

        if outcome == StatusAdd::Added
            && kind.overrides_goals()
            && let Some(mind) = mind
            && let Some(effect) = state.statuses.get(kind)
        {
            install(mind, effect);
            events.push(GameEvent::IntentChanged {
                actor,
                intent: mind.intent(),
            });
        }
        Ok(outcome)
    }

    /// Counts down one acting turn and handles expirations.
    pub fn tick(world: &mut World, actor: ActorId, events: &mut EventQueue) -> Vec<StatusKind> {
        let Some((state, mind)) = world.actor_and_mind_mut(actor) else {
            return Vec::new();
        };
        let expired = state.statuses.tick();
        if expired.is_empty() {
            return expired;
        }

        for kind in &expired {
            tracing::debug!("{} is no longer {:?}", actor, kind);
            events.push(GameEvent::StatusExpired { actor, kind: *kind });
        }
        if let Some(mind) = mind
            && settle(state, mind)
        {
            events.push(GameEvent::IntentChanged {
                actor,
                intent: mind.intent(),
            });
        }
        expired
    }

    /// Ends a status early. Returns false if it was not active.
    pub fn remove(
        world: &mut World,
        actor: ActorId,
        kind: StatusKind,
        events: &mut EventQueue,
    ) -> Result<bool, InterruptError> {
        let (state, mind) = world
            .actor_and_mind_mut(actor)
            .ok_or(InterruptError::UnknownActor(actor))?;
        if !state.statuses.remove(kind) {
            return Ok(false);
        }

        events.push(GameEvent::StatusExpired { actor, kind });
        if let Some(mind) = mind
            && settle(state, mind)
        {
            events.push(GameEvent::IntentChanged {
                actor,
                intent: mind.intent(),
            });
        }
        Ok(true)
    }

    /// Re-installs the owning override after a stack was reset for another
    /// reason, such as an AI fault.
    pub fn reinstall(world: &mut World, actor: ActorId) {
        if let Some((state, Some(mind))) = world.actor_and_mind_mut(actor)
            && mind.override_kind().is_none()
            && let Some(effect) = state.statuses.latest_override()
        {
            install(mind, effect);
        }
    }
}

fn override_goal(effect: &StatusEffect) -> Option<Box<dyn Goal>> {
    match effect.kind {
        StatusKind::Confused => Some(Box::new(ConfusedWander)),
        StatusKind::Frightened => Some(Box::new(Flee::persistent(effect.source))),
        StatusKind::Charmed => effect
            .source
            .map(|leader| Box::new(FollowLeader::persistent(leader)) as Box<dyn Goal>),
        StatusKind::Hasted | StatusKind::Slowed | StatusKind::Shielded => None,
    }
}

fn install(mind: &mut GoalStack, effect: &StatusEffect) {
    match override_goal(effect) {
        Some(goal) => mind.reset_with_override(effect.kind, goal),
        None => mind.reset(),
    }
}

/// Drops an override whose status is gone. Returns true if the stack
/// changed.
fn settle(state: &ActorState, mind: &mut GoalStack) -> bool {
    let Some(owner) = mind.override_kind() else {
        return false;
    };
    if state.statuses.has(owner) {
        return false;
    }
    match state.statuses.latest_override() {
        Some(next) => install(mind, next),
        None => mind.reset(),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::goals::Wander;
    use crate::registry::Archetype;
    use crate::state::Position;

    fn setup() -> (World, ActorId, EventQueue) {
        let mut world = World::new();
        let id = world.allocate_id();
        let actor = ActorState::from_archetype(id, &Archetype::new("imp"), Position::ORIGIN);
        world.insert(actor, Some(GoalStack::new())).unwrap();
        (world, id, EventQueue::new())
    }

    fn labels(world: &World, id: ActorId) -> Vec<&'static str> {
        world.mind(id).unwrap().labels()
    }

    #[test]
    fn apply_then_remove_restores_the_fallback() {
        let (mut world, imp, mut events) = setup();
        let mind = world.mind_mut(imp).unwrap();
        mind.push(Box::new(Wander::new(3)));
        mind.push(Box::new(Wander::new(2)));

        InterruptController::apply(&mut world, imp, StatusKind::Confused, 5, None, &mut events)
            .unwrap();
        assert_eq!(labels(&world, imp), vec!["bored", "confused-wander"]);

        assert!(InterruptController::remove(&mut world, imp, StatusKind::Confused, &mut events).unwrap());
        assert_eq!(labels(&world, imp), vec!["bored"]);
        assert_eq!(world.mind(imp).unwrap().override_kind(), None);
    }

    #[test]
    fn reapplying_refreshes_without_nesting() {
        let (mut world, imp, mut events) = setup();
        InterruptController::apply(&mut world, imp, StatusKind::Confused, 2, None, &mut events)
            .unwrap();
        let again =
            InterruptController::apply(&mut world, imp, StatusKind::Confused, 6, None, &mut events)
                .unwrap();

        assert_eq!(again, StatusAdd::Refreshed);
        assert_eq!(labels(&world, imp), vec!["bored", "confused-wander"]);
        let state = world.actor(imp).unwrap();
        assert_eq!(state.statuses.remaining(StatusKind::Confused), Some(6));
    }

    #[test]
    fn expiry_hands_the_stack_to_the_remaining_override() {
        let (mut world, imp, mut events) = setup();
        InterruptController::apply(&mut world, imp, StatusKind::Frightened, 5, None, &mut events)
            .unwrap();
        InterruptController::apply(&mut world, imp, StatusKind::Confused, 1, None, &mut events)
            .unwrap();
        assert_eq!(labels(&world, imp), vec!["bored", "confused-wander"]);

        let expired = InterruptController::tick(&mut world, imp, &mut events);
        assert_eq!(expired, vec![StatusKind::Confused]);
        assert_eq!(labels(&world, imp), vec!["bored", "flee"]);
        assert_eq!(
            world.mind(imp).unwrap().override_kind(),
            Some(StatusKind::Frightened)
        );
    }

    #[test]
    fn removing_a_shadowed_override_keeps_the_owner() {
        let (mut world, imp, mut events) = setup();
        InterruptController::apply(&mut world, imp, StatusKind::Frightened, 5, None, &mut events)
            .unwrap();
        InterruptController::apply(&mut world, imp, StatusKind::Confused, 5, None, &mut events)
            .unwrap();
        InterruptController::remove(&mut world, imp, StatusKind::Frightened, &mut events).unwrap();
        assert_eq!(labels(&world, imp), vec!["bored", "confused-wander"]);
    }

    #[test]
    fn modifiers_leave_the_stack_alone() {
        let (mut world, imp, mut events) = setup();
        InterruptController::apply(&mut world, imp, StatusKind::Hasted, 3, None, &mut events)
            .unwrap();
        assert_eq!(labels(&world, imp), vec!["bored"]);
    }

    #[test]
    fn rejects_bad_requests() {
        let (mut world, imp, mut events) = setup();
        assert_eq!(
            InterruptController::apply(&mut world, imp, StatusKind::Confused, 0, None, &mut events),
            Err(InterruptError::ZeroDuration)
        );
        assert_eq!(
            InterruptController::apply(&mut world, imp, StatusKind::Charmed, 3, None, &mut events),
            Err(InterruptError::MissingSource(StatusKind::Charmed))
        );
        assert_eq!(
            InterruptController::apply(
                &mut world,
                ActorId(99),
                StatusKind::Confused,
                3,
                None,
                &mut events
            ),
            Err(InterruptError::UnknownActor(ActorId(99)))
        );
    }
}
