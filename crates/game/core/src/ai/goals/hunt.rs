use super::PathTo;
use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::{ActorId, Position};

/// Chases a hostile and attacks it.
///
/// Melee when adjacent, shoots when a ranged attack reaches, otherwise
/// delegates a few steps of walking to [`PathTo`]. Once the target is out
/// of sight the hunter heads for the last place it saw it and gives up
/// after a while.
#[derive(Clone, Debug)]
pub struct Hunt {
    target: ActorId,
    last_seen: Position,
    patience: u32,
}

impl Hunt {
    const PATIENCE: u32 = 10;

    pub fn new(target: ActorId, seen_at: Position) -> Self {
        Self {
            target,
            last_seen: seen_at,
            patience: Self::PATIENCE,
        }
    }

    pub fn target(&self) -> ActorId {
        self.target
    }
}

impl Goal for Hunt {
    fn name(&self) -> &'static str {
        "hunt"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        let Some(target) = ctx.world.actor(self.target).filter(|a| a.alive) else {
            return true;
        };
        if !ctx.actor.is_hostile_to(target) || self.patience == 0 {
            return true;
        }
        // Lost sight and already searched where it was last seen.
        ctx.visible_actor(self.target).is_none()
            && ctx.actor.position.distance(self.last_seen) <= 1
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        let actor = ctx.actor;
        let budget = ctx.config.path_step_budget;

        let Some(target) = ctx.visible_actor(self.target) else {
            self.patience = self.patience.saturating_sub(1);
            return Decision::push(PathTo::adjacent(self.last_seen, budget));
        };
        self.last_seen = target.position;
        self.patience = Self::PATIENCE;

        let distance = actor.position.distance(target.position);
        if distance == 1
            && let Some(attack) = actor.melee_attack()
        {
            return Action::Attack {
                target: target.id,
                attack,
            }
            .into();
        }
        if let Some((attack, weapon)) = actor.ranged_attack()
            && weapon.ranged.as_ref().is_some_and(|r| distance <= r.range)
        {
            return Action::Fire {
                target: target.id,
                attack,
            }
            .into();
        }
        Decision::push(PathTo::adjacent(target.position, budget))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::testing::Arena;
    use super::*;
    use crate::registry::Archetype;
    use crate::state::{Attack, Faction};

    fn hero(arena: &mut Arena, at: Position) -> ActorId {
        arena.spawn(&Archetype::new("hero").with_faction(Faction::Player), at)
    }

    #[test]
    fn attacks_adjacent_target() {
        let mut arena = Arena::new(5, 5);
        let orc = arena.spawn(
            &Archetype::new("orc").with_attack(Attack::melee("axe", 4)),
            Position::new(1, 1),
        );
        let target = hero(&mut arena, Position::new(2, 1));
        let ctx = arena.context(orc, 0);
        assert!(matches!(
            Hunt::new(target, Position::new(2, 1)).take_action(&ctx),
            Decision::Act(Action::Attack { attack: 0, .. })
        ));
    }

    #[test]
    fn shoots_when_in_range_and_paths_otherwise() {
        let mut arena = Arena::new(12, 3);
        let archer = arena.spawn(
            &Archetype::new("archer")
                .with_attack(Attack::melee("knife", 1))
                .with_attack(Attack::ranged("bow", 3, 4, Duration::from_millis(500))),
            Position::new(0, 1),
        );
        let target = hero(&mut arena, Position::new(3, 1));
        let ctx = arena.context(archer, 0);
        let mut goal = Hunt::new(target, Position::new(3, 1));
        assert!(matches!(
            goal.take_action(&ctx),
            Decision::Act(Action::Fire { attack: 1, .. })
        ));

        arena.world.actor_mut(target).unwrap().position = Position::new(8, 1);
        let ctx = arena.context(archer, 0);
        match goal.take_action(&ctx) {
            Decision::Push(sub) => assert_eq!(sub.name(), "path-to"),
            other => panic!("expected a path-to push, got {other:?}"),
        }
    }

    #[test]
    fn finishes_when_target_dies() {
        let mut arena = Arena::new(5, 5);
        let orc = arena.spawn(
            &Archetype::new("orc").with_attack(Attack::melee("axe", 4)),
            Position::new(0, 0),
        );
        let target = hero(&mut arena, Position::new(3, 3));
        let goal = Hunt::new(target, Position::new(3, 3));
        assert!(!goal.is_finished(&arena.context(orc, 0)));

        arena.world.actor_mut(target).unwrap().alive = false;
        assert!(goal.is_finished(&arena.context(orc, 0)));
    }
}
