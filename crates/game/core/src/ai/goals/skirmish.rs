use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::ActorId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Shoot,
    Scoot,
}

/// Kiting: shoot, then back off a step while the target is close.
#[derive(Clone, Debug)]
pub struct ShootAndScoot {
    target: ActorId,
    phase: Phase,
}

impl ShootAndScoot {
    pub fn new(target: ActorId) -> Self {
        Self {
            target,
            phase: Phase::Shoot,
        }
    }
}

impl Goal for ShootAndScoot {
    fn name(&self) -> &'static str {
        "shoot-and-scoot"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        ctx.actor.ranged_attack().is_none()
            || !ctx
                .visible_actor(self.target)
                .is_some_and(|target| ctx.actor.is_hostile_to(target))
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        let (Some(target), Some((attack, weapon))) =
            (ctx.visible_actor(self.target), ctx.actor.ranged_attack())
        else {
            return Decision::wait();
        };
        let distance = ctx.actor.position.distance(target.position);
        let range = weapon.ranged.as_ref().map_or(0, |r| r.range);

        if self.phase == Phase::Scoot {
            self.phase = Phase::Shoot;
            if distance < ctx.config.skirmish_distance
                && let Some(dir) = ctx.step_away_from(target.position)
            {
                return Action::Move(dir).into();
            }
        }

        if distance <= range {
            self.phase = Phase::Scoot;
            return Action::Fire {
                target: target.id,
                attack,
            }
            .into();
        }
        match ctx.step_toward(target.position) {
            Some(dir) => Action::Move(dir).into(),
            None => Decision::wait(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::testing::Arena;
    use super::*;
    use crate::registry::Archetype;
    use crate::state::{Attack, Direction, Faction, Position};

    #[test]
    fn alternates_between_firing_and_retreating() {
        let mut arena = Arena::new(10, 1);
        let kiter = arena.spawn(
            &Archetype::new("kiter").with_attack(Attack::ranged(
                "sling",
                2,
                5,
                Duration::from_millis(300),
            )),
            Position::new(4, 0),
        );
        let hero = arena.spawn(
            &Archetype::new("hero").with_faction(Faction::Player),
            Position::new(2, 0),
        );
        let mut goal = ShootAndScoot::new(hero);

        let ctx = arena.context(kiter, 0);
        assert!(matches!(
            goal.take_action(&ctx),
            Decision::Act(Action::Fire { attack: 0, .. })
        ));
        assert!(matches!(
            goal.take_action(&ctx),
            Decision::Act(Action::Move(Direction::East))
        ));
        assert!(!goal.is_finished(&ctx));
    }
}
