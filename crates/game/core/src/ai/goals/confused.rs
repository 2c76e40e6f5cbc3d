use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::Direction;

/// Override goal of the Confused status.
///
/// Staggers in a random direction every turn and attacks whoever stands
/// there, friend or foe. Never finishes by itself; the interrupt controller
/// removes it when the status ends.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConfusedWander;

impl ConfusedWander {
    const SALT: u32 = 0xC0;
}

impl Goal for ConfusedWander {
    fn name(&self) -> &'static str {
        "confused-wander"
    }

    fn is_finished(&self, _ctx: &AiContext<'_>) -> bool {
        false
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        let dir = Direction::ALL[ctx.pick(Self::SALT, Direction::ALL.len())];
        let destination = ctx.actor.position.step(dir);

        if let Some(victim) = ctx.world.actor_at(destination) {
            return match ctx.actor.melee_attack() {
                Some(attack) => Action::Attack {
                    target: victim.id,
                    attack,
                }
                .into(),
                None => Decision::wait(),
            };
        }
        if ctx.is_walkable(destination) {
            Action::Move(dir).into()
        } else {
            Decision::wait()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Arena;
    use super::*;
    use crate::registry::Archetype;
    use crate::state::{Attack, Position};

    #[test]
    fn always_produces_an_action() {
        let mut arena = Arena::new(3, 3);
        let drunk = arena.spawn(
            &Archetype::new("drunk").with_attack(Attack::melee("bottle", 1)),
            Position::new(1, 1),
        );
        let friend = arena.spawn(&Archetype::new("friend"), Position::new(0, 0));

        let mut goal = ConfusedWander;
        for seed in 0..32 {
            let ctx = arena.context(drunk, seed);
            assert!(!goal.is_finished(&ctx));
            match goal.take_action(&ctx) {
                Decision::Act(Action::Attack { target, .. }) => assert_eq!(target, friend),
                Decision::Act(Action::Move(_) | Action::Wait) => {}
                other => panic!("unexpected decision {other:?}"),
            }
        }
    }
}
