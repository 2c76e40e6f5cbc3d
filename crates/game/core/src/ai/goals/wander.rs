use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};

/// Aimless random walk for a fixed number of steps.
#[derive(Clone, Debug)]
pub struct Wander {
    remaining: u32,
}

impl Wander {
    const SALT: u32 = 0x57;

    pub fn new(steps: u32) -> Self {
        Self { remaining: steps }
    }
}

impl Goal for Wander {
    fn name(&self) -> &'static str {
        "wander"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        self.remaining == 0 || ctx.nearest_hostile().is_some()
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        self.remaining = self.remaining.saturating_sub(1);
        match ctx.random_step(Self::SALT) {
            Some(dir) => Action::Move(dir).into(),
            None => Decision::wait(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Arena;
    use super::*;
    use crate::registry::Archetype;
    use crate::state::Position;

    #[test]
    fn walks_then_finishes() {
        let mut arena = Arena::new(5, 5);
        let moth = arena.spawn(&Archetype::new("moth"), Position::new(2, 2));
        let ctx = arena.context(moth, 3);

        let mut goal = Wander::new(2);
        assert!(matches!(goal.take_action(&ctx), Decision::Act(Action::Move(_))));
        assert!(!goal.is_finished(&ctx));
        goal.take_action(&ctx);
        assert!(goal.is_finished(&ctx));
    }

    #[test]
    fn boxed_in_wanderer_waits() {
        let mut arena = Arena::new(1, 1);
        let moth = arena.spawn(&Archetype::new("moth"), Position::new(0, 0));
        let ctx = arena.context(moth, 3);
        assert!(matches!(
            Wander::new(3).take_action(&ctx),
            Decision::Act(Action::Wait)
        ));
    }
}
