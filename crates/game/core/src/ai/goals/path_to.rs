use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::Position;

/// Walks toward a destination for a bounded number of steps, then hands
/// control back so the parent can re-plan.
#[derive(Clone, Debug)]
pub struct PathTo {
    destination: Position,
    steps_left: u32,
    /// Stop next to the destination instead of on it.
    adjacent_ok: bool,
}

impl PathTo {
    pub fn new(destination: Position, steps: u32) -> Self {
        Self {
            destination,
            steps_left: steps,
            adjacent_ok: false,
        }
    }

    pub fn adjacent(destination: Position, steps: u32) -> Self {
        Self {
            adjacent_ok: true,
            ..Self::new(destination, steps)
        }
    }

    fn arrived(&self, at: Position) -> bool {
        at == self.destination || (self.adjacent_ok && at.is_adjacent(self.destination))
    }
}

impl Goal for PathTo {
    fn name(&self) -> &'static str {
        "path-to"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        self.steps_left == 0 || self.arrived(ctx.actor.position)
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        match ctx.step_toward(self.destination) {
            Some(dir) => {
                self.steps_left -= 1;
                Action::Move(dir).into()
            }
            None => {
                // Unreachable for now; give up and let the parent decide.
                self.steps_left = 0;
                Decision::wait()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Arena;
    use super::*;
    use crate::registry::Archetype;
    use crate::state::Direction;

    #[test]
    fn steps_along_the_path_until_budget_runs_out() {
        let mut arena = Arena::new(10, 1);
        let scout = arena.spawn(&Archetype::new("scout"), Position::new(0, 0));
        let mut goal = PathTo::new(Position::new(9, 0), 1);

        let ctx = arena.context(scout, 0);
        assert!(matches!(
            goal.take_action(&ctx),
            Decision::Act(Action::Move(Direction::East))
        ));
        assert!(goal.is_finished(&ctx));
    }

    #[test]
    fn adjacent_destination_counts_as_arrival() {
        let mut arena = Arena::new(5, 5);
        let scout = arena.spawn(&Archetype::new("scout"), Position::new(1, 1));
        let ctx = arena.context(scout, 0);
        assert!(PathTo::adjacent(Position::new(2, 2), 3).is_finished(&ctx));
        assert!(!PathTo::new(Position::new(2, 2), 3).is_finished(&ctx));
    }

    #[test]
    fn unreachable_destination_gives_up() {
        let mut arena = Arena::new(5, 5);
        arena.map = crate::env::GridMap::from_rows(&[
            "..#..", //
            "..#..", //
            "..#..",
        ]);
        let scout = arena.spawn(&Archetype::new("scout"), Position::new(0, 0));
        let ctx = arena.context(scout, 0);
        let mut goal = PathTo::new(Position::new(4, 0), 5);
        assert!(matches!(goal.take_action(&ctx), Decision::Act(Action::Wait)));
        assert!(goal.is_finished(&ctx));
    }
}
