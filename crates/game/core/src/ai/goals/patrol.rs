use super::PathTo;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::Position;

/// Cycles through a route of waypoints until a hostile shows up.
#[derive(Clone, Debug)]
pub struct Patrol {
    route: Vec<Position>,
    next: usize,
}

impl Patrol {
    pub fn new(route: Vec<Position>) -> Self {
        Self { route, next: 0 }
    }
}

impl Goal for Patrol {
    fn name(&self) -> &'static str {
        "patrol"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        self.route.is_empty() || ctx.nearest_hostile().is_some()
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        let here = ctx.actor.position;
        if self.route.get(self.next) == Some(&here) {
            self.next = (self.next + 1) % self.route.len();
        }
        match self.route.get(self.next) {
            Some(waypoint) if *waypoint != here => {
                Decision::push(PathTo::new(*waypoint, ctx.config.path_step_budget))
            }
            _ => Decision::wait(),
        }
    }
}
