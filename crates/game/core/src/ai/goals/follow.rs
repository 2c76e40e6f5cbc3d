use super::PathTo;
use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::ActorId;

/// Stays within follow distance of a leader and fights hostiles that come
/// adjacent.
///
/// The persistent form is the Charmed override: it keeps following until
/// the status ends, even if the leader is gone.
#[derive(Clone, Debug)]
pub struct FollowLeader {
    leader: ActorId,
    persistent: bool,
}

impl FollowLeader {
    pub fn new(leader: ActorId) -> Self {
        Self {
            leader,
            persistent: false,
        }
    }

    pub fn persistent(leader: ActorId) -> Self {
        Self {
            leader,
            persistent: true,
        }
    }
}

impl Goal for FollowLeader {
    fn name(&self) -> &'static str {
        "follow-leader"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        if self.persistent {
            return false;
        }
        !ctx.world.is_valid(self.leader) || ctx.nearest_hostile().is_some()
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        if let (Some(target), Some(attack)) = (ctx.adjacent_hostile(), ctx.actor.melee_attack()) {
            return Action::Attack {
                target: target.id,
                attack,
            }
            .into();
        }

        let Some(leader) = ctx.world.actor(self.leader).filter(|a| a.alive) else {
            return Decision::wait();
        };
        if ctx.actor.position.distance(leader.position) > ctx.config.follow_distance {
            return Decision::push(PathTo::adjacent(
                leader.position,
                ctx.config.path_step_budget,
            ));
        }
        Decision::wait()
    }
}
