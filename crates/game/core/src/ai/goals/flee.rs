use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::{ActorId, ActorState};

/// Runs from a threat, fighting back only when cornered.
///
/// A persistent flee (the Frightened override) never finishes on its own.
/// Without a known threat it runs from the nearest visible hostile.
#[derive(Clone, Debug)]
pub struct Flee {
    threat: Option<ActorId>,
    persistent: bool,
}

impl Flee {
    pub fn persistent(threat: Option<ActorId>) -> Self {
        Self {
            threat,
            persistent: true,
        }
    }

    fn threat<'a>(&self, ctx: &AiContext<'a>) -> Option<&'a ActorState> {
        match self.threat {
            Some(id) => ctx.visible_actor(id),
            None => ctx.nearest_hostile(),
        }
    }
}

impl From<ActorId> for Flee {
    fn from(threat: ActorId) -> Self {
        Self {
            threat: Some(threat),
            persistent: false,
        }
    }
}

impl Goal for Flee {
    fn name(&self) -> &'static str {
        "flee"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        !self.persistent && self.threat(ctx).is_none()
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        let Some(threat) = self.threat(ctx) else {
            return Decision::wait();
        };
        if let Some(dir) = ctx.step_away_from(threat.position) {
            return Action::Move(dir).into();
        }
        match ctx.actor.melee_attack() {
            Some(attack) if ctx.actor.position.is_adjacent(threat.position) => Action::Attack {
                target: threat.id,
                attack,
            }
            .into(),
            _ => Decision::wait(),
        }
    }
}
