use crate::action::Action;
use crate::ai::{AiContext, Decision, Goal};
use crate::state::Position;

/// Drinks a consumable from an inventory slot.
#[derive(Clone, Debug)]
pub struct UseItem {
    slot: usize,
    used: bool,
}

impl UseItem {
    pub fn new(slot: usize) -> Self {
        Self { slot, used: false }
    }
}

impl Goal for UseItem {
    fn name(&self) -> &'static str {
        "use-item"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        self.used || self.slot >= ctx.actor.consumables.len()
    }

    fn take_action(&mut self, _ctx: &AiContext<'_>) -> Decision {
        self.used = true;
        Action::UseItem { slot: self.slot }.into()
    }
}

/// Walks to a floor item and picks it up.
#[derive(Clone, Debug)]
pub struct PickUp {
    at: Position,
    abandoned: bool,
}

impl PickUp {
    pub fn new(at: Position) -> Self {
        Self {
            at,
            abandoned: false,
        }
    }
}

impl Goal for PickUp {
    fn name(&self) -> &'static str {
        "pick-up"
    }

    fn is_finished(&self, ctx: &AiContext<'_>) -> bool {
        self.abandoned || ctx.world.item_at(self.at).is_none()
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        if ctx.actor.position == self.at {
            return Action::PickUp.into();
        }
        match ctx.step_toward(self.at) {
            Some(dir) => Action::Move(dir).into(),
            None => {
                self.abandoned = true;
                Decision::wait()
            }
        }
    }
}
