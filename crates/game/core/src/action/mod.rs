//! Actions an actor can take on its turn.
//!
//! An [`Action`] is a plain value produced either by the player's input or
//! by a goal. Before anything is applied the engine runs
//! [`pre_validate`], which rejects impossible actions and normalizes
//! bump-to-attack moves. [`ActionCostModel`] prices the validated action.
mod cost;
mod validate;

pub use cost::ActionCostModel;
pub use validate::pre_validate;

use crate::state::{ActorId, Direction, Position};

/// A concrete decision for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    /// Pass the turn.
    Wait,
    /// Step to an adjacent tile. Moving into a hostile attacks it.
    Move(Direction),
    /// Melee attack against an adjacent actor.
    Attack { target: ActorId, attack: usize },
    /// Ranged attack resolved when the projectile lands.
    Fire { target: ActorId, attack: usize },
    /// Consume the item in an inventory slot.
    UseItem { slot: usize },
    /// Pick up the item lying on the actor's tile.
    PickUp,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Wait => ActionKind::Wait,
            Action::Move(_) => ActionKind::Move,
            Action::Attack { .. } => ActionKind::Attack,
            Action::Fire { .. } => ActionKind::Fire,
            Action::UseItem { .. } => ActionKind::UseItem,
            Action::PickUp => ActionKind::PickUp,
        }
    }

    /// Actor this action is aimed at, if any.
    pub fn target(&self) -> Option<ActorId> {
        match self {
            Action::Attack { target, .. } | Action::Fire { target, .. } => Some(*target),
            _ => None,
        }
    }
}

/// Types of actions, used for pricing and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Wait,
    Move,
    Attack,
    Fire,
    UseItem,
    PickUp,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Reasons an action cannot be performed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("actor {0} does not exist or is dead")]
    InvalidActor(ActorId),

    #[error("target {0} does not exist or is dead")]
    InvalidTarget(ActorId),

    #[error("actor cannot target itself")]
    SelfTarget,

    #[error("tile {0} is blocked")]
    Blocked(Position),

    #[error("attack slot {0} does not exist")]
    NoSuchAttack(usize),

    #[error("attack slot {index} cannot be used for {kind}")]
    WrongAttackKind { index: usize, kind: ActionKind },

    #[error("target {0} is not adjacent")]
    NotAdjacent(ActorId),

    #[error("target {target} is {distance} tiles away, range is {range}")]
    OutOfRange {
        target: ActorId,
        distance: u32,
        range: u32,
    },

    #[error("target {0} is not in sight")]
    NotVisible(ActorId),

    #[error("inventory slot {0} is empty")]
    NoSuchItem(usize),

    #[error("nothing to pick up at {0}")]
    NothingToPickUp(Position),

    #[error("inventory is full")]
    InventoryFull,
}
