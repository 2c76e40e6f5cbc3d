use std::collections::BTreeSet;

use crate::state::{ActorState, Position};

/// Line-of-sight oracle consumed by goals to sense the world.
pub trait VisionOracle: Send + Sync {
    /// Tiles the actor currently sees, including its own.
    fn visible_tiles(&self, viewer: &ActorState) -> BTreeSet<Position>;

    fn can_see(&self, viewer: &ActorState, target: Position) -> bool {
        self.visible_tiles(viewer).contains(&target)
    }
}
