use crate::state::{ActorState, Position};

/// Pathfinding oracle consumed by movement goals.
pub trait PathOracle: Send + Sync {
    /// Ordered steps from the actor's position to `target`, excluding the
    /// starting tile. `None` if the target cannot be reached. Only terrain is
    /// considered; callers check each step for occupants.
    fn path_to(&self, actor: &ActorState, target: Position) -> Option<Vec<Position>>;
}
