//! Goal catalog.
//!
//! Every goal implements the two-method [`super::Goal`] contract. Adding a
//! behavior means adding a goal here and a branch in [`Bored`]; existing
//! goals never change.
mod bored;
mod confused;
mod flee;
mod follow;
mod hunt;
mod items;
mod path_to;
mod patrol;
mod skirmish;
mod wander;

pub use bored::Bored;
pub use confused::ConfusedWander;
pub use flee::Flee;
pub use follow::FollowLeader;
pub use hunt::Hunt;
pub use items::{PickUp, UseItem};
pub use path_to::PathTo;
pub use patrol::Patrol;
pub use skirmish::ShootAndScoot;
pub use wander::Wander;

#[cfg(test)]
pub(crate) mod testing {
    use crate::ai::AiContext;
    use crate::config::GameConfig;
    use crate::env::{Env, GridMap, PcgRng};
    use crate::registry::Archetype;
    use crate::state::{ActorId, ActorState, Position, World};

    /// Small arena for exercising single goals.
    pub struct Arena {
        pub world: World,
        pub map: GridMap,
        pub config: GameConfig,
    }

    impl Arena {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                world: World::new(),
                map: GridMap::open(width, height),
                config: GameConfig::default(),
            }
        }

        pub fn spawn(&mut self, archetype: &Archetype, at: Position) -> ActorId {
            let id = self.world.allocate_id();
            let actor = ActorState::from_archetype(id, archetype, at);
            self.world
                .insert(actor, Some(crate::ai::GoalStack::new()))
                .unwrap();
            id
        }

        pub fn context(&self, id: ActorId, seed: u64) -> AiContext<'_> {
            let actor = self.world.actor(id).unwrap();
            AiContext::new(
                actor,
                &self.world,
                Env::with_grid(&self.map, &PcgRng),
                &self.config,
                seed,
            )
        }
    }
}
