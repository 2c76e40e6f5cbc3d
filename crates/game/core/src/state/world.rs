use std::collections::BTreeMap;

use super::{ActorId, ActorState, Consumable, Position};
use crate::ai::GoalStack;

/// Errors raised by world bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("actor {0} already exists")]
    DuplicateActor(ActorId),

    #[error("actor {0} does not exist")]
    UnknownActor(ActorId),

    #[error("position {position} is already occupied by actor {occupant}")]
    PositionOccupied {
        position: Position,
        occupant: ActorId,
    },

    #[error("a player is already present")]
    PlayerAlreadyPresent,
}

/// Every actor, mind and floor item of the running level.
///
/// Actor ids are allocated monotonically and never reused, so a reference
/// frozen at some earlier point can always be re-validated with
/// [`World::is_valid`].
#[derive(Debug, Default)]
pub struct World {
    actors: BTreeMap<ActorId, ActorState>,
    minds: BTreeMap<ActorId, GoalStack>,
    items: BTreeMap<Position, Consumable>,
    player: Option<ActorId>,
    player_spawned: bool,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: ActorId::PLAYER.0 + 1,
            ..Self::default()
        }
    }

    /// Reserves a fresh non-player id.
    pub fn allocate_id(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Reserves an id for a player character. The first player of a session
    /// gets [`ActorId::PLAYER`]; a player spawned after that one is gone
    /// gets a fresh id so references to the old one stay invalid.
    pub fn allocate_player_id(&mut self) -> ActorId {
        if self.player_spawned {
            return self.allocate_id();
        }
        self.player_spawned = true;
        ActorId::PLAYER
    }

    /// Inserts an AI actor together with its mind.
    pub fn insert(&mut self, actor: ActorState, mind: Option<GoalStack>) -> Result<(), WorldError> {
        self.admit(&actor)?;
        let id = actor.id;
        if let Some(mind) = mind {
            self.minds.insert(id, mind);
        }
        self.actors.insert(id, actor);
        Ok(())
    }

    /// Inserts the player character. Only one player may be present.
    pub fn insert_player(&mut self, actor: ActorState) -> Result<(), WorldError> {
        if self.player.is_some() {
            return Err(WorldError::PlayerAlreadyPresent);
        }
        self.admit(&actor)?;
        self.player = Some(actor.id);
        self.actors.insert(actor.id, actor);
        Ok(())
    }

    fn admit(&self, actor: &ActorState) -> Result<(), WorldError> {
        if self.actors.contains_key(&actor.id) {
            return Err(WorldError::DuplicateActor(actor.id));
        }
        if let Some(occupant) = self.actor_at(actor.position) {
            return Err(WorldError::PositionOccupied {
                position: actor.position,
                occupant: occupant.id,
            });
        }
        Ok(())
    }

    /// Removes an actor and its mind entirely.
    pub fn remove(&mut self, id: ActorId) -> Option<ActorState> {
        self.minds.remove(&id);
        if self.player == Some(id) {
            self.player = None;
        }
        self.actors.remove(&id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    /// True if the actor exists and is alive.
    pub fn is_valid(&self, id: ActorId) -> bool {
        self.actors.get(&id).is_some_and(|a| a.alive)
    }

    /// Living actor standing on a tile.
    pub fn actor_at(&self, position: Position) -> Option<&ActorState> {
        self.actors
            .values()
            .find(|a| a.alive && a.position == position)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values()
    }

    pub fn living(&self) -> impl Iterator<Item = &ActorState> {
        self.actors.values().filter(|a| a.alive)
    }

    pub fn player(&self) -> Option<ActorId> {
        self.player
    }

    pub fn mind(&self, id: ActorId) -> Option<&GoalStack> {
        self.minds.get(&id)
    }

    pub fn mind_mut(&mut self, id: ActorId) -> Option<&mut GoalStack> {
        self.minds.get_mut(&id)
    }

    /// Actor state and mind borrowed together for status bookkeeping.
    pub fn actor_and_mind_mut(
        &mut self,
        id: ActorId,
    ) -> Option<(&mut ActorState, Option<&mut GoalStack>)> {
        let actor = self.actors.get_mut(&id)?;
        Some((actor, self.minds.get_mut(&id)))
    }

    /// Detaches a mind so it can be evaluated against a shared world.
    pub fn take_mind(&mut self, id: ActorId) -> Option<GoalStack> {
        self.minds.remove(&id)
    }

    /// Puts a detached mind back. Minds of actors that died meanwhile are
    /// dropped.
    pub fn restore_mind(&mut self, id: ActorId, mind: GoalStack) {
        if self.is_valid(id) {
            self.minds.insert(id, mind);
        }
    }

    pub fn drop_mind(&mut self, id: ActorId) -> bool {
        self.minds.remove(&id).is_some()
    }

    pub fn item_at(&self, position: Position) -> Option<&Consumable> {
        self.items.get(&position)
    }

    pub fn items(&self) -> impl Iterator<Item = (&Position, &Consumable)> {
        self.items.iter()
    }

    /// Places an item, returning whatever was lying there before.
    pub fn place_item(&mut self, position: Position, item: Consumable) -> Option<Consumable> {
        self.items.insert(position, item)
    }

    pub fn take_item(&mut self, position: Position) -> Option<Consumable> {
        self.items.remove(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Archetype;

    fn goblin(world: &mut World, at: Position) -> ActorId {
        let id = world.allocate_id();
        let actor = ActorState::from_archetype(id, &Archetype::new("goblin"), at);
        world.insert(actor, Some(GoalStack::new())).unwrap();
        id
    }

    #[test]
    fn ids_are_never_reused() {
        let mut world = World::new();
        let a = goblin(&mut world, Position::new(1, 1));
        world.remove(a);
        let b = goblin(&mut world, Position::new(1, 1));
        assert_ne!(a, b);
        assert!(!world.is_valid(a));
        assert!(world.is_valid(b));
    }

    #[test]
    fn a_second_player_gets_a_fresh_id() {
        let mut world = World::new();
        let hero = Archetype::new("hero");
        let first = world.allocate_player_id();
        world
            .insert_player(ActorState::from_archetype(first, &hero, Position::new(1, 1)))
            .unwrap();
        assert_eq!(first, ActorId::PLAYER);

        let blocked = world.allocate_player_id();
        assert_eq!(
            world.insert_player(ActorState::from_archetype(blocked, &hero, Position::new(2, 2))),
            Err(WorldError::PlayerAlreadyPresent)
        );

        world.remove(first);
        let second = world.allocate_player_id();
        world
            .insert_player(ActorState::from_archetype(second, &hero, Position::new(1, 1)))
            .unwrap();
        assert_ne!(second, ActorId::PLAYER);
        assert_eq!(world.player(), Some(second));
        assert!(!world.is_valid(first));
    }

    #[test]
    fn rejects_stacked_actors() {
        let mut world = World::new();
        let first = goblin(&mut world, Position::new(2, 2));
        let id = world.allocate_id();
        let actor = ActorState::from_archetype(id, &Archetype::new("orc"), Position::new(2, 2));
        assert_eq!(
            world.insert(actor, Some(GoalStack::new())),
            Err(WorldError::PositionOccupied {
                position: Position::new(2, 2),
                occupant: first,
            })
        );
    }

    #[test]
    fn restoring_a_dead_actors_mind_drops_it() {
        let mut world = World::new();
        let id = goblin(&mut world, Position::new(0, 0));
        let mind = world.take_mind(id).unwrap();
        world.actor_mut(id).unwrap().alive = false;
        world.restore_mind(id, mind);
        assert!(world.mind(id).is_none());
    }
}
