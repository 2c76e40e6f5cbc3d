//! Read-only view an actor's goals decide from.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::env::{Env, compute_seed};
use crate::state::{ActorId, ActorState, Direction, Position, World};

/// Blackboard handed to goals during one evaluation.
///
/// Visible tiles are computed lazily once per evaluation. Random rolls are
/// derived from the decision seed, so the same world always yields the
/// same decisions.
pub struct AiContext<'a> {
    pub actor: &'a ActorState,
    pub world: &'a World,
    pub env: Env<'a>,
    pub config: &'a GameConfig,
    seed: u64,
    visible: OnceCell<BTreeSet<Position>>,
}

impl<'a> AiContext<'a> {
    pub fn new(
        actor: &'a ActorState,
        world: &'a World,
        env: Env<'a>,
        config: &'a GameConfig,
        seed: u64,
    ) -> Self {
        Self {
            actor,
            world,
            env,
            config,
            seed,
            visible: OnceCell::new(),
        }
    }

    pub fn visible_tiles(&self) -> &BTreeSet<Position> {
        self.visible
            .get_or_init(|| self.env.vision.visible_tiles(self.actor))
    }

    pub fn can_see(&self, position: Position) -> bool {
        self.visible_tiles().contains(&position)
    }

    /// The actor if it is alive and in sight.
    pub fn visible_actor(&self, id: ActorId) -> Option<&'a ActorState> {
        self.world
            .actor(id)
            .filter(|other| other.alive && self.can_see(other.position))
    }

    /// Living hostiles in sight, nearest first.
    pub fn visible_hostiles(&self) -> Vec<&'a ActorState> {
        let mut hostiles: Vec<_> = self
            .world
            .living()
            .filter(|other| other.id != self.actor.id)
            .filter(|other| self.actor.is_hostile_to(other))
            .filter(|other| self.can_see(other.position))
            .collect();
        hostiles.sort_by_key(|other| (self.actor.position.distance(other.position), other.id));
        hostiles
    }

    pub fn nearest_hostile(&self) -> Option<&'a ActorState> {
        self.visible_hostiles().into_iter().next()
    }

    /// A hostile standing next to the actor.
    pub fn adjacent_hostile(&self) -> Option<&'a ActorState> {
        self.visible_hostiles()
            .into_iter()
            .find(|other| self.actor.position.is_adjacent(other.position))
    }

    /// Nearest floor item in sight.
    pub fn nearest_visible_item(&self) -> Option<Position> {
        self.world
            .items()
            .map(|(position, _)| *position)
            .filter(|position| self.can_see(*position))
            .min_by_key(|position| (self.actor.position.distance(*position), *position))
    }

    pub fn hp_percent(&self) -> u32 {
        self.actor.hp_percent()
    }

    /// Terrain allows the step and no living actor stands there.
    pub fn is_walkable(&self, position: Position) -> bool {
        self.env.map.is_passable(position) && self.world.actor_at(position).is_none()
    }

    /// A deterministic index in `0..len` for roll number `salt`.
    pub fn pick(&self, salt: u32, len: usize) -> usize {
        let seed = compute_seed(self.seed, 0, self.actor.id.0, salt);
        self.env.rng.pick(seed, len)
    }

    /// First step of a path toward `target`. When another actor stands on
    /// that step, sidesteps greedily instead. `None` if the target cannot be
    /// reached at all.
    pub fn step_toward(&self, target: Position) -> Option<Direction> {
        let from = self.actor.position;
        let path = self.env.paths.path_to(self.actor, target)?;
        let next = *path.first()?;
        if self.is_walkable(next) {
            return from.direction_to(next);
        }

        let current = from.distance(target);
        from.neighbors()
            .filter(|(_, step)| self.is_walkable(*step))
            .filter(|(_, step)| step.distance(target) < current)
            .min_by_key(|(_, step)| step.distance(target))
            .map(|(dir, _)| dir)
    }

    /// Step that increases the distance to `threat` the most.
    pub fn step_away_from(&self, threat: Position) -> Option<Direction> {
        let current = self.actor.position.distance(threat);
        let mut best: Option<(Direction, u32)> = None;
        for (dir, next) in self.actor.position.neighbors() {
            if !self.is_walkable(next) {
                continue;
            }
            let distance = next.distance(threat);
            if distance > current && best.is_none_or(|(_, d)| distance > d) {
                best = Some((dir, distance));
            }
        }
        best.map(|(dir, _)| dir)
    }

    /// A random walkable step.
    pub fn random_step(&self, salt: u32) -> Option<Direction> {
        let options: Vec<Direction> = self
            .actor
            .position
            .neighbors()
            .filter(|(_, next)| self.is_walkable(*next))
            .map(|(dir, _)| dir)
            .collect();
        if options.is_empty() {
            return None;
        }
        Some(options[self.pick(salt, options.len())])
    }
}
