use super::{Action, ActionError, ActionKind};
use crate::config::GameConfig;
use crate::env::Env;
use crate::state::{ActorId, ActorState, World};

/// Checks an action against the current world and returns the action that
/// will actually be applied.
///
/// Moving into a hostile becomes a melee attack with the actor's first
/// melee weapon. Nothing is mutated.
pub fn pre_validate(
    world: &World,
    env: &Env<'_>,
    actor_id: ActorId,
    action: Action,
) -> Result<Action, ActionError> {
    let actor = world
        .actor(actor_id)
        .filter(|a| a.alive)
        .ok_or(ActionError::InvalidActor(actor_id))?;

    match action {
        Action::Wait => Ok(action),

        Action::Move(dir) => {
            let destination = actor.position.step(dir);
            if let Some(occupant) = world.actor_at(destination) {
                return match actor.melee_attack() {
                    Some(attack) if actor.is_hostile_to(occupant) => Ok(Action::Attack {
                        target: occupant.id,
                        attack,
                    }),
                    _ => Err(ActionError::Blocked(destination)),
                };
            }
            if !env.map.is_passable(destination) {
                return Err(ActionError::Blocked(destination));
            }
            Ok(action)
        }

        Action::Attack { target, attack } => {
            let weapon = actor.attack(attack).ok_or(ActionError::NoSuchAttack(attack))?;
            if weapon.is_ranged() {
                return Err(ActionError::WrongAttackKind {
                    index: attack,
                    kind: ActionKind::Attack,
                });
            }
            let defender = valid_target(world, actor_id, target)?;
            if !actor.position.is_adjacent(defender.position) {
                return Err(ActionError::NotAdjacent(target));
            }
            Ok(action)
        }

        Action::Fire { target, attack } => {
            let weapon = actor.attack(attack).ok_or(ActionError::NoSuchAttack(attack))?;
            let profile = weapon.ranged.as_ref().ok_or(ActionError::WrongAttackKind {
                index: attack,
                kind: ActionKind::Fire,
            })?;
            let defender = valid_target(world, actor_id, target)?;
            let distance = actor.position.distance(defender.position);
            if distance > profile.range {
                return Err(ActionError::OutOfRange {
                    target,
                    distance,
                    range: profile.range,
                });
            }
            if !env.vision.can_see(actor, defender.position) {
                return Err(ActionError::NotVisible(target));
            }
            Ok(action)
        }

        Action::UseItem { slot } => {
            if slot >= actor.consumables.len() {
                return Err(ActionError::NoSuchItem(slot));
            }
            Ok(action)
        }

        Action::PickUp => {
            if world.item_at(actor.position).is_none() {
                return Err(ActionError::NothingToPickUp(actor.position));
            }
            if actor.consumables.len() >= GameConfig::MAX_CONSUMABLES {
                return Err(ActionError::InventoryFull);
            }
            Ok(action)
        }
    }
}

fn valid_target(
    world: &World,
    actor: ActorId,
    target: ActorId,
) -> Result<&ActorState, ActionError> {
    if target == actor {
        return Err(ActionError::SelfTarget);
    }
    world
        .actor(target)
        .filter(|a| a.alive)
        .ok_or(ActionError::InvalidTarget(target))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::ai::GoalStack;
    use crate::env::{GridMap, PcgRng};
    use crate::registry::Archetype;
    use crate::state::{Attack, Direction, Faction, Position};

    struct Fixture {
        world: World,
        map: GridMap,
        archer: ActorId,
        orc: ActorId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = World::new();
            let mut spawn = |archetype: Archetype, at: Position| {
                let id = world.allocate_id();
                let actor = ActorState::from_archetype(id, &archetype, at);
                world.insert(actor, Some(GoalStack::new())).unwrap();
                id
            };
            let archer = spawn(
                Archetype::new("archer")
                    .with_faction(Faction::Ally)
                    .with_attack(Attack::melee("knife", 1))
                    .with_attack(Attack::ranged("bow", 4, 3, Duration::from_millis(200))),
                Position::new(1, 1),
            );
            let orc = spawn(Archetype::new("orc"), Position::new(2, 1));
            Self {
                world,
                map: GridMap::open(8, 3).with_wall(Position::new(1, 0)),
                archer,
                orc,
            }
        }

        fn check(&self, action: Action) -> Result<Action, ActionError> {
            let env = Env::with_grid(&self.map, &PcgRng);
            pre_validate(&self.world, &env, self.archer, action)
        }
    }

    #[test]
    fn bumping_a_hostile_becomes_a_melee_attack() {
        let fx = Fixture::new();
        assert_eq!(
            fx.check(Action::Move(Direction::East)),
            Ok(Action::Attack {
                target: fx.orc,
                attack: 0,
            })
        );
        assert_eq!(
            fx.check(Action::Move(Direction::North)),
            Err(ActionError::Blocked(Position::new(1, 0)))
        );
        assert_eq!(fx.check(Action::Move(Direction::South)), Ok(Action::Move(Direction::South)));
    }

    #[test]
    fn attack_slots_must_match_the_action() {
        let fx = Fixture::new();
        assert_eq!(
            fx.check(Action::Attack {
                target: fx.orc,
                attack: 1,
            }),
            Err(ActionError::WrongAttackKind {
                index: 1,
                kind: ActionKind::Attack,
            })
        );
        assert_eq!(
            fx.check(Action::Fire {
                target: fx.orc,
                attack: 0,
            }),
            Err(ActionError::WrongAttackKind {
                index: 0,
                kind: ActionKind::Fire,
            })
        );
        assert_eq!(
            fx.check(Action::Attack {
                target: fx.archer,
                attack: 0,
            }),
            Err(ActionError::SelfTarget)
        );
    }

    #[test]
    fn ranged_attacks_respect_range() {
        let mut fx = Fixture::new();
        let fire = Action::Fire {
            target: fx.orc,
            attack: 1,
        };
        assert_eq!(fx.check(fire), Ok(fire));

        fx.world.actor_mut(fx.orc).unwrap().position = Position::new(6, 1);
        assert_eq!(
            fx.check(fire),
            Err(ActionError::OutOfRange {
                target: fx.orc,
                distance: 5,
                range: 3,
            })
        );
    }

    #[test]
    fn items_need_a_slot_or_a_tile() {
        let mut fx = Fixture::new();
        assert_eq!(fx.check(Action::UseItem { slot: 0 }), Err(ActionError::NoSuchItem(0)));
        assert_eq!(
            fx.check(Action::PickUp),
            Err(ActionError::NothingToPickUp(Position::new(1, 1)))
        );
        fx.world
            .place_item(Position::new(1, 1), crate::state::Consumable::Remedy);
        assert_eq!(fx.check(Action::PickUp), Ok(Action::PickUp));
    }
}
