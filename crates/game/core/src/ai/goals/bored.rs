use super::{Flee, FollowLeader, Hunt, Patrol, PickUp, ShootAndScoot, UseItem, Wander};
use crate::action::Action;
use crate::ai::{AiContext, BehaviorKind, Decision, Goal};
use crate::config::GameConfig;
use crate::state::ActorState;

/// Fallback at the bottom of every stack.
///
/// Holds no state, so resetting a stack to `[Bored]` always yields a fresh
/// re-evaluation. Survival needs come first (healing, fleeing at low
/// health), then the actor's configured behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bored;

impl Bored {
    pub const NAME: &'static str = "bored";
}

impl Goal for Bored {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_finished(&self, _ctx: &AiContext<'_>) -> bool {
        false
    }

    fn take_action(&mut self, ctx: &AiContext<'_>) -> Decision {
        let actor = ctx.actor;
        let config = ctx.config;
        let hostile = ctx.nearest_hostile();

        if ctx.hp_percent() < config.heal_hp_percent
            && let Some(slot) = actor.healing_slot()
        {
            return Decision::push(UseItem::new(slot));
        }

        if let Some(threat) = hostile
            && ctx.hp_percent() < config.flee_hp_percent
        {
            return Decision::push(Flee::from(threat.id));
        }

        match &actor.behavior {
            BehaviorKind::Idle => match (ctx.adjacent_hostile(), actor.melee_attack()) {
                (Some(target), Some(attack)) => Action::Attack {
                    target: target.id,
                    attack,
                }
                .into(),
                _ => Decision::wait(),
            },

            BehaviorKind::Wanderer => match hostile {
                Some(target) => engage(actor, target),
                None => Decision::push(Wander::new(config.wander_steps)),
            },

            BehaviorKind::Patrol { route } => match hostile {
                Some(target) => engage(actor, target),
                None => Decision::push(Patrol::new(route.clone())),
            },

            BehaviorKind::FollowLeader { leader } => match (hostile, leader) {
                (Some(target), _) => engage(actor, target),
                (None, Some(leader)) if ctx.world.is_valid(*leader) => {
                    Decision::push(FollowLeader::new(*leader))
                }
                _ => Decision::push(Wander::new(config.wander_steps)),
            },

            BehaviorKind::Skirmisher => match hostile {
                Some(target) if actor.ranged_attack().is_some() => {
                    Decision::push(ShootAndScoot::new(target.id))
                }
                Some(target) => engage(actor, target),
                None => Decision::push(Wander::new(config.wander_steps)),
            },

            BehaviorKind::Coward => match hostile {
                Some(threat) => Decision::push(Flee::from(threat.id)),
                None => Decision::push(Wander::new(config.wander_steps)),
            },

            BehaviorKind::Scavenger => {
                let room = actor.consumables.len() < GameConfig::MAX_CONSUMABLES;
                match (ctx.nearest_visible_item(), hostile) {
                    (Some(at), _) if room => Decision::push(PickUp::new(at)),
                    (_, Some(target)) => engage(actor, target),
                    _ => Decision::push(Wander::new(config.wander_steps)),
                }
            }
        }
    }
}

/// Hunt when armed, run otherwise.
fn engage(actor: &ActorState, target: &ActorState) -> Decision {
    if actor.attacks.is_empty() {
        Decision::push(Flee::from(target.id))
    } else {
        Decision::push(Hunt::new(target.id, target.position))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Arena;
    use super::*;
    use crate::registry::Archetype;
    use crate::state::{Attack, Consumable, Faction, Position};

    fn pushed(decision: Decision) -> &'static str {
        match decision {
            Decision::Push(goal) => goal.name(),
            Decision::Act(action) => panic!("expected a push, got {action:?}"),
        }
    }

    #[test]
    fn wanderer_hunts_visible_hostiles() {
        let mut arena = Arena::new(10, 10);
        let wolf = arena.spawn(
            &Archetype::new("wolf")
                .with_behavior(BehaviorKind::Wanderer)
                .with_attack(Attack::melee("bite", 3)),
            Position::new(1, 1),
        );
        let ctx = arena.context(wolf, 1);
        assert_eq!(pushed(Bored.take_action(&ctx)), "wander");

        arena.spawn(
            &Archetype::new("hero").with_faction(Faction::Player),
            Position::new(4, 1),
        );
        let ctx = arena.context(wolf, 1);
        assert_eq!(pushed(Bored.take_action(&ctx)), "hunt");
    }

    #[test]
    fn wounded_actor_heals_before_anything_else() {
        let mut arena = Arena::new(10, 10);
        let troll = arena.spawn(
            &Archetype::new("troll")
                .with_hp(10)
                .with_consumable(Consumable::Healing { amount: 5 }),
            Position::new(1, 1),
        );
        arena.world.actor_mut(troll).unwrap().hp.current = 2;
        let ctx = arena.context(troll, 1);
        assert_eq!(pushed(Bored.take_action(&ctx)), "use-item");
    }

    #[test]
    fn unarmed_actors_flee_instead_of_hunting() {
        let mut arena = Arena::new(10, 10);
        let rabbit = arena.spawn(
            &Archetype::new("rabbit").with_behavior(BehaviorKind::Wanderer),
            Position::new(1, 1),
        );
        arena.spawn(
            &Archetype::new("hero").with_faction(Faction::Player),
            Position::new(3, 1),
        );
        let ctx = arena.context(rabbit, 1);
        assert_eq!(pushed(Bored.take_action(&ctx)), "flee");
    }

    #[test]
    fn idle_actor_strikes_adjacent_hostile() {
        let mut arena = Arena::new(10, 10);
        let turret = arena.spawn(
            &Archetype::new("turret").with_attack(Attack::melee("spike", 2)),
            Position::new(1, 1),
        );
        let hero = arena.spawn(
            &Archetype::new("hero").with_faction(Faction::Player),
            Position::new(2, 2),
        );
        let ctx = arena.context(turret, 1);
        assert!(matches!(
            Bored.take_action(&ctx),
            Decision::Act(Action::Attack { target, attack: 0 }) if target == hero
        ));
    }
}
