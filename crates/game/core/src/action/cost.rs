//! Action pricing.
//!
//! Every action has a base cost in aut. Attacks use the weapon's declared
//! delay instead when one is set. The base is then scaled inversely by the
//! actor's effective speed, so fast actors pay less per action and become
//! ready again sooner.

use super::Action;
use crate::config::GameConfig;
use crate::state::{ActorState, Aut};
use crate::stats::calculate_action_cost;

/// Maps an action and the acting actor to a delay cost.
#[derive(Clone, Copy, Debug)]
pub struct ActionCostModel<'a> {
    config: &'a GameConfig,
}

impl<'a> ActionCostModel<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self { config }
    }

    /// Cost before speed scaling.
    pub fn base_cost(&self, actor: &ActorState, action: &Action) -> Aut {
        let costs = &self.config.base_costs;
        match action {
            Action::Wait => costs.wait,
            Action::Move(_) => costs.movement,
            Action::Attack { attack, .. } => actor
                .attack(*attack)
                .and_then(|a| a.delay)
                .unwrap_or(costs.attack),
            Action::Fire { attack, .. } => actor
                .attack(*attack)
                .and_then(|a| a.delay)
                .unwrap_or(costs.fire),
            Action::UseItem { .. } => costs.use_item,
            Action::PickUp => costs.pick_up,
        }
    }

    /// Final cost charged to the ledger.
    pub fn cost(&self, actor: &ActorState, action: &Action) -> Aut {
        calculate_action_cost(
            self.base_cost(actor, action),
            actor.effective_speed(),
            self.config.normal_speed,
            self.config.min_action_cost,
        )
    }

    /// Flat cost of an evaluation that pushed a goal instead of acting.
    pub fn think_cost(&self) -> Aut {
        self.config.think_cost.max(self.config.min_action_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Archetype;
    use crate::state::{ActorId, Attack, Direction, Position, StatusKind};

    fn actor(speed: i32) -> ActorState {
        let archetype = Archetype::new("runner")
            .with_speed(speed)
            .with_attack(Attack::melee("club", 3).with_delay(15))
            .with_attack(Attack::melee("fist", 1));
        ActorState::from_archetype(ActorId(1), &archetype, Position::ORIGIN)
    }

    #[test]
    fn faster_actors_pay_less() {
        let config = GameConfig::default();
        let model = ActionCostModel::new(&config);
        let step = Action::Move(Direction::East);
        assert_eq!(model.cost(&actor(10), &step), 10);
        assert_eq!(model.cost(&actor(20), &step), 5);
        assert_eq!(model.cost(&actor(5), &step), 20);
    }

    #[test]
    fn weapon_delay_replaces_base_attack_cost() {
        let config = GameConfig::default();
        let model = ActionCostModel::new(&config);
        let club = Action::Attack {
            target: ActorId(2),
            attack: 0,
        };
        let fist = Action::Attack {
            target: ActorId(2),
            attack: 1,
        };
        assert_eq!(model.cost(&actor(10), &club), 15);
        assert_eq!(model.cost(&actor(10), &fist), 10);
    }

    #[test]
    fn haste_status_lowers_cost() {
        let config = GameConfig::default();
        let model = ActionCostModel::new(&config);
        let mut hasted = actor(10);
        hasted.statuses.add(StatusKind::Hasted, 3, None);
        assert_eq!(model.cost(&hasted, &Action::Wait), 6);
    }

    #[test]
    fn think_cost_respects_minimum() {
        let config = GameConfig::default().with_think_cost(0);
        assert_eq!(ActionCostModel::new(&config).think_cost(), 1);
    }
}
