use std::time::Duration;

use arrayvec::ArrayVec;

use super::{ActorId, Aut, Position, ResourceMeter, StatusEffects, StatusKind};
use crate::ai::BehaviorKind;
use crate::config::GameConfig;
use crate::registry::Archetype;
use crate::stats::{self, BonusStack};

/// Armor granted by the Shielded status.
pub const SHIELD_ARMOR: i32 = 5;

/// Allegiance used to derive hostility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    Player,
    Ally,
    Monster,
    Neutral,
}

impl Faction {
    const fn side(self) -> Option<bool> {
        match self {
            Faction::Player | Faction::Ally => Some(true),
            Faction::Monster => Some(false),
            Faction::Neutral => None,
        }
    }

    pub fn is_hostile_to(self, other: Faction) -> bool {
        match (self.side(), other.side()) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}

/// Projectile parameters of a ranged attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangedProfile {
    pub range: u32,
    /// Visual flight time handed to the presentation layer.
    pub travel: Duration,
}

/// Status inflicted on the target when an attack lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Infliction {
    pub kind: StatusKind,
    pub duration: u32,
}

/// One attack an actor can perform, addressed by its index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attack {
    pub name: String,
    pub damage: u32,
    /// Weapon's declared delay; replaces the base attack cost when set.
    #[cfg_attr(feature = "serde", serde(default))]
    pub delay: Option<Aut>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ranged: Option<RangedProfile>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inflicts: Option<Infliction>,
}

impl Attack {
    pub fn melee(name: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            damage,
            delay: None,
            ranged: None,
            inflicts: None,
        }
    }

    pub fn ranged(name: impl Into<String>, damage: u32, range: u32, travel: Duration) -> Self {
        Self {
            name: name.into(),
            damage,
            delay: None,
            ranged: Some(RangedProfile { range, travel }),
            inflicts: None,
        }
    }

    pub fn with_delay(mut self, delay: Aut) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn inflicting(mut self, kind: StatusKind, duration: u32) -> Self {
        self.inflicts = Some(Infliction { kind, duration });
        self
    }

    pub fn is_ranged(&self) -> bool {
        self.ranged.is_some()
    }
}

/// Carried single-use items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Consumable {
    /// Restores hit points.
    Healing { amount: u32 },
    /// Cures confusion and fear.
    Remedy,
}

/// Complete mutable state of one actor.
///
/// Goal stacks live beside the actor in [`super::World`] so the owning
/// actor's mind can be mutated while the rest of the world is read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorState {
    pub id: ActorId,
    pub name: String,
    pub archetype: String,
    pub position: Position,
    pub faction: Faction,

    pub base_speed: i32,
    /// Speed bonuses contributed by equipment.
    pub speed_bonuses: BonusStack,

    pub hp: ResourceMeter,
    pub armor: i32,
    pub evasion: i32,
    pub accuracy: i32,
    pub attacks: ArrayVec<Attack, { GameConfig::MAX_ATTACKS }>,
    pub consumables: ArrayVec<Consumable, { GameConfig::MAX_CONSUMABLES }>,

    pub sight_radius: u32,
    pub behavior: BehaviorKind,
    pub statuses: StatusEffects,
    pub alive: bool,
}

impl ActorState {
    /// Instantiates an archetype at a position.
    pub fn from_archetype(id: ActorId, archetype: &Archetype, position: Position) -> Self {
        Self {
            id,
            name: archetype.name.clone(),
            archetype: archetype.name.clone(),
            position,
            faction: archetype.faction,
            base_speed: archetype.speed,
            speed_bonuses: archetype.speed_bonuses.clone(),
            hp: ResourceMeter::full(archetype.hp),
            armor: archetype.armor,
            evasion: archetype.evasion,
            accuracy: archetype.accuracy,
            attacks: archetype.attacks.clone(),
            consumables: archetype.consumables.clone(),
            sight_radius: archetype.sight_radius,
            behavior: archetype.behavior.clone(),
            statuses: StatusEffects::empty(),
            alive: true,
        }
    }

    pub fn effective_speed(&self) -> i32 {
        stats::effective_speed(self.base_speed, &self.speed_bonuses, &self.statuses)
    }

    /// Armor including status bonuses, read at the moment of impact.
    pub fn effective_armor(&self) -> i32 {
        if self.statuses.has(StatusKind::Shielded) {
            self.armor + SHIELD_ARMOR
        } else {
            self.armor
        }
    }

    /// Faction after charm is taken into account.
    pub fn effective_faction(&self) -> Faction {
        if self.statuses.has(StatusKind::Charmed) && self.faction == Faction::Monster {
            Faction::Ally
        } else {
            self.faction
        }
    }

    pub fn is_hostile_to(&self, other: &ActorState) -> bool {
        self.effective_faction()
            .is_hostile_to(other.effective_faction())
    }

    pub fn attack(&self, index: usize) -> Option<&Attack> {
        self.attacks.get(index)
    }

    /// Index of the first melee attack, if the actor has one.
    pub fn melee_attack(&self) -> Option<usize> {
        self.attacks.iter().position(|a| !a.is_ranged())
    }

    /// Index of the first ranged attack, if the actor has one.
    pub fn ranged_attack(&self) -> Option<(usize, &Attack)> {
        self.attacks.iter().enumerate().find(|(_, a)| a.is_ranged())
    }

    pub fn hp_percent(&self) -> u32 {
        self.hp.percent()
    }

    /// Applies damage and marks the actor dead at zero hp. Returns true if
    /// this damage killed it.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.alive;
        self.hp.current = self.hp.current.saturating_sub(amount);
        if self.hp.current == 0 {
            self.alive = false;
        }
        was_alive && !self.alive
    }

    /// Slot of the first healing consumable.
    pub fn healing_slot(&self) -> Option<usize> {
        self.consumables
            .iter()
            .position(|c| matches!(c, Consumable::Healing { .. }))
    }

    pub fn heal(&mut self, amount: u32) {
        self.hp.current = (self.hp.current + amount).min(self.hp.maximum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(faction: Faction) -> ActorState {
        let archetype = Archetype::new("dummy").with_faction(faction);
        ActorState::from_archetype(ActorId(1), &archetype, Position::ORIGIN)
    }

    #[test]
    fn hostility_is_symmetric_and_ignores_neutrals() {
        assert!(Faction::Player.is_hostile_to(Faction::Monster));
        assert!(Faction::Monster.is_hostile_to(Faction::Ally));
        assert!(!Faction::Player.is_hostile_to(Faction::Ally));
        assert!(!Faction::Monster.is_hostile_to(Faction::Monster));
        assert!(!Faction::Neutral.is_hostile_to(Faction::Monster));
    }

    #[test]
    fn charm_switches_sides() {
        let player = actor(Faction::Player);
        let mut goblin = actor(Faction::Monster);
        assert!(goblin.is_hostile_to(&player));

        goblin.statuses.add(StatusKind::Charmed, 3, Some(ActorId::PLAYER));
        assert!(!goblin.is_hostile_to(&player));
    }

    #[test]
    fn damage_kills_exactly_once() {
        let mut goblin = actor(Faction::Monster);
        goblin.hp = ResourceMeter::full(5);
        assert!(!goblin.take_damage(3));
        assert!(goblin.take_damage(9));
        assert!(!goblin.alive);
        assert!(!goblin.take_damage(1));
    }

    #[test]
    fn shield_adds_armor() {
        let mut goblin = actor(Faction::Monster);
        goblin.armor = 2;
        goblin.statuses.add(StatusKind::Shielded, 2, None);
        assert_eq!(goblin.effective_armor(), 2 + SHIELD_ARMOR);
    }
}
