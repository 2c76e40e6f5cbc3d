//! Creature archetypes and the catalog they are spawned from.
//!
//! An [`Archetype`] carries every [`ActorState`](crate::state::ActorState)
//! field except identity, position and live statuses. With the `serde`
//! feature archetypes can be loaded from data files; every field has a
//! default so catalogs only spell out what differs.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::ai::BehaviorKind;
use crate::config::GameConfig;
use crate::state::{Attack, Consumable, Faction};
use crate::stats::{Bonus, BonusStack};

/// Template for spawning one kind of creature.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Archetype {
    pub name: String,
    pub speed: i32,
    pub speed_bonuses: BonusStack,
    pub hp: u32,
    pub armor: i32,
    pub evasion: i32,
    pub accuracy: i32,
    pub attacks: ArrayVec<Attack, { GameConfig::MAX_ATTACKS }>,
    pub consumables: ArrayVec<Consumable, { GameConfig::MAX_CONSUMABLES }>,
    pub sight_radius: u32,
    pub faction: Faction,
    pub behavior: BehaviorKind,
}

impl Default for Archetype {
    fn default() -> Self {
        Self {
            name: String::new(),
            speed: GameConfig::DEFAULT_NORMAL_SPEED,
            speed_bonuses: BonusStack::new(),
            hp: 10,
            armor: 0,
            evasion: 0,
            accuracy: 0,
            attacks: ArrayVec::new(),
            consumables: ArrayVec::new(),
            sight_radius: 8,
            faction: Faction::Monster,
            behavior: BehaviorKind::Idle,
        }
    }
}

impl Archetype {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_speed_bonus(mut self, bonus: Bonus) -> Self {
        self.speed_bonuses.add(bonus);
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp;
        self
    }

    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_evasion(mut self, evasion: i32) -> Self {
        self.evasion = evasion;
        self
    }

    pub fn with_accuracy(mut self, accuracy: i32) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Adds an attack. Attacks beyond capacity are ignored.
    pub fn with_attack(mut self, attack: Attack) -> Self {
        if self.attacks.try_push(attack).is_err() {
            tracing::warn!("{} already has {} attacks", self.name, GameConfig::MAX_ATTACKS);
        }
        self
    }

    /// Adds a carried consumable. Items beyond capacity are ignored.
    pub fn with_consumable(mut self, item: Consumable) -> Self {
        if self.consumables.try_push(item).is_err() {
            tracing::warn!("{} cannot carry more items", self.name);
        }
        self
    }

    pub fn with_sight(mut self, radius: u32) -> Self {
        self.sight_radius = radius;
        self
    }

    pub fn with_faction(mut self, faction: Faction) -> Self {
        self.faction = faction;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorKind) -> Self {
        self.behavior = behavior;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("archetype '{0}' is defined twice")]
    Duplicate(String),

    #[error("unknown archetype '{0}'")]
    Unknown(String),
}

/// Archetypes indexed by name.
#[derive(Clone, Debug, Default)]
pub struct ArchetypeRegistry {
    archetypes: BTreeMap<String, Archetype>,
}

impl ArchetypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry, rejecting duplicate names.
    pub fn from_archetypes(
        archetypes: impl IntoIterator<Item = Archetype>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for archetype in archetypes {
            registry.insert(archetype)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, archetype: Archetype) -> Result<(), RegistryError> {
        if self.archetypes.contains_key(&archetype.name) {
            return Err(RegistryError::Duplicate(archetype.name));
        }
        self.archetypes.insert(archetype.name.clone(), archetype);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Archetype, RegistryError> {
        self.archetypes
            .get(name)
            .ok_or_else(|| RegistryError::Unknown(name.to_owned()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_an_idle_monster() {
        let archetype = Archetype::new("blob");
        assert_eq!(archetype.speed, GameConfig::DEFAULT_NORMAL_SPEED);
        assert_eq!(archetype.faction, Faction::Monster);
        assert_eq!(archetype.behavior, BehaviorKind::Idle);
        assert!(archetype.attacks.is_empty());
    }

    #[test]
    fn excess_attacks_are_dropped() {
        let mut archetype = Archetype::new("hydra");
        for i in 0..GameConfig::MAX_ATTACKS + 2 {
            archetype = archetype.with_attack(Attack::melee(format!("head {i}"), 1));
        }
        assert_eq!(archetype.attacks.len(), GameConfig::MAX_ATTACKS);
    }

    #[test]
    fn registry_rejects_duplicates_and_reports_unknown_names() {
        let result = ArchetypeRegistry::from_archetypes([Archetype::new("rat"), Archetype::new("rat")]);
        assert_eq!(result.err(), Some(RegistryError::Duplicate("rat".into())));

        let registry =
            ArchetypeRegistry::from_archetypes([Archetype::new("rat"), Archetype::new("bat")])
                .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["bat", "rat"]);
        assert_eq!(registry.get("orc").err(), Some(RegistryError::Unknown("orc".into())));
    }
}
