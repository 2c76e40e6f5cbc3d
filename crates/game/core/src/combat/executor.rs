use super::{
    CombatError, CombatOutcome, CombatParams, EffectPayload, calculate_damage, check_hit,
};
use crate::env::RngOracle;
use crate::state::{ActorId, World};

/// Collaborator that applies attacks and effects to the world.
///
/// Implementations are the only code besides an actor's own turn that may
/// write another actor's hit points.
pub trait CombatExecutor {
    /// Resolves a payload against `target` using its defenses as they are
    /// now.
    fn apply_effect(
        &self,
        world: &mut World,
        payload: &EffectPayload,
        target: ActorId,
        rng: &dyn RngOracle,
    ) -> Result<CombatOutcome, CombatError>;

    /// Resolves an immediate attack.
    fn apply_attack(
        &self,
        world: &mut World,
        source: ActorId,
        target: ActorId,
        attack: usize,
        rng: &dyn RngOracle,
        seed: u64,
    ) -> Result<CombatOutcome, CombatError> {
        let attacker = world
            .actor(source)
            .ok_or(CombatError::UnknownSource(source))?;
        let payload =
            EffectPayload::capture(attacker, attack, seed).ok_or(CombatError::NoSuchAttack(attack))?;
        self.apply_effect(world, &payload, target, rng)
    }
}

/// Accuracy-versus-evasion hit roll followed by armor-reduced damage.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCombat {
    pub params: CombatParams,
}

impl StandardCombat {
    pub fn new(params: CombatParams) -> Self {
        Self { params }
    }
}

impl CombatExecutor for StandardCombat {
    fn apply_effect(
        &self,
        world: &mut World,
        payload: &EffectPayload,
        target: ActorId,
        rng: &dyn RngOracle,
    ) -> Result<CombatOutcome, CombatError> {
        let defender = world
            .actor_mut(target)
            .ok_or(CombatError::UnknownTarget(target))?;

        let roll = rng.roll_d100(payload.seed);
        let hit = check_hit(payload.accuracy, defender.evasion, roll, &self.params);
        if !hit {
            tracing::debug!("{} misses {} (roll {})", payload.attack, target, roll);
            return Ok(CombatOutcome {
                attack: payload.attack.clone(),
                hit,
                roll,
                damage: 0,
                inflicted: None,
                killed: false,
            });
        }

        let damage = calculate_damage(payload.damage, defender.effective_armor(), &self.params);
        let killed = defender.take_damage(damage);
        tracing::debug!(
            "{} hits {} for {} (roll {}, hp left {})",
            payload.attack,
            target,
            damage,
            roll,
            defender.hp.current
        );

        Ok(CombatOutcome {
            attack: payload.attack.clone(),
            hit,
            roll,
            damage,
            inflicted: payload.inflicts,
            killed,
        })
    }
}
