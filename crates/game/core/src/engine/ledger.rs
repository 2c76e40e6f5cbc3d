//! Energy bookkeeping.
//!
//! Each registered actor has a signed energy balance. An actor is ready
//! when its balance reaches the ready threshold; acting subtracts the
//! action's cost. When nobody is ready the clock jumps forward by exactly
//! the deficit of the closest actor and every balance gains that much, so
//! all actors recover energy at the same rate and cost alone decides how
//! often someone acts.

use std::collections::BTreeMap;

use crate::state::{ActorId, Aut, Tick};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("actor {0} is already registered")]
    AlreadyRegistered(ActorId),

    #[error("actor {0} is not registered")]
    NotRegistered(ActorId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LedgerEntry {
    balance: Aut,
    base_speed: i32,
    /// Registration order, the last tie-breaker.
    seq: u64,
}

#[derive(Clone, Debug)]
pub struct EnergyLedger {
    entries: BTreeMap<ActorId, LedgerEntry>,
    ready_threshold: Aut,
    min_charge: Aut,
    clock: Tick,
    next_seq: u64,
}

impl EnergyLedger {
    pub fn new(ready_threshold: Aut, min_charge: Aut) -> Self {
        Self {
            entries: BTreeMap::new(),
            ready_threshold,
            min_charge: min_charge.max(1),
            clock: Tick::ZERO,
            next_seq: 0,
        }
    }

    /// Adds an actor with a zero balance; it is ready immediately.
    pub fn register(&mut self, actor: ActorId, base_speed: i32) -> Result<(), LedgerError> {
        if self.entries.contains_key(&actor) {
            return Err(LedgerError::AlreadyRegistered(actor));
        }
        self.next_seq += 1;
        self.entries.insert(
            actor,
            LedgerEntry {
                balance: 0,
                base_speed,
                seq: self.next_seq,
            },
        );
        Ok(())
    }

    /// Returns true if the actor was registered.
    pub fn unregister(&mut self, actor: ActorId) -> bool {
        self.entries.remove(&actor).is_some()
    }

    /// Ready actor that would act next, without advancing time.
    ///
    /// Ties go to the higher balance, then the higher base speed, then the
    /// earlier registration.
    pub fn peek_ready(&self) -> Option<ActorId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.balance >= self.ready_threshold)
            .max_by_key(|(_, entry)| (entry.balance, entry.base_speed, std::cmp::Reverse(entry.seq)))
            .map(|(id, _)| *id)
    }

    /// Selects the next actor, advancing the clock if nobody is ready.
    pub fn next_ready(&mut self) -> Option<ActorId> {
        if let Some(actor) = self.peek_ready() {
            return Some(actor);
        }

        let deficit = self
            .entries
            .values()
            .map(|entry| self.ready_threshold - entry.balance)
            .min()?;
        for entry in self.entries.values_mut() {
            entry.balance += deficit;
        }
        self.clock = self.clock + deficit as u64;
        tracing::trace!("clock advanced by {} to {}", deficit, self.clock);

        self.peek_ready()
    }

    /// Deducts a cost. Non-positive costs are raised to the minimum charge
    /// so an actor can never keep the turn forever. Returns the new balance.
    pub fn charge(&mut self, actor: ActorId, cost: Aut) -> Result<Aut, LedgerError> {
        let min_charge = self.min_charge;
        let entry = self
            .entries
            .get_mut(&actor)
            .ok_or(LedgerError::NotRegistered(actor))?;

        let cost = if cost <= 0 {
            tracing::warn!("{} charged non-positive cost {}; using {}", actor, cost, min_charge);
            min_charge
        } else {
            cost
        };
        entry.balance -= cost;
        Ok(entry.balance)
    }

    pub fn balance(&self, actor: ActorId) -> Option<Aut> {
        self.entries.get(&actor).map(|entry| entry.balance)
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.entries.contains_key(&actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: ActorId = ActorId(1);
    const B: ActorId = ActorId(2);

    #[test]
    fn faster_actor_comes_back_first() {
        let mut ledger = EnergyLedger::new(0, 1);
        ledger.register(A, 10).unwrap();
        ledger.register(B, 20).unwrap();

        // Equal balances: base speed breaks the tie.
        assert_eq!(ledger.next_ready(), Some(B));
        ledger.charge(B, 5).unwrap();
        assert_eq!(ledger.next_ready(), Some(A));
        ledger.charge(A, 10).unwrap();

        assert_eq!(ledger.next_ready(), Some(B));
        assert_eq!(ledger.clock(), Tick(5));
        assert_eq!(ledger.balance(A), Some(-5));
    }

    #[test]
    fn registration_order_breaks_full_ties() {
        let mut ledger = EnergyLedger::new(0, 1);
        ledger.register(B, 10).unwrap();
        ledger.register(A, 10).unwrap();
        assert_eq!(ledger.peek_ready(), Some(B));
    }

    #[test]
    fn selection_is_deterministic() {
        let build = || {
            let mut ledger = EnergyLedger::new(0, 1);
            for (i, speed) in [7, 13, 10, 10, 4].into_iter().enumerate() {
                ledger.register(ActorId(i as u32 + 1), speed).unwrap();
            }
            ledger
        };
        let run = |mut ledger: EnergyLedger| {
            (0..40)
                .map(|_| {
                    let actor = ledger.next_ready().unwrap();
                    ledger.charge(actor, 7 + actor.0 as Aut).unwrap();
                    actor
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(build()), run(build()));
    }

    #[test]
    fn non_positive_charges_still_cost_something() {
        let mut ledger = EnergyLedger::new(0, 1);
        ledger.register(A, 10).unwrap();
        assert_eq!(ledger.charge(A, 0), Ok(-1));
        assert_eq!(ledger.charge(A, -20), Ok(-2));
    }

    #[test]
    fn unknown_actors_are_rejected() {
        let mut ledger = EnergyLedger::new(0, 1);
        assert_eq!(ledger.charge(A, 5), Err(LedgerError::NotRegistered(A)));
        assert_eq!(ledger.next_ready(), None);
        ledger.register(A, 10).unwrap();
        assert_eq!(ledger.register(A, 10), Err(LedgerError::AlreadyRegistered(A)));
    }
}
