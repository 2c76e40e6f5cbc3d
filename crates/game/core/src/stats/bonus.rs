//! Layered bonus application.
//!
//! Bonuses are applied in a fixed order so results are deterministic no
//! matter in which order equipment and statuses contributed them:
//! Flat → %Inc → More → Less → Clamp.

/// A single bonus that can be applied to a stat value.
///
/// - **Flat**: Additive bonuses applied first (e.g., +2 speed from boots)
/// - **Increased**: Percentage increases, summed then multiplied
/// - **More**: Sequential multipliers applied individually (50 = ×1.5)
/// - **Less**: Sequential reductions applied individually (50 = ×0.5)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    Flat(i32),
    Increased(i32),
    More(i32),
    Less(i32),
}

/// A collection of bonuses that will be applied in the correct order.
///
/// # Example
/// ```
/// # use game_core::stats::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(2));
/// stack.add(Bonus::More(50));
/// // (10 + 2) × 1.5 = 18
/// assert_eq!(stack.apply(10, 1, 100), 18);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    /// Apply all bonuses to a base value with clamping.
    ///
    /// ```text
    /// result = clamp((base + flat_sum) × (1 + inc_sum/100) × more_product × less_product, min, max)
    /// ```
    pub fn apply(&self, base: i32, min: i32, max: i32) -> i32 {
        let flat_sum: i32 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Flat(v) => Some(*v),
                _ => None,
            })
            .sum();

        let inc_sum: i32 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Increased(p) => Some(*p),
                _ => None,
            })
            .sum();

        let after_inc = ((base + flat_sum) * (100 + inc_sum)) / 100;

        let after_more = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::More(p) => Some(*p),
                _ => None,
            })
            .fold(after_inc, |acc, more_percent| {
                (acc * (100 + more_percent)) / 100
            });

        let after_less = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Less(p) => Some(*p),
                _ => None,
            })
            .fold(after_more, |acc, less_percent| {
                (acc * (100 - less_percent)) / 100
            });

        after_less.clamp(min, max)
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

/// Builder-style helpers.
impl BonusStack {
    pub fn flat(mut self, value: i32) -> Self {
        self.add(Bonus::Flat(value));
        self
    }

    pub fn increased(mut self, percent: i32) -> Self {
        self.add(Bonus::Increased(percent));
        self
    }

    pub fn more(mut self, percent: i32) -> Self {
        self.add(Bonus::More(percent));
        self
    }

    pub fn less(mut self, percent: i32) -> Self {
        self.add(Bonus::Less(percent));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_layers_in_order() {
        let stack = BonusStack::new().flat(5).increased(20).increased(15).more(50).less(10);
        // (10 + 5) × 1.35 = 20, × 1.5 = 30, × 0.9 = 27
        assert_eq!(stack.apply(10, 5, 100), 27);
    }

    #[test]
    fn clamps_to_bounds() {
        let stack = BonusStack::new().less(99);
        assert_eq!(stack.apply(10, 1, 100), 1);
        assert_eq!(BonusStack::new().flat(500).apply(10, 1, 100), 100);
    }
}
