//! Static oracles handed to the core on every step.
//!
//! The map is immutable at runtime and shared behind an [`Arc`] so several
//! runtimes (or a renderer) can read the same level. Dynamic state lives in
//! [`game_core::GameState`].
use std::sync::Arc;

use game_core::{Env, GridMap, PcgRng};

/// Manages all oracle implementations and provides unified access
#[derive(Clone, Debug)]
pub struct OracleManager {
    map: Arc<GridMap>,
    rng: PcgRng,
}

impl OracleManager {
    pub fn new(map: GridMap) -> Self {
        Self::from_shared(Arc::new(map))
    }

    pub fn from_shared(map: Arc<GridMap>) -> Self {
        Self {
            map,
            // PcgRng is stateless
            rng: PcgRng,
        }
    }

    /// Borrows the oracles as the environment the engine expects.
    pub fn env(&self) -> Env<'_> {
        Env::with_grid(self.map.as_ref(), &self.rng)
    }

    pub fn map(&self) -> &GridMap {
        &self.map
    }

    pub fn rng(&self) -> &PcgRng {
        &self.rng
    }
}
