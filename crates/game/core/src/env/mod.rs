//! Traits describing read-only world data.
//!
//! Oracles expose static map geometry, line of sight, pathfinding and
//! deterministic randomness. The [`Env`] aggregate bundles them so the
//! engine and the goal catalog can query everything they need without hard
//! coupling to concrete implementations.
mod grid;
mod map;
mod path;
mod rng;
mod vision;

pub use grid::GridMap;
pub use map::{MapDimensions, MapOracle, StaticTile, TerrainKind};
pub use path::PathOracle;
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use vision::VisionOracle;

/// Aggregates read-only oracles required by the engine and AI.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub map: &'a dyn MapOracle,
    pub vision: &'a dyn VisionOracle,
    pub paths: &'a dyn PathOracle,
    pub rng: &'a dyn RngOracle,
}

impl<'a> Env<'a> {
    pub fn new(
        map: &'a dyn MapOracle,
        vision: &'a dyn VisionOracle,
        paths: &'a dyn PathOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self {
            map,
            vision,
            paths,
            rng,
        }
    }

    /// Builds an environment where one value serves map, vision and paths.
    pub fn with_grid<G>(grid: &'a G, rng: &'a dyn RngOracle) -> Self
    where
        G: MapOracle + VisionOracle + PathOracle,
    {
        Self::new(grid, grid, grid, rng)
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("dimensions", &self.map.dimensions())
            .finish_non_exhaustive()
    }
}
