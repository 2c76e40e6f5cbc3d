use std::collections::BTreeSet;

use pathfinding::prelude::astar;

use super::{MapDimensions, MapOracle, PathOracle, StaticTile, TerrainKind, VisionOracle};
use crate::state::{ActorState, Position};

/// In-memory rectangular map serving terrain, sight and paths.
///
/// Rows are parsed from text where `#` is a wall, `~` a chasm and anything
/// else floor. Positions outside the rectangle read as walls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
}

impl GridMap {
    /// An all-floor map.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            tiles: vec![TerrainKind::Floor; (width * height) as usize],
        }
    }

    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut map = Self::open(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let terrain = match ch {
                    '#' => TerrainKind::Wall,
                    '~' => TerrainKind::Chasm,
                    _ => TerrainKind::Floor,
                };
                map.set(Position::new(x as i32, y as i32), terrain);
            }
        }
        map
    }

    pub fn with_wall(mut self, position: Position) -> Self {
        self.set(position, TerrainKind::Wall);
        self
    }

    pub fn set(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(index) = self.index(position) {
            self.tiles[index] = terrain;
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| (position.y as u32 * self.dimensions.width + position.x as u32) as usize)
    }

    /// Bresenham walk from `from` to `to`; intermediate tiles must be
    /// transparent. The endpoint itself may be opaque.
    fn line_of_sight(&self, from: Position, to: Position) -> bool {
        let (dx, dy) = ((to.x - from.x).abs(), -(to.y - from.y).abs());
        let (sx, sy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
        let mut err = dx + dy;
        let (mut x, mut y) = (from.x, from.y);

        loop {
            if (x, y) == (to.x, to.y) {
                return true;
            }
            let current = Position::new(x, y);
            if current != from && !self.is_transparent(current) {
                return false;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

impl MapOracle for GridMap {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<StaticTile> {
        self.index(position)
            .map(|index| StaticTile::new(self.tiles[index]))
    }
}

impl VisionOracle for GridMap {
    fn visible_tiles(&self, viewer: &ActorState) -> BTreeSet<Position> {
        let origin = viewer.position;
        let radius = viewer.sight_radius as i32;
        let mut visible = BTreeSet::new();
        for y in (origin.y - radius)..=(origin.y + radius) {
            for x in (origin.x - radius)..=(origin.x + radius) {
                let target = Position::new(x, y);
                if self.contains(target) && self.line_of_sight(origin, target) {
                    visible.insert(target);
                }
            }
        }
        visible
    }

    fn can_see(&self, viewer: &ActorState, target: Position) -> bool {
        viewer.position.distance(target) <= viewer.sight_radius
            && self.contains(target)
            && self.line_of_sight(viewer.position, target)
    }
}

impl PathOracle for GridMap {
    fn path_to(&self, actor: &ActorState, target: Position) -> Option<Vec<Position>> {
        if !self.is_passable(target) {
            return None;
        }
        let (path, _) = astar(
            &actor.position,
            |p| {
                p.neighbors()
                    .map(|(_, n)| n)
                    .filter(|n| self.is_passable(*n))
                    .map(|n| (n, 1u32))
                    .collect::<Vec<_>>()
            },
            |p| p.distance(target),
            |p| *p == target,
        )?;
        Some(path.into_iter().skip(1).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Archetype;
    use crate::state::ActorId;

    fn viewer(at: Position, sight: u32) -> ActorState {
        let archetype = Archetype::new("eye").with_sight(sight);
        ActorState::from_archetype(ActorId(1), &archetype, at)
    }

    #[test]
    fn walls_block_sight_but_not_the_wall_itself() {
        let map = GridMap::from_rows(&[
            ".....", //
            "..#..", //
            ".....",
        ]);
        let eye = viewer(Position::new(0, 1), 8);
        assert!(map.can_see(&eye, Position::new(2, 1)));
        assert!(!map.can_see(&eye, Position::new(4, 1)));
        assert!(map.can_see(&eye, Position::new(4, 0)));
    }

    #[test]
    fn sight_radius_limits_visible_tiles() {
        let map = GridMap::open(10, 10);
        let eye = viewer(Position::new(5, 5), 1);
        assert_eq!(map.visible_tiles(&eye).len(), 9);
    }

    #[test]
    fn paths_route_around_walls() {
        let map = GridMap::from_rows(&[
            ".#.", //
            ".#.", //
            "...",
        ]);
        let walker = viewer(Position::new(0, 0), 8);
        let path = map.path_to(&walker, Position::new(2, 0)).unwrap();
        assert_eq!(path.last(), Some(&Position::new(2, 0)));
        assert_eq!(path.len(), 4);
        assert!(path.iter().all(|p| map.is_passable(*p)));
        assert!(map.path_to(&walker, Position::new(1, 0)).is_none());
    }
}
