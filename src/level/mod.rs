//! Level tile grid
//!
//! The grid is the primary source of static collision. Physics only sees it
//! through [`TileMap`]: cells are looked up when a body needs them and cells
//! outside the grid read as [`BlockKind::Boundary`].

pub mod block;

pub use block::{Block, BlockKind, Direction};

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LevelError;
use crate::physics::TileMap;

/// Countdown before a fresh barbecue fires its first brochette
const FIRST_SPAWN_TICKS: std::ops::RangeInclusive<u32> = 5..=30;
/// Countdown between two brochettes of the same barbecue
const RESPAWN_TICKS: std::ops::RangeInclusive<u32> = 60..=90;

/// Things placed on the grid that are not tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Where the player appears
    Spawn,
    /// Weapon pickup
    Ak47,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedObject {
    pub kind: ObjectKind,
    pub cell: IVec2,
}

/// Brochette timer attached to a fiery barbecue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawner {
    pub cell: IVec2,
    pub direction: Direction,
    /// Ticks until the next brochette, armed on first update
    pub next_spawn: Option<u32>,
}

/// A brochette the level wants spawned this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    /// World position of the barbecue's top-left corner
    pub pos: Vec2,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    /// Grid size in cells
    pub size: IVec2,
    pub block_size: f32,
    /// Row-major
    grid: Vec<Block>,
    pub objects: Vec<PlacedObject>,
    spawners: Vec<Spawner>,
    /// Memoized 3x3 neighbour keys for auto-tiling
    neighbour_cache: HashMap<IVec2, String>,
}

impl Level {
    /// All-air level
    pub fn new(name: impl Into<String>, size: IVec2, block_size: f32) -> Self {
        let size = size.max(IVec2::ZERO);
        let mut grid = Vec::with_capacity(cell_count(size));
        for y in 0..size.y {
            for x in 0..size.x {
                grid.push(Block::new(BlockKind::Air, IVec2::new(x, y)));
            }
        }
        Self {
            name: name.into(),
            size,
            block_size,
            grid,
            objects: Vec::new(),
            spawners: Vec::new(),
            neighbour_cache: HashMap::new(),
        }
    }

    /// Fresh editor level: stone walls and ceiling, barbecue floor, spawn in
    /// the middle
    pub fn bordered(name: impl Into<String>, size: IVec2, block_size: f32) -> Self {
        let mut level = Self::new(name, size, block_size);
        for y in 0..level.size.y {
            for x in 0..level.size.x {
                let kind = if y == level.size.y - 1 {
                    BlockKind::Barbecue
                } else if x == 0 || x == level.size.x - 1 || y == 0 {
                    BlockKind::Stone
                } else {
                    continue;
                };
                level.set_block(IVec2::new(x, y), kind);
            }
        }
        level.add_object(level.size / 2, ObjectKind::Spawn);
        level
    }

    /// Build a level from rows of block characters. `P` marks the player
    /// spawn and `K` an AK47, both on air. Without `P` the player starts in
    /// the middle of the grid.
    pub fn from_rows(name: impl Into<String>, rows: &[&str], block_size: f32) -> Result<Self, LevelError> {
        let name = name.into();
        let width = match rows.first() {
            Some(row) => row.chars().count(),
            None => return Err(LevelError::Empty(name)),
        };
        if width == 0 {
            return Err(LevelError::Empty(name));
        }

        let size = grid_size(&name, width, rows.len())?;
        let mut level = Self::new(name, size, block_size);
        let mut spawn = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(LevelError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = IVec2::new(x as i32, y as i32);
                match ch {
                    'P' => spawn = Some(cell),
                    'K' => level.add_object(cell, ObjectKind::Ak47),
                    _ => {
                        let kind = BlockKind::from_char(ch).ok_or(LevelError::UnknownBlock { ch, x, y })?;
                        level.set_block(cell, kind);
                    }
                }
            }
        }

        level.add_object(spawn.unwrap_or(level.size / 2), ObjectKind::Spawn);
        log::info!(
            "Level {} loaded: {}x{} cells, spawn at {:?}",
            level.name,
            level.size.x,
            level.size.y,
            level.spawn_cell()
        );
        Ok(level)
    }

    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.size.x as usize + cell.x as usize)
    }

    /// Block at `cell`, or a boundary block outside the grid
    pub fn get_block(&self, cell: IVec2) -> Block {
        match self.index(cell) {
            Some(i) => self.grid[i],
            None => Block::boundary(cell),
        }
    }

    /// Rows of blocks, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.grid.chunks(self.size.x.max(1) as usize)
    }

    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    /// Cell the player spawns in
    pub fn spawn_cell(&self) -> IVec2 {
        self.objects
            .iter()
            .find(|o| o.kind == ObjectKind::Spawn)
            .map(|o| o.cell)
            .unwrap_or(self.size / 2)
    }

    /// World position the player spawns at
    pub fn world_start(&self) -> Vec2 {
        self.map_to_world(self.spawn_cell())
    }

    /// Replace the block at `cell`. Returns false outside the grid.
    pub fn set_block(&mut self, cell: IVec2, kind: BlockKind) -> bool {
        let Some(i) = self.index(cell) else {
            return false;
        };
        self.grid[i] = Block::new(kind, cell);

        self.spawners.retain(|s| s.cell != cell);
        if let BlockKind::FieryBarbecue(direction) = kind {
            self.spawners.push(Spawner {
                cell,
                direction,
                next_spawn: None,
            });
        }

        self.clean_cache_around(cell);
        true
    }

    /// Clear a cell back to air and drop any object placed on it
    pub fn erase(&mut self, cell: IVec2) -> bool {
        if !self.set_block(cell, BlockKind::Air) {
            return false;
        }
        self.objects.retain(|o| o.cell != cell);
        true
    }

    /// Place an object. There is a single spawn; other objects are never
    /// stacked twice on the same cell.
    pub fn add_object(&mut self, cell: IVec2, kind: ObjectKind) {
        match kind {
            ObjectKind::Spawn => self.objects.retain(|o| o.kind != ObjectKind::Spawn),
            _ => {
                if self.objects.iter().any(|o| o.kind == kind && o.cell == cell) {
                    return;
                }
            }
        }
        self.objects.push(PlacedObject { kind, cell });
    }

    /// 3x3 neighbourhood of `cell` as block characters, row by row
    pub fn neighbourhood(&mut self, cell: IVec2) -> &str {
        if !self.neighbour_cache.contains_key(&cell) {
            let mut key = String::with_capacity(9);
            for dy in -1..=1 {
                for dx in -1..=1 {
                    key.push(self.get_block(cell + IVec2::new(dx, dy)).character());
                }
            }
            self.neighbour_cache.insert(cell, key);
        }
        &self.neighbour_cache[&cell]
    }

    /// Forget cached neighbour keys that depend on `cell`
    pub fn clean_cache_around(&mut self, cell: IVec2) {
        for dx in -1..=1 {
            for dy in -1..=1 {
                self.neighbour_cache.remove(&(cell + IVec2::new(dx, dy)));
            }
        }
    }

    pub fn cached_neighbourhoods(&self) -> usize {
        self.neighbour_cache.len()
    }

    /// Advance barbecue timers; returns the brochettes to spawn this tick
    pub fn internal_logic(&mut self, rng: &mut impl Rng) -> Vec<SpawnRequest> {
        let block_size = self.block_size;
        let mut requests = Vec::new();

        for spawner in &mut self.spawners {
            let remaining = spawner
                .next_spawn
                .unwrap_or_else(|| rng.random_range(FIRST_SPAWN_TICKS))
                .saturating_sub(1);

            if remaining == 0 {
                requests.push(SpawnRequest {
                    pos: spawner.cell.as_vec2() * block_size,
                    direction: spawner.direction,
                });
                spawner.next_spawn = Some(rng.random_range(RESPAWN_TICKS));
            } else {
                spawner.next_spawn = Some(remaining);
            }
        }

        if !requests.is_empty() {
            log::debug!("Level {} spawning {} brochette(s)", self.name, requests.len());
        }
        requests
    }
}

/// Number of cells in a grid of `size`, computed without i32 overflow
fn cell_count(size: IVec2) -> usize {
    size.x.max(0) as usize * size.y.max(0) as usize
}

/// Grid size for `width` x `height` characters
fn grid_size(name: &str, width: usize, height: usize) -> Result<IVec2, LevelError> {
    match (i32::try_from(width), i32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok(IVec2::new(w, h)),
        _ => Err(LevelError::TooLarge {
            name: name.to_string(),
            width,
            height,
        }),
    }
}

impl TileMap for Level {
    fn block_size(&self) -> f32 {
        self.block_size
    }

    fn is_solid(&self, cell: IVec2) -> bool {
        self.get_block(cell).solid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_BLOCK_SIZE;
    use crate::physics::{Aabb, Body, Collision, Space};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level(rows: &[&str]) -> Level {
        Level::from_rows("test", rows, DEFAULT_BLOCK_SIZE).unwrap()
    }

    #[test]
    fn test_out_of_bounds_is_solid() {
        let level = level(&["...", "..."]);
        for cell in [IVec2::new(-1, 0), IVec2::new(3, 0), IVec2::new(0, -1), IVec2::new(0, 2)] {
            let block = level.get_block(cell);
            assert!(block.solid());
            assert_eq!(block.kind, BlockKind::Boundary);
            assert!(level.is_solid(cell));
        }
        assert!(!level.is_solid(IVec2::new(1, 1)));
    }

    #[test]
    fn test_from_rows_objects_and_spawn() {
        let level = level(&["SSSS", "SPKS", "SBBS"]);
        assert_eq!(level.spawn_cell(), IVec2::new(1, 1));
        assert_eq!(level.world_start(), Vec2::new(32.0, 32.0));
        assert!(level
            .objects
            .iter()
            .any(|o| o.kind == ObjectKind::Ak47 && o.cell == IVec2::new(2, 1)));
        assert_eq!(level.get_block(IVec2::new(2, 1)).kind, BlockKind::Air);
        assert_eq!(level.get_block(IVec2::new(1, 2)).kind, BlockKind::Barbecue);
    }

    #[test]
    fn test_from_rows_errors() {
        assert_eq!(
            Level::from_rows("x", &[], 32.0).unwrap_err(),
            LevelError::Empty("x".into())
        );
        assert_eq!(
            Level::from_rows("x", &["...", ".."], 32.0).unwrap_err(),
            LevelError::Ragged { row: 1, expected: 3, found: 2 }
        );
        assert_eq!(
            Level::from_rows("x", &["..?"], 32.0).unwrap_err(),
            LevelError::UnknownBlock { ch: '?', x: 2, y: 0 }
        );
    }

    #[test]
    fn test_huge_grid_dimensions() {
        assert_eq!(cell_count(IVec2::new(50_000, 50_000)), 2_500_000_000);
        assert_eq!(cell_count(IVec2::new(-3, 4)), 0);
        assert_eq!(grid_size("x", 3, 2), Ok(IVec2::new(3, 2)));
        assert_eq!(
            grid_size("x", usize::MAX, 1),
            Err(LevelError::TooLarge {
                name: "x".into(),
                width: usize::MAX,
                height: 1
            })
        );

        // Far-out cells of a real level stay boundary
        let level = level(&["..", ".."]);
        assert_eq!(level.get_block(IVec2::splat(i32::MAX)).kind, BlockKind::Boundary);
        assert_eq!(level.get_block(IVec2::splat(i32::MIN)).kind, BlockKind::Boundary);
    }

    #[test]
    fn test_world_map_conversion() {
        let level = level(&["...."]);
        assert_eq!(level.world_to_map(Vec2::new(33.0, -0.5)), IVec2::new(1, -1));
        assert_eq!(level.map_to_world(IVec2::new(2, 3)), Vec2::new(64.0, 96.0));
        assert_eq!(
            level.block_world_rect(IVec2::new(1, 0)),
            Aabb::from_xywh(32.0, 0.0, 32.0, 32.0)
        );
    }

    #[test]
    fn test_bordered_level() {
        let level = Level::bordered("edit", IVec2::new(6, 5), 32.0);
        assert_eq!(level.get_block(IVec2::new(0, 2)).kind, BlockKind::Stone);
        assert_eq!(level.get_block(IVec2::new(3, 0)).kind, BlockKind::Stone);
        assert_eq!(level.get_block(IVec2::new(3, 4)).kind, BlockKind::Barbecue);
        assert_eq!(level.get_block(IVec2::new(2, 2)).kind, BlockKind::Air);
        assert_eq!(level.spawn_cell(), IVec2::new(3, 2));
    }

    #[test]
    fn test_neighbourhood_cache_invalidation() {
        let mut level = level(&["....", ".DD.", "...."]);
        assert_eq!(level.neighbourhood(IVec2::new(1, 1)), "....DD...");
        assert_eq!(level.neighbourhood(IVec2::new(3, 2)), "D.#..####");
        assert_eq!(level.cached_neighbourhoods(), 2);

        level.set_block(IVec2::new(2, 2), BlockKind::Stone);
        // (1, 1) and (3, 2) are both next to (2, 2)
        assert_eq!(level.cached_neighbourhoods(), 0);
        assert_eq!(level.neighbourhood(IVec2::new(1, 1)), "....DD..S");
    }

    #[test]
    fn test_erase_removes_objects() {
        let mut level = level(&["DK.", "..."]);
        assert!(level.erase(IVec2::new(1, 0)));
        assert!(level.objects.iter().all(|o| o.kind != ObjectKind::Ak47));
        assert!(level.erase(IVec2::new(0, 0)));
        assert_eq!(level.get_block(IVec2::ZERO).kind, BlockKind::Air);
        assert!(!level.erase(IVec2::new(9, 9)));
        assert!(!level.set_block(IVec2::new(-1, 0), BlockKind::Dirt));
    }

    #[test]
    fn test_add_object_rules() {
        let mut level = level(&["...", "..."]);
        level.add_object(IVec2::new(0, 0), ObjectKind::Spawn);
        level.add_object(IVec2::new(2, 1), ObjectKind::Spawn);
        level.add_object(IVec2::new(1, 1), ObjectKind::Ak47);
        level.add_object(IVec2::new(1, 1), ObjectKind::Ak47);
        assert_eq!(level.objects.len(), 2);
        assert_eq!(level.spawn_cell(), IVec2::new(2, 1));
    }

    #[test]
    fn test_spawner_timing() {
        let mut level = level(&[".>.", "..."]);
        assert_eq!(level.spawners().len(), 1);
        let mut rng = Pcg32::seed_from_u64(7);

        let mut first = None;
        for tick in 1..=30 {
            let requests = level.internal_logic(&mut rng);
            if !requests.is_empty() {
                assert_eq!(requests[0].pos, Vec2::new(32.0, 0.0));
                assert_eq!(requests[0].direction, Direction::Right);
                first = Some(tick);
                break;
            }
        }
        let first = first.expect("barbecue should fire within 30 ticks");
        assert!((5..=30).contains(&first));

        let rearmed = level.spawners()[0].next_spawn.unwrap();
        assert!((60..=90).contains(&rearmed));
    }

    #[test]
    fn test_replacing_barbecue_drops_spawner() {
        let mut level = level(&["^.."]);
        level.set_block(IVec2::ZERO, BlockKind::Dirt);
        assert!(level.spawners().is_empty());
    }

    #[test]
    fn test_level_as_tile_map() {
        let level = level(&[
            "S....S",
            "S....S",
            "S....S",
            "SSSSSS",
        ]);
        let mut space: Space = Space::new(Vec2::new(0.0, 1.0));
        let id = space.add(Body::new(Aabb::from_xywh(40.0, 10.0, 20.0, 20.0)));
        for _ in 0..60 {
            space.simulate(&level);
        }
        let body = space.get(id).unwrap();
        assert_eq!(body.shape.bottom(), 96.0);
        assert!(body.collide_down);
        assert!(body.collisions.iter().any(|c| matches!(c, Collision::Tile(cell) if cell.y == 3)));
    }
}
