//! Block catalogue
//!
//! A block is a tile of the level grid. Its behaviour is fully described by
//! its [`BlockKind`]; there is no per-block state apart from the grid cell.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Facing of a fiery barbecue, also the flight direction of its brochettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector in world space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Sprite rotation in degrees
    pub fn rotation(self) -> i32 {
        match self {
            Direction::Up => 0,
            Direction::Down => 180,
            Direction::Left => 90,
            Direction::Right => -90,
        }
    }

    pub fn character(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Down => 'V',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }
}

/// Every kind of tile a level can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Air,
    Dirt,
    Stone,
    /// Solid and deadly
    Barbecue,
    /// Deadly flames that shoot brochettes, can be walked through
    FieryBarbecue(Direction),
    /// Touching it ends the level
    End,
    /// What lies outside the grid: an impassable wall
    Boundary,
}

impl BlockKind {
    /// Parse a level character. `None` for characters that are not blocks.
    pub fn from_char(ch: char) -> Option<Self> {
        let kind = match ch {
            '.' => BlockKind::Air,
            'D' => BlockKind::Dirt,
            'S' => BlockKind::Stone,
            'B' => BlockKind::Barbecue,
            'E' => BlockKind::End,
            '^' => BlockKind::FieryBarbecue(Direction::Up),
            'V' => BlockKind::FieryBarbecue(Direction::Down),
            '<' => BlockKind::FieryBarbecue(Direction::Left),
            '>' => BlockKind::FieryBarbecue(Direction::Right),
            _ => return None,
        };
        Some(kind)
    }

    pub fn character(self) -> char {
        match self {
            BlockKind::Air => '.',
            BlockKind::Dirt => 'D',
            BlockKind::Stone => 'S',
            BlockKind::Barbecue => 'B',
            BlockKind::FieryBarbecue(dir) => dir.character(),
            BlockKind::End => 'E',
            BlockKind::Boundary => '#',
        }
    }

    pub fn solid(self) -> bool {
        matches!(
            self,
            BlockKind::Dirt | BlockKind::Stone | BlockKind::Barbecue | BlockKind::End | BlockKind::Boundary
        )
    }

    pub fn deadly(self) -> bool {
        matches!(self, BlockKind::Barbecue | BlockKind::FieryBarbecue(_))
    }

    pub fn visible(self) -> bool {
        !matches!(self, BlockKind::Air | BlockKind::Boundary)
    }

    /// Sprite rotation in degrees
    pub fn rotation(self) -> i32 {
        match self {
            BlockKind::FieryBarbecue(dir) => dir.rotation(),
            _ => 0,
        }
    }
}

/// A tile and the grid cell it sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    pub pos: IVec2,
}

impl Block {
    pub fn new(kind: BlockKind, pos: IVec2) -> Self {
        Self { kind, pos }
    }

    /// The block reported for cells outside the grid
    pub fn boundary(pos: IVec2) -> Self {
        Self::new(BlockKind::Boundary, pos)
    }

    #[inline]
    pub fn solid(&self) -> bool {
        self.kind.solid()
    }

    #[inline]
    pub fn deadly(&self) -> bool {
        self.kind.deadly()
    }

    #[inline]
    pub fn character(&self) -> char {
        self.kind.character()
    }
}
