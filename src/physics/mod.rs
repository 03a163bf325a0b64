//! AABB physics core
//!
//! Discrete, single-threaded and deterministic:
//! - Bodies move one axis at a time (X then Y)
//! - Tile obstacles are derived on demand from a [`TileMap`]
//! - Projectiles are stepped before moving bodies every tick

pub mod aabb;
pub mod body;
pub mod space;
pub mod vector;

pub use aabb::{AaSegment, Aabb, Axis};
pub use body::{Body, BodyId, BodyKind, Candidate, Collision, MaxVelocity};
pub use space::{Entity, OpenSpace, Space, TileMap, collision_candidates};
pub use vector::{Pos, PosExt};
