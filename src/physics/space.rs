//! The simulation step
//!
//! A [`Space`] owns every moving body and projectile and advances them once
//! per call to [`Space::simulate`]. Static collision comes mostly from a
//! [`TileMap`] that is borrowed for the duration of the step and queried
//! fresh for each body and axis; nothing about the tiles is cached.

use glam::{IVec2, Vec2};

use super::aabb::Aabb;
use super::body::{Body, BodyId, Candidate, Collision};
use super::vector::PosExt;
use crate::consts::DEFAULT_BLOCK_SIZE;

/// Read-only view of a tile grid for collision purposes
pub trait TileMap {
    /// Edge length of one square tile in world units
    fn block_size(&self) -> f32;

    /// Whether the tile at `cell` blocks movement. Cells outside the grid
    /// must report solid so the level edge acts as a wall.
    fn is_solid(&self, cell: IVec2) -> bool;

    fn world_to_map(&self, pos: Vec2) -> IVec2 {
        pos.floor_div(self.block_size()).as_ivec2()
    }

    fn map_to_world(&self, cell: IVec2) -> Vec2 {
        cell.as_vec2() * self.block_size()
    }

    fn block_world_rect(&self, cell: IVec2) -> Aabb {
        Aabb::new(self.map_to_world(cell), Vec2::splat(self.block_size()))
    }
}

/// A tile map without any tiles, for spaces that only use static obstacles
#[derive(Debug, Clone, Copy)]
pub struct OpenSpace {
    pub block_size: f32,
}

impl Default for OpenSpace {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl TileMap for OpenSpace {
    fn block_size(&self) -> f32 {
        self.block_size
    }

    fn is_solid(&self, _cell: IVec2) -> bool {
        false
    }
}

/// Game-side behaviour attached to a body
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Runs once per tick before the body moves. Setting `dead` here removes
    /// the entity without moving it.
    fn internal_logic(&mut self, _gravity: Vec2) {}
}

impl Entity for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

/// Obstacles that may touch `shape`: every solid tile in the cell window
/// around it (one cell of margin) plus the static boxes overlapping that
/// window.
pub fn collision_candidates<M: TileMap + ?Sized>(
    map: &M,
    statics: &[Aabb],
    shape: &Aabb,
) -> Vec<Candidate> {
    // Far-out positions map to i32::MIN/MAX cells, keep the window in range
    let tl = map.world_to_map(shape.topleft);
    let br = map.world_to_map(shape.bottomright());
    let first = tl.saturating_sub(IVec2::ONE);
    let last = br.saturating_add(IVec2::ONE);

    let mut candidates = Vec::new();
    for x in first.x..=last.x {
        for y in first.y..=last.y {
            let cell = IVec2::new(x, y);
            if map.is_solid(cell) {
                candidates.push(Candidate {
                    shape: map.block_world_rect(cell),
                    source: Collision::Tile(cell),
                });
            }
        }
    }

    if !statics.is_empty() {
        let cells = br.as_vec2() - tl.as_vec2() + Vec2::ONE;
        let window =
            Aabb::new(map.map_to_world(tl), cells * map.block_size()).inflate(map.block_size());
        for (index, shape) in statics.iter().enumerate() {
            if window.collide(shape) {
                candidates.push(Candidate {
                    shape: *shape,
                    source: Collision::Static(index),
                });
            }
        }
    }

    candidates
}

/// Owns the bodies and advances them
#[derive(Debug, Clone)]
pub struct Space<E = Body> {
    /// Force applied to every body with mass, every tick
    pub gravity: Vec2,
    projectiles: Vec<E>,
    moving_bodies: Vec<E>,
    static_bodies: Vec<Aabb>,
    next_id: u32,
}

impl<E: Entity> Default for Space<E> {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl<E: Entity> Space<E> {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            projectiles: Vec::new(),
            moving_bodies: Vec::new(),
            static_bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an entity, filing it as a projectile or a moving body from
    /// its body kind. Returns the id stamped on its body.
    pub fn add(&mut self, mut entity: E) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let body = entity.body_mut();
        body.id = id;
        if body.is_projectile() {
            self.projectiles.push(entity);
        } else {
            self.moving_bodies.push(entity);
        }
        id
    }

    /// Register a fixed obstacle. Returns its index for [`Collision::Static`].
    pub fn add_static(&mut self, shape: Aabb) -> usize {
        self.static_bodies.push(shape);
        self.static_bodies.len() - 1
    }

    pub fn projectiles(&self) -> &[E] {
        &self.projectiles
    }

    pub fn moving_bodies(&self) -> &[E] {
        &self.moving_bodies
    }

    pub fn static_bodies(&self) -> &[Aabb] {
        &self.static_bodies
    }

    /// Projectiles first, then moving bodies
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.projectiles.iter().chain(self.moving_bodies.iter())
    }

    pub fn get(&self, id: BodyId) -> Option<&E> {
        self.iter().find(|e| e.body().id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut E> {
        self.projectiles
            .iter_mut()
            .chain(self.moving_bodies.iter_mut())
            .find(|e| e.body().id == id)
    }

    pub fn len(&self) -> usize {
        self.projectiles.len() + self.moving_bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn possible_collision_for<M: TileMap + ?Sized>(&self, map: &M, body: &Body) -> Vec<Candidate> {
        collision_candidates(map, &self.static_bodies, &body.shape)
    }

    /// Advance one tick: projectiles first, then moving bodies, so a body's
    /// projectile check sees where the projectiles ended up this tick.
    pub fn simulate<M: TileMap + ?Sized>(&mut self, map: &M) {
        let Space {
            gravity,
            projectiles,
            moving_bodies,
            static_bodies,
            ..
        } = self;
        let gravity = *gravity;
        let statics: &[Aabb] = static_bodies;

        projectiles.retain_mut(|proj| {
            proj.internal_logic(gravity);
            if proj.body().dead {
                log::debug!("Removing projectile {:?}", proj.body().id);
                return false;
            }
            step(proj.body_mut(), map, statics, gravity);
            true
        });

        moving_bodies.retain_mut(|entity| {
            entity.internal_logic(gravity);
            if entity.body().dead {
                log::debug!("Removing body {:?}", entity.body().id);
                return false;
            }
            let body = entity.body_mut();
            step(body, map, statics, gravity);

            body.check_collisions(projectiles.iter().map(|p| p.body()));

            let nearby = collision_candidates(map, statics, &body.shape);
            body.update_sensors(&nearby);
            body.update_history();
            true
        });
    }
}

/// Gravity, then X, then Y. Each axis re-queries obstacles at the body's
/// current position.
fn step<M: TileMap + ?Sized>(body: &mut Body, map: &M, statics: &[Aabb], gravity: Vec2) {
    body.collisions.clear();
    if body.mass != 0.0 {
        body.apply_force(gravity);
    }

    let candidates = collision_candidates(map, statics, &body.shape);
    body.update_x(&candidates);
    let candidates = collision_candidates(map, statics, &body.shape);
    body.update_y(&candidates);
}
