//! Projectiles and the actor enum stored in the space

use glam::{IVec2, Vec2};

use super::player::Player;
use crate::level::Direction;
use crate::physics::{Aabb, Body, Entity};

/// Skewer shot by a fiery barbecue. Flies straight and dies on the first
/// thing it hits.
#[derive(Debug, Clone)]
pub struct Brochette {
    pub body: Body,
    pub direction: Direction,
}

impl Brochette {
    /// `start` is the top-left corner of the barbecue tile
    pub fn new(start: Vec2, direction: Direction, block_size: f32, speed: f32) -> Self {
        let shape = Aabb::new(start + Vec2::ONE, Vec2::splat(block_size - 2.0));
        let body = Body::projectile(shape)
            .with_mass(0.0)
            .with_velocity(direction.unit() * speed);
        Self { body, direction }
    }
}

impl Entity for Brochette {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn internal_logic(&mut self, _gravity: Vec2) {
        if !self.body.collisions.is_empty() {
            self.body.dead = true;
        }
    }
}

/// Weapon lying in the level, waiting to be picked up
#[derive(Debug, Clone)]
pub struct Ak47 {
    pub body: Body,
    pub cell: IVec2,
}

impl Ak47 {
    pub fn new(cell: IVec2, block_size: f32) -> Self {
        let shape = Aabb::new(cell.as_vec2() * block_size, Vec2::splat(block_size));
        Self {
            body: Body::projectile(shape).with_mass(0.0),
            cell,
        }
    }
}

impl Entity for Ak47 {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

/// Everything that lives in the game's space
#[derive(Debug, Clone)]
pub enum Actor {
    Player(Player),
    Brochette(Brochette),
    Ak47(Ak47),
}

impl Actor {
    /// Touching it kills the player
    pub fn deadly(&self) -> bool {
        matches!(self, Actor::Brochette(_))
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Actor::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Actor::Player(p) => Some(p),
            _ => None,
        }
    }
}

impl Entity for Actor {
    fn body(&self) -> &Body {
        match self {
            Actor::Player(p) => p.body(),
            Actor::Brochette(b) => b.body(),
            Actor::Ak47(a) => a.body(),
        }
    }

    fn body_mut(&mut self) -> &mut Body {
        match self {
            Actor::Player(p) => p.body_mut(),
            Actor::Brochette(b) => b.body_mut(),
            Actor::Ak47(a) => a.body_mut(),
        }
    }

    fn internal_logic(&mut self, gravity: Vec2) {
        match self {
            Actor::Player(p) => p.internal_logic(gravity),
            Actor::Brochette(b) => b.internal_logic(gravity),
            Actor::Ak47(a) => a.internal_logic(gravity),
        }
    }
}
