//! Moving bodies and per-axis collision resolution

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::aabb::{AaSegment, Aabb, Axis};
use crate::clamp;

/// Handle assigned to a body when it is added to a [`Space`](super::Space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BodyId(pub u32);

/// How the space treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyKind {
    /// Ground/wall aware mover (the player)
    #[default]
    Moving,
    /// Mover without sensors: pickups, hazards, particles
    Projectile,
}

/// Per-axis speed limit, `None` means unclamped
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MaxVelocity {
    pub x: Option<f32>,
    pub y: Option<f32>,
}

impl MaxVelocity {
    pub const NONE: Self = Self { x: None, y: None };

    pub const fn new(x: Option<f32>, y: Option<f32>) -> Self {
        Self { x, y }
    }
}

/// What a body touched during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// A solid tile at this grid cell
    Tile(IVec2),
    /// A static obstacle registered with the space, by index
    Static(usize),
    /// An overlapping projectile
    Projectile(BodyId),
}

/// An obstacle near a body and where it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub shape: Aabb,
    pub source: Collision,
}

/// A physics-driven entity
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub shape: Aabb,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// 0 makes forces act directly as acceleration
    pub mass: f32,
    /// Fraction of velocity kept (and reversed) on impact
    pub elasticity: f32,
    pub max_velocity: MaxVelocity,

    pub collide_left: bool,
    pub collide_right: bool,
    pub collide_top: bool,
    pub collide_down: bool,

    /// Ticks since each sensor last fired
    pub last_collide_left: u32,
    pub last_collide_right: u32,
    pub last_collide_top: u32,
    pub last_collide_down: u32,

    /// Rebuilt on every simulated tick
    pub collisions: Vec<Collision>,
    /// Removed from its space at the next simulate
    pub dead: bool,
}

impl Body {
    pub fn new(shape: Aabb) -> Self {
        Self {
            id: BodyId::default(),
            kind: BodyKind::Moving,
            shape,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            elasticity: 0.0,
            max_velocity: MaxVelocity::NONE,
            collide_left: false,
            collide_right: false,
            collide_top: false,
            collide_down: false,
            last_collide_left: 0,
            last_collide_right: 0,
            last_collide_top: 0,
            last_collide_down: 0,
            collisions: Vec::new(),
            dead: false,
        }
    }

    /// A body with sensors disabled
    pub fn projectile(shape: Aabb) -> Self {
        Self {
            kind: BodyKind::Projectile,
            ..Self::new(shape)
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: MaxVelocity) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn topleft(&self) -> Vec2 {
        self.shape.topleft
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.shape.center()
    }

    pub fn set_center(&mut self, value: Vec2) {
        self.shape.set_center(value);
    }

    #[inline]
    pub fn is_projectile(&self) -> bool {
        self.kind == BodyKind::Projectile
    }

    /// Accumulate a force for the next integration. Massless bodies take the
    /// force as an acceleration as-is.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.mass == 0.0 {
            self.acceleration += force;
        } else {
            self.acceleration += force / self.mass;
        }
    }

    pub fn clamp_speed(&mut self) {
        if let Some(max) = self.max_velocity.x {
            self.velocity.x = clamp(self.velocity.x, -max, max);
        }
        if let Some(max) = self.max_velocity.y {
            self.velocity.y = clamp(self.velocity.y, -max, max);
        }
    }

    /// Integrate along one axis and push the body out of whatever it now
    /// overlaps, snapping the leading edge to the obstacle.
    pub fn update_axis(&mut self, axis: Axis, candidates: &[Candidate]) {
        *axis.of_mut(&mut self.velocity) += axis.of(self.acceleration);
        self.clamp_speed();
        *axis.of_mut(&mut self.shape.topleft) += axis.of(self.velocity);

        let hits: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| self.shape.collide(&c.shape))
            .collect();

        let speed = axis.of(self.velocity);
        if speed > 0.0 {
            for hit in hits {
                let edge = hit.shape.min_edge(axis);
                if edge < self.shape.max_edge(axis) {
                    self.shape.set_max_edge(axis, edge);
                    *axis.of_mut(&mut self.velocity) *= -self.elasticity;
                    self.collisions.push(hit.source);
                }
            }
        } else if speed < 0.0 {
            for hit in hits {
                let edge = hit.shape.max_edge(axis);
                if self.shape.min_edge(axis) < edge {
                    self.shape.set_min_edge(axis, edge);
                    *axis.of_mut(&mut self.velocity) *= -self.elasticity;
                    self.collisions.push(hit.source);
                }
            }
        }

        *axis.of_mut(&mut self.acceleration) = 0.0;
    }

    pub fn update_x(&mut self, candidates: &[Candidate]) {
        self.update_axis(Axis::X, candidates);
    }

    pub fn update_y(&mut self, candidates: &[Candidate]) {
        self.update_axis(Axis::Y, candidates);
    }

    /// Record every overlapping projectile. Nothing is moved.
    pub fn check_collisions<'a>(&mut self, projectiles: impl IntoIterator<Item = &'a Body>) {
        for proj in projectiles {
            if self.shape.collide(&proj.shape) {
                self.collisions.push(Collision::Projectile(proj.id));
            }
        }
    }

    /// Probe one unit outside each edge for nearby obstacles
    pub fn update_sensors(&mut self, candidates: &[Candidate]) {
        if self.is_projectile() {
            return;
        }

        let s = self.shape;
        let left = AaSegment::vertical(s.top(), s.bottom(), s.left() - 1.0);
        let right = AaSegment::vertical(s.top(), s.bottom(), s.right() + 1.0);
        let top = AaSegment::horizontal(s.left(), s.right(), s.top() - 1.0);
        let bottom = AaSegment::horizontal(s.left(), s.right(), s.bottom() + 1.0);

        let touches = |probe: &AaSegment| candidates.iter().any(|c| probe.collide(&c.shape));
        self.collide_left = touches(&left);
        self.collide_right = touches(&right);
        self.collide_top = touches(&top);
        self.collide_down = touches(&bottom);
    }

    /// Age every sensor by one tick, then zero the ones firing now
    pub fn update_history(&mut self) {
        self.last_collide_left = self.last_collide_left.saturating_add(1);
        self.last_collide_right = self.last_collide_right.saturating_add(1);
        self.last_collide_top = self.last_collide_top.saturating_add(1);
        self.last_collide_down = self.last_collide_down.saturating_add(1);

        if self.collide_left {
            self.last_collide_left = 0;
        }
        if self.collide_right {
            self.last_collide_right = 0;
        }
        if self.collide_top {
            self.last_collide_top = 0;
        }
        if self.collide_down {
            self.last_collide_down = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_at(top: f32) -> Vec<Candidate> {
        vec![Candidate {
            shape: Aabb::from_xywh(-50.0, top, 100.0, 10.0),
            source: Collision::Static(0),
        }]
    }

    #[test]
    fn test_massless_force_is_acceleration() {
        let mut body = Body::new(Aabb::default()).with_mass(0.0);
        body.apply_force(Vec2::new(0.0, 5.0));
        assert_eq!(body.acceleration, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_force_divides_by_mass() {
        let mut body = Body::new(Aabb::default()).with_mass(2.0);
        body.apply_force(Vec2::new(0.0, 10.0));
        assert_eq!(body.acceleration, Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_elastic_bounce() {
        let mut body = Body::new(Aabb::from_xywh(0.0, -13.0, 10.0, 10.0))
            .with_elasticity(1.0)
            .with_velocity(Vec2::new(0.0, 5.0));
        body.update_y(&floor_at(0.0));
        assert_eq!(body.velocity.y, -5.0);
        assert_eq!(body.shape.bottom(), 0.0);
        assert_eq!(body.collisions, vec![Collision::Static(0)]);
    }

    #[test]
    fn test_inelastic_stop() {
        let mut body = Body::new(Aabb::from_xywh(0.0, -13.0, 10.0, 10.0))
            .with_velocity(Vec2::new(0.0, 5.0));
        body.update_y(&floor_at(0.0));
        assert_eq!(body.velocity.y, 0.0);
        assert_eq!(body.shape.bottom(), 0.0);
    }

    #[test]
    fn test_moving_left_snaps_to_right_edge() {
        let wall = vec![Candidate {
            shape: Aabb::from_xywh(-20.0, 0.0, 10.0, 50.0),
            source: Collision::Tile(IVec2::new(-1, 0)),
        }];
        let mut body = Body::new(Aabb::from_xywh(-8.0, 10.0, 5.0, 5.0))
            .with_velocity(Vec2::new(-4.0, 0.0));
        body.update_x(&wall);
        assert_eq!(body.shape.left(), -10.0);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.collisions, vec![Collision::Tile(IVec2::new(-1, 0))]);
    }

    #[test]
    fn test_acceleration_is_consumed() {
        let mut body = Body::new(Aabb::default());
        body.apply_force(Vec2::new(3.0, 4.0));
        body.update_x(&[]);
        assert_eq!(body.acceleration, Vec2::new(0.0, 4.0));
        body.update_y(&[]);
        assert_eq!(body.acceleration, Vec2::ZERO);
        assert_eq!(body.velocity, Vec2::new(3.0, 4.0));
        assert_eq!(body.topleft(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_max_velocity_clamps_one_axis() {
        let mut body = Body::new(Aabb::default())
            .with_max_velocity(MaxVelocity::new(Some(5.0), None));
        for _ in 0..12 {
            body.apply_force(Vec2::new(1.0, 1.0));
            body.update_x(&[]);
            body.update_y(&[]);
            assert!(body.velocity.x.abs() <= 5.0);
        }
        assert_eq!(body.velocity.x, 5.0);
        assert_eq!(body.velocity.y, 12.0);
    }

    #[test]
    fn test_sensors_detect_ground_and_walls() {
        let mut body = Body::new(Aabb::from_xywh(0.0, -10.0, 10.0, 10.0));
        let shapes = vec![
            // floor directly under
            Candidate { shape: Aabb::from_xywh(-20.0, 0.0, 50.0, 10.0), source: Collision::Static(0) },
            // wall touching the right edge
            Candidate { shape: Aabb::from_xywh(10.0, -40.0, 10.0, 40.0), source: Collision::Static(1) },
        ];
        body.update_sensors(&shapes);
        assert!(body.collide_down);
        assert!(body.collide_right);
        assert!(!body.collide_left);
        assert!(!body.collide_top);
    }

    #[test]
    fn test_projectile_sensors_are_inert() {
        let mut proj = Body::projectile(Aabb::from_xywh(0.0, -10.0, 10.0, 10.0));
        let floor = floor_at(0.0);
        proj.update_sensors(&floor);
        assert!(!proj.collide_down);
    }

    #[test]
    fn test_history_counts_up_and_resets() {
        let mut body = Body::new(Aabb::default());
        let mut seen = Vec::new();
        for touching in [true, true, true, false, false] {
            body.collide_down = touching;
            body.update_history();
            seen.push(body.last_collide_down);
        }
        assert_eq!(seen, vec![0, 0, 0, 1, 2]);
    }
}
