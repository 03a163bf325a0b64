//! 2D vector helpers
//!
//! Positions, velocities and forces are plain `glam::Vec2` values (aliased
//! as [`Pos`]). Arithmetic, norms, equality and the unit constants come from
//! glam; [`PosExt`] adds the handful of operations the game code relies on
//! with semantics glam does not provide.

use glam::{IVec2, Vec2};

use crate::error::PhysicsError;

/// A 2D vector in world units (y grows downward)
pub type Pos = Vec2;

/// Extra vector operations used by the physics and game layers
pub trait PosExt: Sized {
    /// Rotate by `degrees` using the game's historical convention:
    /// `(c·x + s·y, s·x − c·y)`.
    ///
    /// This is a rotation composed with a reflection of the y axis, not a
    /// pure rotation.
    fn rotate_deg(self, degrees: f32) -> Self;

    /// Component-wise floor division
    fn floor_div(self, rhs: f32) -> Self;

    /// Unit vector in the same direction, or an error for the zero vector
    fn try_normalise(self) -> Result<Self, PhysicsError>;

    /// Keep only the x component
    fn horizontal(self) -> Self;

    /// Keep only the y component
    fn vertical(self) -> Self;

    /// Round each component to the nearest integer
    fn rounded(self) -> IVec2;
}

impl PosExt for Vec2 {
    #[inline]
    fn rotate_deg(self, degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Vec2::new(c * self.x + s * self.y, s * self.x - c * self.y)
    }

    #[inline]
    fn floor_div(self, rhs: f32) -> Self {
        (self / rhs).floor()
    }

    fn try_normalise(self) -> Result<Self, PhysicsError> {
        let norm = self.length();
        if norm == 0.0 {
            return Err(PhysicsError::ZeroLengthVector);
        }
        Ok(self / norm)
    }

    #[inline]
    fn horizontal(self) -> Self {
        Vec2::new(self.x, 0.0)
    }

    #[inline]
    fn vertical(self) -> Self {
        Vec2::new(0.0, self.y)
    }

    #[inline]
    fn rounded(self) -> IVec2 {
        self.round().as_ivec2()
    }
}
