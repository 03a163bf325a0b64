//! Axis-aligned boxes
//!
//! Everything that collides is an [`Aabb`]: bodies, tiles, sensor probes.
//! Edges can be assigned directly; assigning an edge moves the box and keeps
//! its size, which is how collision correction snaps a body against an
//! obstacle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the two world axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Mutable component of `v` along this axis
    #[inline]
    pub fn of_mut(self, v: &mut Vec2) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
        }
    }
}

/// Axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub topleft: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(topleft: Vec2, size: Vec2) -> Self {
        Self { topleft, size }
    }

    /// Build from `(x, y, w, h)`
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            topleft: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.topleft.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.topleft.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.topleft.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.topleft.y + self.size.y
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.topleft + self.half_size()
    }

    /// Bottom-right corner
    #[inline]
    pub fn bottomright(&self) -> Vec2 {
        self.topleft + self.size
    }

    pub fn set_left(&mut self, value: f32) {
        self.topleft.x = value;
    }

    pub fn set_top(&mut self, value: f32) {
        self.topleft.y = value;
    }

    pub fn set_right(&mut self, value: f32) {
        self.topleft.x = value - self.size.x;
    }

    pub fn set_bottom(&mut self, value: f32) {
        self.topleft.y = value - self.size.y;
    }

    pub fn set_center(&mut self, value: Vec2) {
        self.topleft = value - self.half_size();
    }

    /// Leading (min) edge along `axis`: left or top
    #[inline]
    pub fn min_edge(&self, axis: Axis) -> f32 {
        axis.of(self.topleft)
    }

    /// Trailing (max) edge along `axis`: right or bottom
    #[inline]
    pub fn max_edge(&self, axis: Axis) -> f32 {
        axis.of(self.topleft) + axis.of(self.size)
    }

    /// Move so the min edge along `axis` sits at `value`
    pub fn set_min_edge(&mut self, axis: Axis, value: f32) {
        *axis.of_mut(&mut self.topleft) = value;
    }

    /// Move so the max edge along `axis` sits at `value`
    pub fn set_max_edge(&mut self, axis: Axis, value: f32) {
        *axis.of_mut(&mut self.topleft) = value - axis.of(self.size);
    }

    /// Grow by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Self {
        Self {
            topleft: self.topleft - Vec2::splat(margin),
            size: self.size + Vec2::splat(2.0 * margin),
        }
    }

    /// Strict overlap on both axes. Boxes that only share an edge do not
    /// collide, so `(0, 0, 4, 4)` and `(4, 0, 4, 4)` are apart.
    pub fn collide(&self, other: &Aabb) -> bool {
        if self.right() <= other.left() || other.right() <= self.left() {
            return false;
        }
        if self.bottom() <= other.top() || other.bottom() <= self.top() {
            return false;
        }
        true
    }
}

impl From<(f32, f32, f32, f32)> for Aabb {
    fn from((x, y, w, h): (f32, f32, f32, f32)) -> Self {
        Self::from_xywh(x, y, w, h)
    }
}

/// One-unit-thick axis-aligned probe
///
/// `start`/`end` run along the segment's own axis; `pos` is the shared
/// coordinate on the other axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AaSegment {
    pub shape: Aabb,
    pub vertical: bool,
}

impl AaSegment {
    pub fn new(start: f32, end: f32, pos: f32, vertical: bool) -> Self {
        let lo = start.min(end);
        let len = (start - end).abs();
        let shape = if vertical {
            Aabb::from_xywh(pos, lo, 1.0, len)
        } else {
            Aabb::from_xywh(lo, pos, len, 1.0)
        };
        Self { shape, vertical }
    }

    pub fn vertical(start: f32, end: f32, x: f32) -> Self {
        Self::new(start, end, x, true)
    }

    pub fn horizontal(start: f32, end: f32, y: f32) -> Self {
        Self::new(start, end, y, false)
    }

    pub fn collide(&self, other: &Aabb) -> bool {
        self.shape.collide(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_edge_touch_does_not_collide() {
        let a = Aabb::from_xywh(0.0, 0.0, 4.0, 4.0);
        let b = Aabb::from_xywh(4.0, 0.0, 4.0, 4.0);
        let c = Aabb::from_xywh(0.0, 4.0, 4.0, 4.0);
        assert!(!a.collide(&b));
        assert!(!a.collide(&c));
    }

    #[test]
    fn test_inflate_grows_every_side() {
        let a = Aabb::from_xywh(32.0, 64.0, 32.0, 64.0).inflate(32.0);
        assert_eq!(a, Aabb::from_xywh(0.0, 32.0, 96.0, 128.0));
        assert_eq!(a.center(), Vec2::new(48.0, 96.0));
    }

    #[test]
    fn test_overlap_collides() {
        let a = Aabb::from_xywh(0.0, 0.0, 4.0, 4.0);
        let b = Aabb::from_xywh(2.0, 2.0, 4.0, 4.0);
        assert!(a.collide(&b));
        assert!(b.collide(&a));
    }

    #[test]
    fn test_containment_collides() {
        let outer = Aabb::from_xywh(-10.0, -10.0, 20.0, 20.0);
        let inner = Aabb::from_xywh(0.0, 0.0, 1.0, 1.0);
        assert!(outer.collide(&inner));
    }

    #[test]
    fn test_edge_setters_keep_size() {
        let mut a = Aabb::from((10.0, 20.0, 4.0, 6.0));
        a.set_right(3.0);
        assert_eq!(a.left(), -1.0);
        assert_eq!(a.size, Vec2::new(4.0, 6.0));

        a.set_bottom(0.0);
        assert_eq!(a.top(), -6.0);
        assert_eq!(a.bottom(), 0.0);

        a.set_center(Vec2::ZERO);
        assert_eq!(a.topleft, Vec2::new(-2.0, -3.0));
        assert_eq!(a.center(), Vec2::ZERO);
    }

    #[test]
    fn test_axis_edges() {
        let mut a = Aabb::from_xywh(1.0, 2.0, 3.0, 4.0);
        assert_eq!(a.min_edge(Axis::X), 1.0);
        assert_eq!(a.max_edge(Axis::Y), 6.0);
        a.set_max_edge(Axis::Y, 10.0);
        assert_eq!(a.top(), 6.0);
        a.set_min_edge(Axis::X, 0.0);
        assert_eq!(a.right(), 3.0);
    }

    #[test]
    fn test_segment_shapes() {
        let v = AaSegment::vertical(10.0, 2.0, 5.0);
        assert_eq!(v.shape, Aabb::from_xywh(5.0, 2.0, 1.0, 8.0));
        let h = AaSegment::horizontal(0.0, 4.0, -1.0);
        assert_eq!(h.shape, Aabb::from_xywh(0.0, -1.0, 4.0, 1.0));
    }

    proptest! {
        #[test]
        fn test_collide_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            aw in 0.0f32..50.0, ah in 0.0f32..50.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            bw in 0.0f32..50.0, bh in 0.0f32..50.0,
        ) {
            let a = Aabb::from_xywh(ax, ay, aw, ah);
            let b = Aabb::from_xywh(bx, by, bw, bh);
            prop_assert_eq!(a.collide(&b), b.collide(&a));
        }
    }
}
