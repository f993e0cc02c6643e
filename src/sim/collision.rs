//! Axis-aligned collision tests
//!
//! Every entity on the road is a box whose `pos` is its top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// True when the two boxes share interior area. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(*self, *other)
    }
}

/// Strict AABB overlap test
#[inline]
pub fn aabb_overlap(a: Rect, b: Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// Corner-distance approximation used by the first prototype of the game.
///
/// Compares top-left corners against the given extents, which only matches
/// `aabb_overlap` when both boxes have exactly that size. Kept for parity
/// checks against old replays; the simulation never calls it.
pub fn legacy_corner_distance_overlap(a: Vec2, b: Vec2, width: f32, height: f32) -> bool {
    (a.x - b.x).abs() < width && (a.y - b.y).abs() < height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 6.0, 6.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_legacy_differs_for_small_boxes() {
        // A small projectile well clear of a car's left edge: the corner test
        // still reports a hit because it assumes both boxes are car-sized.
        let car = Rect::new(100.0, 100.0, 60.0, 100.0);
        let shot = Rect::new(45.0, 150.0, 6.0, 6.0);
        assert!(!car.overlaps(&shot));
        assert!(legacy_corner_distance_overlap(car.pos, shot.pos, 60.0, 100.0));
    }

    #[test]
    fn test_legacy_matches_for_equal_boxes() {
        let a = Rect::new(100.0, 100.0, 60.0, 100.0);
        for (x, y) in [(130.0, 150.0), (161.0, 100.0), (100.0, 199.0), (40.0, 0.0)] {
            let b = Rect::new(x, y, 60.0, 100.0);
            assert_eq!(
                a.overlaps(&b),
                legacy_corner_distance_overlap(a.pos, b.pos, 60.0, 100.0)
            );
        }
    }

    #[test]
    fn test_center() {
        let r = Rect::new(10.0, 20.0, 60.0, 100.0);
        assert_eq!(r.center(), Vec2::new(40.0, 70.0));
    }
}
