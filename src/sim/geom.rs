//! Axis-aligned rectangles in world space
//!
//! World coordinates grow right (x) and down (y), like screen space.
//! Entity rectangles are anchored at whole units so that surface
//! distances come out exact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with non-negative size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    /// Rectangle of `size` whose bottom edge is centered on `anchor`.
    ///
    /// The anchor is floored first, matching how sprites snap to whole pixels.
    pub fn from_bottom_center(anchor: Vec2, size: Vec2) -> Self {
        let cx = anchor.x.floor();
        let bottom = anchor.y.floor();
        Self::new(cx - (size.x / 2.0).floor(), bottom - size.y, size.x, size.y)
    }

    /// Rectangle of `size` centered on `anchor` (floored)
    pub fn from_center(anchor: Vec2, size: Vec2) -> Self {
        let cx = anchor.x.floor();
        let cy = anchor.y.floor();
        Self::new(
            cx - (size.x / 2.0).floor(),
            cy - (size.y / 2.0).floor(),
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// True if the two rectangles overlap with positive area.
    /// Touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.y < other.bottom()
            && self.right() > other.x
            && self.bottom() > other.y
    }

    /// True if `other` lies entirely inside this rectangle (edges inclusive)
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// True if the rectangles overlap horizontally (strict)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        other.x < self.right() && self.x < other.right()
    }

    /// Grow (or shrink, for negative amounts) around the center
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        Self::new(
            self.x - dw / 2.0,
            self.y - dh / 2.0,
            self.w + dw,
            self.h + dh,
        )
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Self {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }
}
