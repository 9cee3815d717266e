//! Screen-sized viewport that follows the player

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;

/// Width of the box the player may move in without scrolling
const DEAD_ZONE_WIDTH: f32 = 50.0;
/// Height of that box
const DEAD_ZONE_HEIGHT: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub rect: Rect,
}

impl Camera {
    /// Camera covering the first screen
    pub fn new(screen: Vec2) -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, screen.x, screen.y),
        }
    }

    /// Small box centered on the camera
    pub fn dead_zone(&self) -> Rect {
        self.rect.inflate(
            -self.rect.w + DEAD_ZONE_WIDTH,
            -self.rect.h + DEAD_ZONE_HEIGHT,
        )
    }

    /// Shift the camera by however far `target` sticks out of the dead zone
    pub fn follow(&mut self, target: &Rect) {
        let zone = self.dead_zone();

        let dx = if target.right() > zone.right() {
            target.right() - zone.right()
        } else if target.left() < zone.left() {
            target.left() - zone.left()
        } else {
            0.0
        };

        let dy = if target.bottom() > zone.bottom() {
            target.bottom() - zone.bottom()
        } else if target.top() < zone.top() {
            target.top() - zone.top()
        } else {
            0.0
        };

        self.rect = self.rect.translate(dx, dy);
    }

    /// Region outside which opponents and powerups are discarded
    pub fn keep_bounds(&self) -> Rect {
        self.rect.inflate(self.rect.w, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dead_zone_is_centered() {
        let camera = Camera::new(Vec2::new(800.0, 600.0));
        assert_eq!(camera.dead_zone(), Rect::new(375.0, 250.0, 50.0, 100.0));
    }

    #[test]
    fn test_target_inside_dead_zone_does_not_scroll() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(&Rect::new(380.0, 260.0, 32.0, 38.0));
        assert_eq!(camera.rect, Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_follow_shifts_by_overflow() {
        let mut camera = Camera::new(Vec2::new(800.0, 600.0));
        camera.follow(&Rect::new(420.0, 200.0, 32.0, 38.0));
        // right edge 452 vs zone right 425, top 200 vs zone top 250
        assert_eq!(camera.rect.left(), 27.0);
        assert_eq!(camera.rect.top(), -50.0);
    }

    #[test]
    fn test_keep_bounds_extend_one_screen_sideways() {
        let camera = Camera::new(Vec2::new(800.0, 600.0));
        assert_eq!(camera.keep_bounds(), Rect::new(-400.0, 0.0, 1600.0, 600.0));
    }

    proptest! {
        #[test]
        fn prop_followed_target_ends_in_dead_zone(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
        ) {
            let mut camera = Camera::new(Vec2::new(800.0, 600.0));
            let target = Rect::new(x.floor(), y.floor(), 32.0, 38.0);
            camera.follow(&target);
            prop_assert!(camera.dead_zone().contains(&target));
        }
    }
}
