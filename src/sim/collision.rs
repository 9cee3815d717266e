//! Surface distance and line-of-sight queries against static rectangles
//!
//! Queries never fail: "nothing found" is reported as [`BIG_DISTANCE`],
//! which callers must treat as a sentinel rather than a measurement.

use glam::Vec2;

use super::geom::Rect;
use crate::consts::BIG_DISTANCE;

/// Depth of the line-of-sight bisection used by flying opponents
pub const CLEAR_SHOT_DEPTH: u32 = 3;

/// Gap between the bottom of `rect` and the nearest collider top beneath it.
///
/// Only colliders overlapping `rect` horizontally whose top is at or below
/// the rect's bottom count. Returns `BIG_DISTANCE` when there are none.
pub fn distance_to_surface_below(rect: &Rect, colliders: &[Rect]) -> f32 {
    colliders
        .iter()
        .filter(|c| rect.overlaps_x(c) && rect.bottom() <= c.top())
        .map(|c| c.top() - rect.bottom())
        .fold(BIG_DISTANCE, f32::min)
}

/// Gap between the top of `rect` and the nearest collider bottom above it.
pub fn distance_to_surface_above(rect: &Rect, colliders: &[Rect]) -> f32 {
    colliders
        .iter()
        .filter(|c| rect.overlaps_x(c) && c.bottom() <= rect.top())
        .map(|c| rect.top() - c.bottom())
        .fold(BIG_DISTANCE, f32::min)
}

/// True if `rect` overlaps any collider
pub fn collides_any(rect: &Rect, colliders: &[Rect]) -> bool {
    colliders.iter().any(|c| rect.intersects(c))
}

/// Smallest rectangle spanning two points.
///
/// Corners are picked by comparing y first, then x.
pub fn line_of_sight_rect(start: Vec2, dest: Vec2) -> Rect {
    let (top_left, bottom_right) = if start.y < dest.y {
        if start.x < dest.x {
            (start, dest)
        } else {
            (Vec2::new(dest.x, start.y), Vec2::new(start.x, dest.y))
        }
    } else if start.x < dest.x {
        (Vec2::new(start.x, dest.y), Vec2::new(dest.x, start.y))
    } else {
        (dest, start)
    };
    Rect::new(
        top_left.x,
        top_left.y,
        bottom_right.x - top_left.x,
        bottom_right.y - top_left.y,
    )
}

/// Approximate visibility test between two points.
///
/// Collects the colliders touching the segment's bounding rectangle. If
/// there are none the shot is clear; if there are some and `depth` is spent
/// it is blocked; otherwise the segment is bisected and both halves are
/// tested against only the colliders found here.
///
/// This is a conservative approximation and not an exact segment/rectangle
/// test: a collider near the segment's bounding box can block a shot that
/// geometrically misses it. Copter steering is tuned against it.
pub fn has_clear_shot(start: Vec2, dest: Vec2, colliders: &[Rect], depth: u32) -> bool {
    let bounds = line_of_sight_rect(start, dest);
    let hits: Vec<Rect> = colliders
        .iter()
        .filter(|c| bounds.intersects(c))
        .copied()
        .collect();

    if hits.is_empty() {
        return true;
    }
    if depth == 0 {
        return false;
    }

    let midpoint = start + (dest - start) / 2.0;
    has_clear_shot(start, midpoint, &hits, depth - 1)
        && has_clear_shot(midpoint, dest, &hits, depth - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ground() -> Vec<Rect> {
        vec![Rect::new(0.0, 100.0, 200.0, 16.0)]
    }

    #[test]
    fn test_no_surface_below_returns_sentinel() {
        // Off to the side of the only collider
        let rect = Rect::new(300.0, 50.0, 20.0, 20.0);
        assert_eq!(distance_to_surface_below(&rect, &ground()), BIG_DISTANCE);
        assert_eq!(distance_to_surface_below(&rect, &[]), BIG_DISTANCE);
    }

    #[test]
    fn test_resting_on_surface_is_zero() {
        let rect = Rect::new(10.0, 80.0, 20.0, 20.0);
        assert_eq!(distance_to_surface_below(&rect, &ground()), 0.0);
    }

    #[test]
    fn test_surface_below_ignores_colliders_above_bottom() {
        // Bottom already below the ground top: ground no longer counts
        let rect = Rect::new(10.0, 90.0, 20.0, 20.0);
        assert_eq!(distance_to_surface_below(&rect, &ground()), BIG_DISTANCE);
    }

    #[test]
    fn test_surface_below_picks_nearest() {
        let colliders = vec![
            Rect::new(0.0, 100.0, 200.0, 16.0),
            Rect::new(0.0, 70.0, 50.0, 16.0),
        ];
        let rect = Rect::new(10.0, 40.0, 20.0, 20.0);
        assert_eq!(distance_to_surface_below(&rect, &colliders), 10.0);
    }

    #[test]
    fn test_surface_above() {
        let ceiling = vec![Rect::new(0.0, 0.0, 200.0, 16.0)];
        let rect = Rect::new(10.0, 40.0, 20.0, 20.0);
        assert_eq!(distance_to_surface_above(&rect, &ceiling), 24.0);

        let beside = Rect::new(300.0, 40.0, 20.0, 20.0);
        assert_eq!(distance_to_surface_above(&beside, &ceiling), BIG_DISTANCE);
    }

    #[test]
    fn test_line_of_sight_rect_any_corner_order() {
        let expected = Rect::new(10.0, 20.0, 30.0, 40.0);
        let a = Vec2::new(10.0, 20.0);
        let b = Vec2::new(40.0, 60.0);
        assert_eq!(line_of_sight_rect(a, b), expected);
        assert_eq!(line_of_sight_rect(b, a), expected);
        assert_eq!(
            line_of_sight_rect(Vec2::new(40.0, 20.0), Vec2::new(10.0, 60.0)),
            expected
        );
        assert_eq!(
            line_of_sight_rect(Vec2::new(10.0, 60.0), Vec2::new(40.0, 20.0)),
            expected
        );
    }

    #[test]
    fn test_clear_shot_open_field() {
        let walls = vec![Rect::new(500.0, 500.0, 10.0, 10.0)];
        assert!(has_clear_shot(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 100.0),
            &walls,
            CLEAR_SHOT_DEPTH
        ));
    }

    #[test]
    fn test_clear_shot_blocked_by_wall() {
        let wall = vec![Rect::new(45.0, -100.0, 10.0, 300.0)];
        assert!(!has_clear_shot(
            Vec2::new(0.0, 50.0),
            Vec2::new(100.0, 50.0),
            &wall,
            CLEAR_SHOT_DEPTH
        ));
    }

    #[test]
    fn test_clear_shot_bisection_sees_past_corner() {
        // The box sits in the bounding rect's empty corner, off the diagonal
        let corner = vec![Rect::new(80.0, 0.0, 20.0, 20.0)];
        let start = Vec2::new(0.0, 0.0);
        let dest = Vec2::new(100.0, 100.0);
        assert!(!has_clear_shot(start, dest, &corner, 0));
        assert!(has_clear_shot(start, dest, &corner, CLEAR_SHOT_DEPTH));
    }

    proptest! {
        #[test]
        fn prop_surface_below_grows_with_gap(gap in 0.0f32..500.0, extra in 1.0f32..500.0) {
            let colliders = ground();
            let near = Rect::new(10.0, 100.0 - 20.0 - gap, 20.0, 20.0);
            let far = near.translate(0.0, -extra);
            let d_near = distance_to_surface_below(&near, &colliders);
            let d_far = distance_to_surface_below(&far, &colliders);
            prop_assert!(d_far > d_near);
        }

        #[test]
        fn prop_surface_below_is_sentinel_without_overlap(x in 200.0f32..5000.0, y in -500.0f32..500.0) {
            let rect = Rect::new(x, y, 20.0, 20.0);
            prop_assert_eq!(distance_to_surface_below(&rect, &ground()), BIG_DISTANCE);
        }
    }
}
