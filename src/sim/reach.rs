//! Which platforms could the player jump to from where it stands

use super::geom::Rect;
use crate::settings::JumpLimits;

/// True if `platform` is within one jump of `player`, or a single on-screen
/// collider bridges the player's feet to within one jump of it.
///
/// A player overlapping the platform horizontally (standing under or over
/// it) is never considered able to reach it.
pub fn is_reachable(
    platform: &Rect,
    player: &Rect,
    screen_statics: &[Rect],
    limits: JumpLimits,
) -> bool {
    let top = platform.top();
    let feet = player.bottom();
    if !(feet - limits.max_height < top && top < feet) {
        return false;
    }

    // 1-unit strip along the walkway up to the take-off point
    let walkway = if player.right() < platform.left() {
        let gap = platform.left() - player.right();
        if gap <= limits.max_width {
            return true;
        }
        Rect::new(player.right(), feet, gap - limits.max_width, 1.0)
    } else if player.left() > platform.right() {
        let gap = player.left() - platform.right();
        if gap <= limits.max_width {
            return true;
        }
        Rect::new(
            platform.right() + limits.max_width,
            feet,
            gap - limits.max_width,
            1.0,
        )
    } else {
        return false;
    };

    screen_statics.iter().any(|c| c.contains(&walkway))
}
