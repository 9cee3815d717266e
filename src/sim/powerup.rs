//! Pickups dropped by beaten opponents

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{AnimSet, AnimView, Facing};
use super::collision::distance_to_surface_below;
use super::geom::Rect;
use super::state::EntityId;
use crate::assets::{AnimKey, AssetRegistry};
use crate::consts::BIG_DISTANCE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Restores one heart
    Heart,
    /// Switches the player to the shotgun
    Shotgun,
}

impl PowerupKind {
    fn anim_key(self) -> AnimKey {
        match self {
            PowerupKind::Heart => AnimKey::Heart,
            PowerupKind::Shotgun => AnimKey::Shotgun,
        }
    }
}

/// A pickup resting on the ground
#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: EntityId,
    pub kind: PowerupKind,
    pub rect: Rect,
    anims: AnimSet,
}

impl Powerup {
    /// Drop a pickup at `pos` onto the surface directly beneath it.
    /// Returns `None` when there is nothing below to land on.
    pub fn drop_at(
        id: EntityId,
        kind: PowerupKind,
        pos: Vec2,
        statics: &[Rect],
        assets: &AssetRegistry,
    ) -> Option<Self> {
        let anims = AnimSet::new(&[], kind.anim_key(), assets);
        let rect = Rect::from_bottom_center(pos, anims.size());
        let drop = distance_to_surface_below(&rect, statics);
        if drop >= BIG_DISTANCE {
            return None;
        }
        Some(Self {
            id,
            kind,
            rect: rect.translate(0.0, drop),
            anims,
        })
    }

    pub fn tick(&mut self) {
        self.anims.tick();
    }

    pub fn anim(&self) -> AnimView {
        let mut view = self.anims.view();
        view.facing = Facing::Right;
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_lands_on_ground() {
        let assets = AssetRegistry::builtin();
        let ground = vec![Rect::new(-100.0, 300.0, 200.0, 16.0)];
        let heart = Powerup::drop_at(1, PowerupKind::Heart, Vec2::new(0.0, 120.5), &ground, &assets)
            .expect("ground below");
        assert_eq!(heart.rect.bottom(), 300.0);
        assert_eq!(heart.rect.size(), Vec2::new(16.0, 16.0));
    }

    #[test]
    fn test_drop_without_ground_is_discarded() {
        let assets = AssetRegistry::builtin();
        let ground = vec![Rect::new(-100.0, 300.0, 200.0, 16.0)];
        assert!(
            Powerup::drop_at(1, PowerupKind::Shotgun, Vec2::new(500.0, 0.0), &ground, &assets)
                .is_none()
        );
    }
}
