//! The player: a gravity-bound state machine that runs, jumps and shoots

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::{AnimSet, AnimView, Facing};
use super::collision::{collides_any, distance_to_surface_above, distance_to_surface_below};
use super::geom::Rect;
use super::state::{EntityId, SimRng};
use crate::assets::{AnimKey, AssetRegistry};
use crate::consts::*;
use crate::elevation_degrees;

/// Player motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
    Falling,
    /// Standing still with the gun pointed at the selected opponent
    Shooting,
    /// Knocked back after touching an enemy
    Hit,
}

impl PlayerState {
    #[inline]
    pub fn airborne(self) -> bool {
        matches!(self, PlayerState::Jumping | PlayerState::Falling)
    }
}

/// Player weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Normal,
    Shotgun,
    Bfg,
}

impl Weapon {
    /// Stun ticks applied to an opponent on impact
    pub fn hit_pause(self) -> u32 {
        match self {
            Weapon::Normal => 20,
            Weapon::Shotgun => 40,
            Weapon::Bfg => 60,
        }
    }

    /// Bullets fired per typed letter
    pub fn bullet_count(self) -> usize {
        match self {
            Weapon::Shotgun => 3,
            Weapon::Normal | Weapon::Bfg => 1,
        }
    }
}

/// Shots granted by a shotgun pickup
pub const SHOTGUN_SHOTS: i32 = 10;

/// Distance from the player's center at which bullets appear
const MUZZLE_OFFSET: f32 = 4.0;
/// Extra margin kept from the target platform's edge while rising
const JUMP_SLOW_MARGIN: f32 = 5.0;

/// A bullet arriving at its target this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletImpact {
    pub target: EntityId,
    pub weapon: Weapon,
}

/// A short segment flying toward the point its target occupied when fired
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub weapon: Weapon,
    /// Tail of the segment
    pub start: Vec2,
    /// Head of the segment
    pub end: Vec2,
    dir: Vec2,
    /// Ticks until impact
    pub ttl: i32,
    pub target: EntityId,
}

impl Bullet {
    pub fn new(weapon: Weapon, start: Vec2, dir: Vec2, target: EntityId, ttl: i32) -> Self {
        Self {
            weapon,
            start,
            end: start + dir * BULLET_SPEED,
            dir,
            ttl,
            target,
        }
    }

    /// Move one tick; returns true once the bullet has arrived
    pub fn advance(&mut self) -> bool {
        self.ttl -= 1;
        if self.ttl <= 0 {
            return true;
        }
        self.start = self.end;
        self.end = self.start + self.dir * BULLET_SPEED;
        false
    }
}

/// The protagonist
#[derive(Debug, Clone)]
pub struct Player {
    /// Bottom-center of the sprite, sub-pixel
    pub position: Vec2,
    /// Collision rect, whole-unit anchored at `position`
    pub rect: Rect,
    pub state: PlayerState,
    pub direction: Facing,
    /// Vertical speed, positive upward
    pub velocity: f32,
    /// Ticks spent in the current jump or hit
    pub delay_frames: u32,
    pub weapon: Weapon,
    pub shots_left: i32,
    pub selected_opponent: Option<EntityId>,
    pub bullets: Vec<Bullet>,
    /// Armed by `direct`, consumed by the next tick
    moving: bool,
    jump_target: Option<Rect>,
    anims: AnimSet,
}

const PLAYER_ANIMS: [AnimKey; 10] = [
    AnimKey::PlayerIdle,
    AnimKey::PlayerRun,
    AnimKey::PlayerJump,
    AnimKey::PlayerFall,
    AnimKey::PlayerHit,
    AnimKey::PlayerAimUp,
    AnimKey::PlayerAimUpSide,
    AnimKey::PlayerAimSide,
    AnimKey::PlayerAimDownSide,
    AnimKey::PlayerAimDown,
];

impl Player {
    pub fn new(position: Vec2, assets: &AssetRegistry) -> Self {
        let mut player = Self {
            position,
            rect: Rect::default(),
            state: PlayerState::Falling,
            direction: Facing::Right,
            velocity: 0.0,
            delay_frames: 0,
            weapon: Weapon::Normal,
            shots_left: 0,
            selected_opponent: None,
            bullets: Vec::new(),
            moving: false,
            jump_target: None,
            anims: AnimSet::new(&PLAYER_ANIMS, AnimKey::PlayerFall, assets),
        };
        player.set_anim();
        player
    }

    /// Request horizontal movement this tick
    pub fn direct(&mut self, direction: Facing) {
        self.moving = true;
        self.direction = direction;
        if !matches!(
            self.state,
            PlayerState::Jumping | PlayerState::Falling | PlayerState::Hit
        ) {
            self.state = PlayerState::Running;
        }
    }

    #[inline]
    pub fn moving(&self) -> bool {
        self.moving
    }

    pub fn idle(&mut self) {
        self.state = PlayerState::Idle;
    }

    /// Start a jump, optionally toward a platform whose edge must not be
    /// clipped on the way up. Returns false if already airborne.
    pub fn jump(&mut self, target: Option<Rect>) -> bool {
        if self.state.airborne() {
            return false;
        }
        self.jump_target = target;
        self.delay_frames = 0;
        self.anims.reset(AnimKey::PlayerJump);
        self.state = PlayerState::Jumping;
        self.velocity = JUMP_VELOCITY;
        true
    }

    /// Knocked back by an enemy
    pub fn hit(&mut self) {
        self.moving = false;
        self.state = PlayerState::Hit;
        self.velocity = 0.0;
        self.delay_frames = 0;
    }

    /// Advance one tick against the on-screen colliders. `target` is the
    /// selected opponent's position, if any. Returns bullets that landed.
    pub fn tick(&mut self, colliders: &[Rect], target: Option<Vec2>) -> Vec<BulletImpact> {
        self.delay_frames += 1;

        if self.state == PlayerState::Shooting && target.is_none() {
            self.state = PlayerState::Idle;
        }

        if matches!(
            self.state,
            PlayerState::Falling | PlayerState::Jumping | PlayerState::Hit
        ) && self.velocity > TERMINAL_VELOCITY
        {
            self.velocity = (self.velocity - GRAVITY).max(TERMINAL_VELOCITY);
        }

        match self.state {
            PlayerState::Falling | PlayerState::Hit => {
                let dist = distance_to_surface_below(&self.rect, colliders);
                if dist <= self.velocity.abs() {
                    self.land(dist);
                    if self.state == PlayerState::Hit {
                        if self.delay_frames > HIT_FRAMES {
                            self.moving = true;
                            self.state = PlayerState::Running;
                        }
                    } else if self.moving {
                        self.state = PlayerState::Running;
                    } else {
                        self.state = PlayerState::Idle;
                    }
                } else {
                    self.move_vertical(-self.velocity);
                }
            }
            PlayerState::Jumping => {
                let dist = distance_to_surface_above(&self.rect, colliders);
                if dist <= self.velocity {
                    self.move_vertical(-dist);
                    self.state = PlayerState::Falling;
                    self.velocity = 0.0;
                } else {
                    self.move_vertical(-self.velocity);
                }
                if self.velocity <= 0.0 || collides_any(&self.rect, colliders) {
                    self.state = PlayerState::Falling;
                }
            }
            PlayerState::Running => {
                if distance_to_surface_below(&self.rect, colliders) > 0.0 {
                    self.state = PlayerState::Falling;
                } else if !self.moving {
                    self.state = PlayerState::Idle;
                }
            }
            PlayerState::Idle | PlayerState::Shooting => {}
        }

        if self.moving
            && matches!(
                self.state,
                PlayerState::Running | PlayerState::Jumping | PlayerState::Falling
            )
            && !self.jump_slow()
        {
            let (old_position, old_rect) = (self.position, self.rect);
            self.move_horizontal(self.direction.sign() * SPEED);
            if collides_any(&self.rect, colliders) {
                self.position = old_position;
                self.rect = old_rect;
            }
        }

        self.set_anim();
        self.anims.tick();

        if let Some(target) = target {
            self.point(target);
        }

        let mut impacts = Vec::new();
        self.bullets.retain_mut(|bullet| {
            if bullet.advance() {
                impacts.push(BulletImpact {
                    target: bullet.target,
                    weapon: bullet.weapon,
                });
                false
            } else {
                true
            }
        });

        self.moving = false;
        impacts
    }

    /// True while rising toward a target platform and one more step sideways
    /// would catch its edge from below
    fn jump_slow(&self) -> bool {
        if self.state != PlayerState::Jumping {
            return false;
        }
        let Some(target) = self.jump_target else {
            return false;
        };
        let below = self.rect.top() > target.bottom();
        match self.direction {
            Facing::Left => below && self.rect.left() - SPEED - JUMP_SLOW_MARGIN < target.right(),
            Facing::Right => below && self.rect.right() + SPEED + JUMP_SLOW_MARGIN > target.left(),
        }
    }

    /// Drop `dist` onto the surface below, discarding sub-unit drift
    fn land(&mut self, dist: f32) {
        self.position.y = self.rect.bottom() + dist;
        self.rect = Rect::from_bottom_center(self.position, self.rect.size());
    }

    fn move_vertical(&mut self, dy: f32) {
        self.position.y += dy;
        self.rect = Rect::from_bottom_center(self.position, self.rect.size());
    }

    fn move_horizontal(&mut self, dx: f32) {
        self.position.x += dx;
        self.rect = Rect::from_bottom_center(self.position, self.rect.size());
    }

    /// Pick the animation for the current state and re-anchor the rect
    fn set_anim(&mut self) {
        let key = match self.state {
            PlayerState::Idle => Some(AnimKey::PlayerIdle),
            PlayerState::Running => Some(AnimKey::PlayerRun),
            PlayerState::Jumping => Some(AnimKey::PlayerJump),
            PlayerState::Falling => Some(AnimKey::PlayerFall),
            PlayerState::Hit => Some(AnimKey::PlayerHit),
            // Keeps whichever aim strip `point` chose
            PlayerState::Shooting => None,
        };
        if let Some(key) = key {
            self.anims.set(key, self.direction);
        }
        self.rect = Rect::from_bottom_center(self.position, self.anims.size());
    }

    /// Aim at `target`, entering `Shooting` unless airborne
    pub fn point(&mut self, target: Vec2) {
        if !self.state.airborne() {
            self.state = PlayerState::Shooting;
        }

        // Positive y: target is above
        let offset = self.rect.center() - target;
        let Some(angle) = elevation_degrees(offset) else {
            return;
        };

        let key = aim_key(angle);
        let facing = if offset.x < 0.0 {
            Facing::Right
        } else {
            Facing::Left
        };
        self.anims.set(key, facing);
    }

    /// Fire at an opponent at `target` with bounds `target_size`
    pub fn shoot(&mut self, target: Vec2, target_size: Vec2, id: EntityId, rng: &mut SimRng) {
        let origin = self.rect.center();

        if self.weapon != Weapon::Normal {
            self.shots_left -= 1;
            if self.shots_left < 0 {
                self.weapon = Weapon::Normal;
                self.shots_left = 0;
            }
        }

        let half_w = (target_size.x / 2.0).floor() as i32;
        let half_h = (target_size.y / 2.0).floor() as i32;
        for _ in 0..self.weapon.bullet_count() {
            // Scatter shots over the target's bounds
            let aim = target
                + Vec2::new(
                    rng.random_range(-half_w..=half_w) as f32,
                    rng.random_range(-half_h..=half_h) as f32,
                );
            let offset = aim - origin;
            let dir = offset.normalize_or_zero();
            let ttl = (offset.length() / BULLET_SPEED) as i32;
            self.bullets.push(Bullet::new(
                self.weapon,
                origin + dir * MUZZLE_OFFSET,
                dir,
                id,
                ttl,
            ));
        }
    }

    /// Switch weapons with a fresh shot count
    pub fn arm(&mut self, weapon: Weapon, shots: i32) {
        self.weapon = weapon;
        self.shots_left = shots;
    }

    /// Animation currently showing
    pub fn anim(&self) -> AnimView {
        self.anims.view()
    }
}

/// Aim strip for an elevation angle in degrees, positive upward.
/// Exactly 30 degrees counts as steep.
fn aim_key(angle: f32) -> AnimKey {
    let steep = angle.abs();
    if steep < 30.0 {
        AnimKey::PlayerAimSide
    } else if steep > 30.0 && steep < 70.0 {
        if angle > 0.0 {
            AnimKey::PlayerAimUpSide
        } else {
            AnimKey::PlayerAimDownSide
        }
    } else if angle > 0.0 {
        AnimKey::PlayerAimUp
    } else {
        AnimKey::PlayerAimDown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ground() -> Vec<Rect> {
        vec![Rect::new(-1000.0, 500.0, 2000.0, 16.0)]
    }

    fn standing_player() -> Player {
        let assets = AssetRegistry::builtin();
        let mut player = Player::new(Vec2::new(0.0, 500.0), &assets);
        player.state = PlayerState::Idle;
        player.set_anim();
        player
    }

    #[test]
    fn test_falling_snaps_to_ground() {
        let assets = AssetRegistry::builtin();
        let mut player = Player::new(Vec2::new(0.0, 497.0), &assets);
        player.velocity = -5.0;
        let impacts = player.tick(&ground(), None);
        assert!(impacts.is_empty());
        assert_eq!(player.position.y, 500.0);
        assert_eq!(player.rect.bottom(), 500.0);
        assert_eq!(player.state, PlayerState::Idle);
    }

    #[test]
    fn test_falling_lands_running_when_moving() {
        let assets = AssetRegistry::builtin();
        let mut player = Player::new(Vec2::new(0.0, 497.0), &assets);
        player.velocity = -5.0;
        player.direct(Facing::Right);
        player.tick(&ground(), None);
        assert_eq!(player.position.y, 500.0);
        assert_eq!(player.state, PlayerState::Running);
    }

    #[test]
    fn test_falling_far_descends_by_velocity() {
        let assets = AssetRegistry::builtin();
        let mut player = Player::new(Vec2::new(0.0, 400.0), &assets);
        player.velocity = -5.0;
        player.tick(&ground(), None);
        assert_eq!(player.position.y, 405.25);
        assert_eq!(player.velocity, -5.25);
        assert_eq!(player.state, PlayerState::Falling);
    }

    #[test]
    fn test_gravity_floors_at_terminal_velocity() {
        let assets = AssetRegistry::builtin();
        let mut player = Player::new(Vec2::new(0.0, -5000.0), &assets);
        for _ in 0..100 {
            player.tick(&ground(), None);
        }
        assert_eq!(player.velocity, TERMINAL_VELOCITY);
    }

    #[test]
    fn test_jump_rises_then_falls() {
        let mut player = standing_player();
        assert!(player.jump(None));
        assert!(!player.jump(None));
        player.tick(&ground(), None);
        assert_eq!(player.state, PlayerState::Jumping);
        assert_eq!(player.position.y, 500.0 - 6.75);

        let mut ticks = 1;
        while player.state == PlayerState::Jumping {
            player.tick(&ground(), None);
            ticks += 1;
        }
        // 7.0 decays by 0.25 per tick
        assert_eq!(ticks, 28);
        assert_eq!(player.state, PlayerState::Falling);

        while player.state == PlayerState::Falling {
            player.tick(&ground(), None);
        }
        assert_eq!(player.position.y, 500.0);
        assert_eq!(player.state, PlayerState::Idle);
    }

    #[test]
    fn test_jump_stops_at_ceiling() {
        let mut player = standing_player();
        let mut colliders = ground();
        // Ceiling 10 units above the player's head
        let ceiling_bottom = player.rect.top() - 10.0;
        colliders.push(Rect::new(-50.0, ceiling_bottom - 16.0, 100.0, 16.0));
        player.jump(None);
        player.tick(&colliders, None);
        assert_eq!(player.position.y, 493.25);
        // Second tick would rise 6.5 but only 5 remain
        player.tick(&colliders, None);
        assert_eq!(player.state, PlayerState::Falling);
        assert_eq!(player.velocity, 0.0);
        assert_eq!(player.position.y, 488.25);
    }

    #[test]
    fn test_running_requires_fresh_direction() {
        let mut player = standing_player();
        player.direct(Facing::Right);
        player.tick(&ground(), None);
        assert_eq!(player.position.x, 2.0);
        assert_eq!(player.state, PlayerState::Running);

        player.tick(&ground(), None);
        assert_eq!(player.position.x, 2.0);
        assert_eq!(player.state, PlayerState::Idle);
    }

    #[test]
    fn test_horizontal_move_reverts_on_wall() {
        let mut player = standing_player();
        let mut colliders = ground();
        colliders.push(Rect::new(player.rect.right() + 1.0, 400.0, 16.0, 100.0));
        player.direct(Facing::Right);
        player.tick(&colliders, None);
        assert_eq!(player.position.x, 0.0);
    }

    #[test]
    fn test_running_off_edge_falls() {
        let assets = AssetRegistry::builtin();
        let mut player = Player::new(Vec2::new(0.0, 500.0), &assets);
        player.state = PlayerState::Running;
        player.set_anim();
        let ledge = vec![Rect::new(-1000.0, 500.0, 900.0, 16.0)];
        player.direct(Facing::Right);
        player.tick(&ledge, None);
        assert_eq!(player.state, PlayerState::Falling);
    }

    #[test]
    fn test_hit_holds_until_stun_elapses() {
        let mut player = standing_player();
        player.hit();
        for _ in 0..HIT_FRAMES {
            player.tick(&ground(), None);
            assert_eq!(player.state, PlayerState::Hit);
        }
        player.tick(&ground(), None);
        assert_eq!(player.state, PlayerState::Running);
    }

    #[test]
    fn test_point_picks_quadrant_sprite() {
        let mut player = standing_player();
        let center = player.rect.center();

        player.point(center + Vec2::new(100.0, 0.0));
        assert_eq!(player.state, PlayerState::Shooting);
        assert_eq!(player.anim().key, AnimKey::PlayerAimSide);
        assert_eq!(player.anim().facing, Facing::Right);

        player.point(center + Vec2::new(-100.0, -100.0));
        assert_eq!(player.anim().key, AnimKey::PlayerAimUpSide);
        assert_eq!(player.anim().facing, Facing::Left);

        player.point(center + Vec2::new(10.0, -200.0));
        assert_eq!(player.anim().key, AnimKey::PlayerAimUp);

        player.point(center + Vec2::new(10.0, 200.0));
        assert_eq!(player.anim().key, AnimKey::PlayerAimDown);
    }

    #[test]
    fn test_aim_key_band_edges() {
        assert_eq!(aim_key(0.0), AnimKey::PlayerAimSide);
        assert_eq!(aim_key(29.9), AnimKey::PlayerAimSide);
        assert_eq!(aim_key(30.0), AnimKey::PlayerAimUp);
        assert_eq!(aim_key(-30.0), AnimKey::PlayerAimDown);
        assert_eq!(aim_key(45.0), AnimKey::PlayerAimUpSide);
        assert_eq!(aim_key(-45.0), AnimKey::PlayerAimDownSide);
        assert_eq!(aim_key(70.0), AnimKey::PlayerAimUp);
        assert_eq!(aim_key(-90.0), AnimKey::PlayerAimDown);
    }

    #[test]
    fn test_shooting_without_target_returns_to_idle() {
        let mut player = standing_player();
        player.point(player.rect.center() + Vec2::new(100.0, 0.0));
        player.tick(&ground(), None);
        assert_eq!(player.state, PlayerState::Idle);
    }

    #[test]
    fn test_bullet_lands_after_ttl() {
        let mut rng = SimRng::seed_from_u64(9);
        let mut player = standing_player();
        let target = player.rect.center() + Vec2::new(250.0, 0.0);
        player.shoot(target, Vec2::ZERO, 7, &mut rng);
        assert_eq!(player.bullets.len(), 1);
        assert_eq!(player.bullets[0].ttl, 10);

        let mut landed = Vec::new();
        for _ in 0..10 {
            landed.extend(player.tick(&ground(), Some(target)));
        }
        assert_eq!(
            landed,
            vec![BulletImpact {
                target: 7,
                weapon: Weapon::Normal
            }]
        );
        assert!(player.bullets.is_empty());
    }

    #[test]
    fn test_point_blank_bullet_still_lands() {
        let mut rng = SimRng::seed_from_u64(9);
        let mut player = standing_player();
        player.shoot(player.rect.center(), Vec2::ZERO, 1, &mut rng);
        assert_eq!(player.tick(&ground(), None).len(), 1);
    }

    #[test]
    fn test_shotgun_fires_three_then_runs_out() {
        let mut rng = SimRng::seed_from_u64(9);
        let mut player = standing_player();
        player.arm(Weapon::Shotgun, 1);
        let target = player.rect.center() + Vec2::new(200.0, 0.0);
        player.shoot(target, Vec2::new(26.0, 36.0), 1, &mut rng);
        assert_eq!(player.bullets.len(), 3);
        assert_eq!(player.weapon, Weapon::Shotgun);

        player.shoot(target, Vec2::new(26.0, 36.0), 1, &mut rng);
        assert_eq!(player.weapon, Weapon::Normal);
        assert_eq!(player.bullets.len(), 4);
    }
}
