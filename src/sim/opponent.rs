//! Opponents: word-carrying enemies with per-variant movement
//!
//! Every variant shares a [`Body`] (word, position, stun and death timers)
//! and the default typing/scoring behavior of [`Opponent`]. Variants differ
//! in how they move and how they die:
//!
//! - [`Soldier`] runs along platforms under gravity and jumps gaps
//! - [`Copter`] flies toward the player but cannot pass through platforms
//! - [`Ghost`] phases through everything and flees when beaten
//! - [`Commando`] stands still and starts a challenge when touched

use glam::Vec2;
use rand::Rng;

use super::anim::{AnimSet, AnimView, Explosion, Facing};
use super::collision::{CLEAR_SHOT_DEPTH, collides_any, distance_to_surface_below, has_clear_shot};
use super::geom::Rect;
use super::player::Weapon;
use super::state::{EntityId, SimRng};
use super::word::Word;
use crate::assets::{AnimKey, AssetRegistry};
use crate::consts::*;
use crate::settings::OpponentKind;

/// Per-axis distance within which an opponent stops closing in
const MOVE_DEAD_ZONE: f32 = 2.0;
/// Chance (1 in N) per tick of a patrol reversal
const REVERSE_ODDS: u32 = 101;
/// Vertical distance beyond which a soldier patrols instead of chasing
const SOLDIER_CHASE_HEIGHT: f32 = 50.0;
const SOLDIER_JUMP_SPEED: f32 = 4.5;
const SOLDIER_BURSTS: u32 = 5;
const COPTER_BURSTS: u32 = 3;
/// Copter spawn nudge per step while embedded in geometry
const COPTER_SPAWN_STEP: f32 = 5.0;
/// Extra height of the probe a blocked copter uses to look for a way around
const COPTER_PROBE_HEIGHT: f32 = 40.0;
const GHOST_FLEE_SPEED: f32 = 9.0;
/// Placeholder death timer for fleeing ghosts, which leave by culling
const GHOST_FLEE_TTL: u32 = 999;

/// State shared by every opponent variant
#[derive(Debug, Clone)]
pub struct Body {
    pub word: Word,
    /// True once the player has started typing this word
    pub typing: bool,
    pub speed: f32,
    /// Remaining stun ticks
    pub pause: u32,
    pub pos: Vec2,
    pub rect: Rect,
    /// Death timer; `None` while alive
    pub ttl: Option<u32>,
    pub direction: Facing,
}

impl Body {
    fn new(word: Word, pos: Vec2, speed: f32) -> Self {
        Self {
            word,
            typing: false,
            speed,
            pause: 0,
            pos,
            rect: Rect::from_center(pos, Vec2::splat(5.0)),
            ttl: None,
            direction: Facing::Left,
        }
    }

    /// Close in on `target` along the normalized offset, per axis, unless stunned
    fn move_toward(&mut self, target: Vec2) {
        if self.pause > 0 {
            self.pause -= 1;
            return;
        }
        let offset = target - self.pos;
        let dist = offset.length();
        if dist == 0.0 {
            return;
        }
        let step = (offset / dist).abs() * self.speed;
        if offset.x.abs() >= MOVE_DEAD_ZONE {
            self.pos.x += step.x * offset.x.signum();
        }
        if offset.y.abs() >= MOVE_DEAD_ZONE {
            self.pos.y += step.y * offset.y.signum();
        }
    }

    /// Count down the death timer
    fn tick_ttl(&mut self) {
        if let Some(ttl) = self.ttl.as_mut() {
            *ttl = ttl.saturating_sub(1);
        }
    }

    fn reverse_sometimes(&mut self, rng: &mut SimRng) {
        if rng.random_range(0..REVERSE_ODDS) == 0 {
            self.direction = self.direction.flipped();
        }
    }
}

/// Shared capability set of all enemy variants
pub trait Opponent: std::fmt::Debug {
    fn kind(&self) -> OpponentKind;

    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Advance one tick toward `target`, colliding against `statics`
    fn tick(&mut self, target: Vec2, statics: &[Rect], rng: &mut SimRng);

    /// One movement step toward `target`
    fn move_toward(&mut self, target: Vec2, _statics: &[Rect]) {
        self.body_mut().move_toward(target);
    }

    /// Start the death sequence
    fn destroy(&mut self, _assets: &AssetRegistry, _rng: &mut SimRng) {
        self.body_mut().ttl = Some(0);
    }

    /// Animation to draw
    fn anim(&self) -> AnimView;

    /// Explosion bursts, while dying
    fn explosion(&self) -> Option<&Explosion> {
        None
    }

    /// Offer a typed character. True if it was the next letter of the word.
    fn type_on(&mut self, c: char) -> bool {
        let body = self.body_mut();
        if body.ttl.is_some() || body.word.done() {
            return false;
        }
        let hit = body.word.type_on(c);
        if hit {
            body.typing = true;
        }
        hit
    }

    fn defeated(&self) -> bool {
        self.body().word.done()
    }

    /// Stunned by a bullet
    fn hit(&mut self, weapon: Weapon) {
        self.body_mut().pause = weapon.hit_pause();
    }

    /// Score for completing the word
    fn value(&self) -> f32 {
        self.body().word.len() as f32 / SCORE_DIVISOR
    }

    /// Drop the player's selection, forgetting typed progress
    fn release(&mut self) {
        let body = self.body_mut();
        body.typing = false;
        body.word.reset();
    }

    fn is_dying(&self) -> bool {
        self.body().ttl.is_some()
    }

    /// Death timer has run out
    fn expired(&self) -> bool {
        self.body().ttl == Some(0)
    }
}

/// An opponent in the active set, addressed by id
#[derive(Debug)]
pub struct ActiveOpponent {
    pub id: EntityId,
    pub opponent: Box<dyn Opponent>,
}

impl ActiveOpponent {
    #[inline]
    pub fn body(&self) -> &Body {
        self.opponent.body()
    }

    /// First letter of the word
    pub fn initial(&self) -> Option<char> {
        self.body().word.first()
    }
}

/// Build a new opponent of `kind` at `pos`
pub fn spawn(
    kind: OpponentKind,
    id: EntityId,
    word: Word,
    pos: Vec2,
    statics: &[Rect],
    assets: &AssetRegistry,
) -> ActiveOpponent {
    let opponent: Box<dyn Opponent> = match kind {
        OpponentKind::Soldier => Box::new(Soldier::new(word, pos, assets)),
        OpponentKind::Copter => Box::new(Copter::new(word, pos, statics, assets)),
        OpponentKind::Ghost => Box::new(Ghost::new(word, pos, assets)),
        OpponentKind::Commando => Box::new(Commando::new(word, pos, statics, assets)),
    };
    log::debug!(
        "Spawned {} #{} \"{}\" at ({:.0}, {:.0})",
        kind.as_str(),
        id,
        opponent.body().word.text(),
        opponent.body().pos.x,
        opponent.body().pos.y
    );
    ActiveOpponent { id, opponent }
}

/// Soldier motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoldierState {
    Running,
    Jumping,
    Falling,
}

/// Runs along platforms and hops gaps toward the player
#[derive(Debug, Clone)]
pub struct Soldier {
    body: Body,
    pub state: SoldierState,
    delay_frames: u32,
    anims: AnimSet,
    explosion: Option<Explosion>,
}

impl Soldier {
    pub fn new(word: Word, pos: Vec2, assets: &AssetRegistry) -> Self {
        let anims = AnimSet::new(
            &[AnimKey::SoldierJump, AnimKey::SoldierFall],
            AnimKey::SoldierRun,
            assets,
        );
        let mut body = Body::new(word, pos, 2.2);
        body.rect = Rect::from_bottom_center(pos, anims.size());
        let mut soldier = Self {
            body,
            state: SoldierState::Running,
            delay_frames: 0,
            anims,
            explosion: None,
        };
        soldier.set_anim();
        soldier
    }

    fn jump(&mut self) {
        if self.state != SoldierState::Running {
            return;
        }
        self.delay_frames = 0;
        self.anims.reset(AnimKey::SoldierJump);
        self.state = SoldierState::Jumping;
    }

    /// Settle toward the ground at jump speed, landing exactly
    fn apply_gravity(&mut self, statics: &[Rect]) {
        let dist = distance_to_surface_below(&self.body.rect, statics);
        if dist <= 0.0 {
            return;
        }
        if dist > JUMP_SPEED {
            self.body.pos.y += JUMP_SPEED;
            if self.state == SoldierState::Running {
                self.state = SoldierState::Falling;
                self.anims.reset(AnimKey::SoldierRun);
            }
        } else {
            self.body.pos.y += dist;
            self.state = SoldierState::Running;
        }
        self.anchor();
    }

    /// A platform top within one jump of our feet, just ahead
    fn ledge_ahead(&self, statics: &[Rect]) -> bool {
        let pos = self.body.pos;
        statics.iter().any(|p| {
            if !(pos.y - MAX_JUMP_HEIGHT < p.top() && p.top() < pos.y) {
                return false;
            }
            let gap = match self.body.direction {
                Facing::Left if p.right() < pos.x => pos.x - p.right(),
                Facing::Right if pos.x < p.left() => p.left() - pos.x,
                _ => return false,
            };
            gap <= MAX_JUMP_WIDTH
        })
    }

    fn set_anim(&mut self) {
        let key = match self.state {
            SoldierState::Running => AnimKey::SoldierRun,
            SoldierState::Jumping => AnimKey::SoldierJump,
            SoldierState::Falling => AnimKey::SoldierFall,
        };
        self.anims.set(key, self.body.direction);
        self.anchor();
    }

    fn anchor(&mut self) {
        self.body.rect = Rect::from_bottom_center(self.body.pos, self.anims.size());
    }
}

impl Opponent for Soldier {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Soldier
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn tick(&mut self, target: Vec2, statics: &[Rect], rng: &mut SimRng) {
        self.anims.tick();
        if let Some(explosion) = self.explosion.as_mut() {
            explosion.tick();
        }
        if self.body.ttl.is_some() {
            self.body.tick_ttl();
            return;
        }
        if self.body.pause > 0 {
            self.body.pause -= 1;
            return;
        }

        self.apply_gravity(statics);

        if self.state == SoldierState::Running {
            if self.ledge_ahead(statics) {
                self.jump();
            } else {
                self.body.reverse_sometimes(rng);
            }
        }

        self.move_toward(target, statics);
        self.set_anim();
    }

    fn move_toward(&mut self, target: Vec2, statics: &[Rect]) {
        let speed = self.body.speed;
        let sign = self.body.direction.sign();
        if self.state == SoldierState::Jumping {
            self.delay_frames += 1;
            if self.delay_frames > JUMP_FRAMES || collides_any(&self.body.rect, statics) {
                self.state = SoldierState::Falling;
            } else {
                self.body.pos.y -= SOLDIER_JUMP_SPEED;
                self.body.pos.x += sign * speed;
            }
            return;
        }

        let offset = target - self.body.pos;
        if offset.y.abs() > SOLDIER_CHASE_HEIGHT {
            // Can't run straight at the player; keep patrolling
            self.body.pos.x += sign * speed;
        } else if offset.x.abs() >= MOVE_DEAD_ZONE {
            self.body.direction = if offset.x < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            };
            self.body.pos.x += self.body.direction.sign() * speed;
        }
    }

    fn destroy(&mut self, assets: &AssetRegistry, rng: &mut SimRng) {
        let explosion = Explosion::new(SOLDIER_BURSTS, assets, rng);
        self.body.ttl = Some(explosion.total_time());
        self.explosion = Some(explosion);
    }

    fn anim(&self) -> AnimView {
        self.anims.view()
    }

    fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }
}

/// Flies at the player when it has a clear line, otherwise works around walls
#[derive(Debug, Clone)]
pub struct Copter {
    body: Body,
    anims: AnimSet,
    explosion: Option<Explosion>,
}

impl Copter {
    pub fn new(word: Word, pos: Vec2, statics: &[Rect], assets: &AssetRegistry) -> Self {
        let anims = AnimSet::new(&[], AnimKey::CopterFly, assets);
        let mut copter = Self {
            body: Body::new(word, pos, 2.5),
            anims,
            explosion: None,
        };
        copter.anchor();
        // Spawned inside a platform: rise until clear
        while collides_any(&copter.body.rect, statics) {
            copter.body.pos.y -= COPTER_SPAWN_STEP;
            copter.anchor();
        }
        copter
    }

    fn anchor(&mut self) {
        self.body.rect = Rect::from_bottom_center(self.body.pos, self.anims.size());
    }

    /// Move by `delta`, undoing the move if it lands in a collider
    fn try_move(&mut self, delta: Vec2, statics: &[Rect]) -> bool {
        let (old_pos, old_rect) = (self.body.pos, self.body.rect);
        self.body.pos += delta;
        self.anchor();
        if collides_any(&self.body.rect, statics) {
            self.body.pos = old_pos;
            self.body.rect = old_rect;
            return false;
        }
        true
    }
}

impl Opponent for Copter {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Copter
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn tick(&mut self, target: Vec2, statics: &[Rect], rng: &mut SimRng) {
        self.anims.tick();
        if let Some(explosion) = self.explosion.as_mut() {
            explosion.tick();
        }
        if self.body.ttl.is_some() {
            self.body.tick_ttl();
            return;
        }
        self.body.reverse_sometimes(rng);
        self.move_toward(target, statics);
        self.anims.set(AnimKey::CopterFly, self.body.direction);
    }

    fn move_toward(&mut self, target: Vec2, statics: &[Rect]) {
        if self.body.pause > 0 {
            self.body.pause -= 1;
            return;
        }
        let offset = target - self.body.pos;
        let dist = offset.length();
        if dist == 0.0 {
            return;
        }
        let unit = (offset / dist).abs();
        let speed = self.body.speed;

        // Look from the trailing edge so our own width does not block the view
        let eye_x = match self.body.direction {
            Facing::Left => self.body.rect.right(),
            Facing::Right => self.body.rect.left(),
        };
        let eye = Vec2::new(eye_x, self.body.pos.y);

        if has_clear_shot(eye, target, statics, CLEAR_SHOT_DEPTH) {
            let mut blocked_x = false;
            if offset.x.abs() >= MOVE_DEAD_ZONE {
                blocked_x = !self.try_move(
                    Vec2::new(unit.x * speed * offset.x.signum(), 0.0),
                    statics,
                );
            }
            if offset.y.abs() >= MOVE_DEAD_ZONE {
                // Pushing into a wall: climb or dive at full speed instead
                let dy = if blocked_x { 1.0 } else { unit.y };
                self.try_move(Vec2::new(0.0, dy * speed * offset.y.signum()), statics);
            }
        } else {
            let dir_y = if target.y < self.body.rect.top() { -1.0 } else { 1.0 };
            let probe = self
                .body
                .rect
                .inflate(0.0, COPTER_PROBE_HEIGHT)
                .translate(0.0, dir_y * speed);
            if !collides_any(&probe, statics) {
                self.body.pos.y += dir_y * speed;
                self.anchor();
            } else if !self.try_move(
                Vec2::new(self.body.direction.sign() * speed, 0.0),
                statics,
            ) {
                self.body.direction = self.body.direction.flipped();
            }
        }
    }

    fn destroy(&mut self, assets: &AssetRegistry, rng: &mut SimRng) {
        let explosion = Explosion::new(COPTER_BURSTS, assets, rng);
        self.body.ttl = Some(explosion.total_time());
        self.explosion = Some(explosion);
    }

    fn anim(&self) -> AnimView {
        self.anims.view()
    }

    fn explosion(&self) -> Option<&Explosion> {
        self.explosion.as_ref()
    }
}

/// Drifts straight at the player through walls; its eyes flee when beaten
#[derive(Debug, Clone)]
pub struct Ghost {
    body: Body,
    anims: AnimSet,
}

impl Ghost {
    pub fn new(word: Word, pos: Vec2, assets: &AssetRegistry) -> Self {
        let anims = AnimSet::new(
            &[
                AnimKey::GhostRight,
                AnimKey::GhostUp,
                AnimKey::GhostDown,
                AnimKey::GhostStunned,
                AnimKey::GhostEyesLeft,
                AnimKey::GhostEyesRight,
                AnimKey::GhostEyesUp,
                AnimKey::GhostEyesDown,
            ],
            AnimKey::GhostLeft,
            assets,
        );
        let mut ghost = Self {
            body: Body::new(word, pos, 2.2),
            anims,
        };
        ghost.anchor();
        ghost
    }

    fn anchor(&mut self) {
        self.body.rect = Rect::from_center(self.body.pos, self.anims.size());
    }

    /// Face along the larger axis of `offset` (target minus ghost)
    fn point(&mut self, offset: Vec2, fleeing: bool) {
        let key = if offset.x.abs() > offset.y.abs() {
            match (offset.x < 0.0, fleeing) {
                (true, false) => AnimKey::GhostLeft,
                (true, true) => AnimKey::GhostEyesRight,
                (false, false) => AnimKey::GhostRight,
                (false, true) => AnimKey::GhostEyesLeft,
            }
        } else {
            match (offset.y < 0.0, fleeing) {
                (true, false) => AnimKey::GhostUp,
                (true, true) => AnimKey::GhostEyesDown,
                (false, false) => AnimKey::GhostDown,
                (false, true) => AnimKey::GhostEyesUp,
            }
        };
        self.anims.set(key, Facing::Right);
    }

    /// Run away from `target` along the axis it is closer on
    fn flee(&mut self, target: Vec2) {
        let offset = target - self.body.pos;
        let speed = self.body.speed;
        if offset.x.abs() < offset.y.abs() {
            self.body.pos.y -= offset.y.signum() * speed;
        } else {
            self.body.pos.x -= offset.x.signum() * speed;
        }
    }
}

impl Opponent for Ghost {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Ghost
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn tick(&mut self, target: Vec2, statics: &[Rect], _rng: &mut SimRng) {
        self.anims.tick();
        if self.body.ttl.is_some() {
            self.point(target - self.body.pos, true);
            self.flee(target);
        } else {
            self.move_toward(target, statics);
            if self.body.pause > 0 {
                self.anims.set(AnimKey::GhostStunned, Facing::Right);
            } else {
                self.point(target - self.body.pos, false);
            }
        }
        self.anchor();
    }

    fn destroy(&mut self, _assets: &AssetRegistry, _rng: &mut SimRng) {
        self.body.ttl = Some(GHOST_FLEE_TTL);
        self.body.speed = GHOST_FLEE_SPEED;
    }

    fn anim(&self) -> AnimView {
        self.anims.view()
    }
}

/// Waits on the ground; touching it starts a typing challenge
#[derive(Debug, Clone)]
pub struct Commando {
    body: Body,
    anims: AnimSet,
}

impl Commando {
    pub fn new(word: Word, pos: Vec2, statics: &[Rect], assets: &AssetRegistry) -> Self {
        let anims = AnimSet::new(&[], AnimKey::CommandoIdle, assets);
        let mut commando = Self {
            body: Body::new(word, pos, 2.2),
            anims,
        };
        commando.anchor();
        // Don't float: stand on whatever is below, if anything
        let drop = distance_to_surface_below(&commando.body.rect, statics);
        if drop > 0.0 && drop < BIG_DISTANCE {
            commando.body.pos.y += drop;
            commando.anchor();
        }
        commando.anims.set(AnimKey::CommandoIdle, commando.body.direction);
        commando
    }

    fn anchor(&mut self) {
        self.body.rect = Rect::from_bottom_center(self.body.pos, self.anims.size());
    }
}

impl Opponent for Commando {
    fn kind(&self) -> OpponentKind {
        OpponentKind::Commando
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn tick(&mut self, _target: Vec2, _statics: &[Rect], _rng: &mut SimRng) {
        self.anims.tick();
    }

    fn move_toward(&mut self, _target: Vec2, _statics: &[Rect]) {}

    /// Commandos are fought in the challenge, not by typing
    fn type_on(&mut self, _c: char) -> bool {
        false
    }

    fn anim(&self) -> AnimView {
        self.anims.view()
    }
}
