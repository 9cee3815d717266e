//! Game state and the per-tick render snapshot
//!
//! `GameState` owns every live entity. Nothing outside the simulation holds
//! references into it; the renderer gets a [`Snapshot`] each tick instead.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anim::AnimView;
use super::camera::Camera;
use super::controller::Controller;
use super::geom::Rect;
use super::level::{LevelGenerator, PlatformLook};
use super::opponent::{self, ActiveOpponent};
use super::player::{Player, Weapon};
use super::powerup::Powerup;
use super::score::{Health, Score};
use super::word::Word;
use crate::assets::AssetRegistry;
use crate::settings::{OpponentKind, Settings};
use crate::words::WordSource;

/// The one random stream of a session
pub type SimRng = Pcg32;

/// Identifies an opponent, powerup or platform
pub type EntityId = u32;

/// Player spawn height above the middle of the first screen
const PLAYER_SPAWN_LIFT: f32 = 30.0;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Touched a Commando; frozen until confirmed
    Challenge,
    /// Out of health
    GameOver,
}

/// Complete game state (the scene)
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    pub assets: AssetRegistry,
    pub rng: SimRng,
    pub phase: GamePhase,
    /// Ticks spent playing
    pub time_ticks: u64,
    pub camera: Camera,
    pub level: LevelGenerator,
    pub player: Player,
    /// Active opponents (sorted by id)
    pub opponents: Vec<ActiveOpponent>,
    /// Active powerups (sorted by id)
    pub powerups: Vec<Powerup>,
    pub score: Score,
    pub health: Health,
    pub controller: Controller,
    pub words: Box<dyn WordSource>,
    next_id: EntityId,
}

impl GameState {
    pub fn new(settings: Settings, assets: AssetRegistry, words: Box<dyn WordSource>) -> Self {
        let screen = Vec2::new(settings.screen_width, settings.screen_height);
        let mut rng = SimRng::seed_from_u64(settings.seed);
        let camera = Camera::new(screen);

        let mut level = LevelGenerator::new(&settings);
        level.place_platforms(&camera.rect, &mut rng);
        level.screencheck(&camera.rect, &mut rng);

        let player = Player::new(
            Vec2::new(
                (screen.x / 2.0).floor(),
                (screen.y / 2.0 - PLAYER_SPAWN_LIFT).floor(),
            ),
            &assets,
        );

        log::info!(
            "New game: {}x{} screen, seed {}",
            settings.screen_width,
            settings.screen_height,
            settings.seed
        );

        Self {
            health: Health::new(settings.max_health),
            settings,
            assets,
            rng,
            phase: GamePhase::Playing,
            time_ticks: 0,
            camera,
            level,
            player,
            opponents: Vec::new(),
            powerups: Vec::new(),
            score: Score::default(),
            controller: Controller::default(),
            words,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put a new opponent carrying `text` into play at `pos`
    pub fn spawn_opponent(&mut self, kind: OpponentKind, text: &str, pos: Vec2) -> EntityId {
        let id = self.next_entity_id();
        let statics = self.level.static_rects();
        self.opponents.push(opponent::spawn(
            kind,
            id,
            Word::new(text),
            pos,
            &statics,
            &self.assets,
        ));
        id
    }

    pub fn opponent(&self, id: EntityId) -> Option<&ActiveOpponent> {
        self.opponents.iter().find(|a| a.id == id)
    }

    pub fn opponent_mut(&mut self, id: EntityId) -> Option<&mut ActiveOpponent> {
        self.opponents.iter_mut().find(|a| a.id == id)
    }

    /// Forget the typing target if it is no longer in play
    pub fn validate_selection(&mut self) {
        if let Some(id) = self.player.selected_opponent {
            if self.opponent(id).is_none() {
                self.player.selected_opponent = None;
            }
        }
    }

    /// Everything the renderer needs for this tick
    pub fn snapshot(&self) -> Snapshot {
        let selected = self.player.selected_opponent;
        Snapshot {
            phase: self.phase,
            camera: self.camera.rect,
            player: EntityView {
                rect: self.player.rect,
                anim: self.player.anim(),
            },
            opponents: self
                .opponents
                .iter()
                .map(|a| {
                    let body = a.body();
                    OpponentView {
                        id: a.id,
                        kind: a.opponent.kind(),
                        rect: body.rect,
                        anim: a.opponent.anim(),
                        word: body.word.text(),
                        typed: body.word.typed(),
                        selected: selected == Some(a.id),
                        bursts: a
                            .opponent
                            .explosion()
                            .map(|e| {
                                e.bursts
                                    .iter()
                                    .filter(|b| !b.waiting() && !b.finished())
                                    .map(|b| BurstView {
                                        center: body.rect.center() + b.offset,
                                        frame: b.frame(),
                                    })
                                    .collect()
                            })
                            .unwrap_or_default(),
                    }
                })
                .collect(),
            platforms: self
                .level
                .platforms()
                .filter(|p| p.on_screen)
                .map(|p| PlatformView {
                    rect: p.rect,
                    symbol: p.symbol,
                    look: p.look(),
                })
                .collect(),
            bullets: self
                .player
                .bullets
                .iter()
                .map(|b| BulletView {
                    start: b.start,
                    end: b.end,
                    weapon: b.weapon,
                })
                .collect(),
            powerups: self
                .powerups
                .iter()
                .map(|p| EntityView {
                    rect: p.rect,
                    anim: p.anim(),
                })
                .collect(),
            hud: Hud {
                score: self.score.score,
                misses: self.score.misses,
                wpm: self.score.wpm(self.time_ticks),
                health: self.health.value(),
                max_health: self.health.max(),
                weapon: self.player.weapon,
                shots_left: self.player.shots_left,
                free_movement: self.controller.free_movement,
            },
        }
    }
}

/// One-way view of the scene for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub camera: Rect,
    pub player: EntityView,
    pub opponents: Vec<OpponentView>,
    /// On-screen platforms only
    pub platforms: Vec<PlatformView>,
    pub bullets: Vec<BulletView>,
    pub powerups: Vec<EntityView>,
    pub hud: Hud,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub rect: Rect,
    pub anim: AnimView,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpponentView {
    pub id: EntityId,
    pub kind: OpponentKind,
    pub rect: Rect,
    pub anim: AnimView,
    pub word: String,
    /// Characters already typed
    pub typed: usize,
    pub selected: bool,
    /// Visible explosion bursts while dying
    pub bursts: Vec<BurstView>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BurstView {
    pub center: Vec2,
    pub frame: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PlatformView {
    pub rect: Rect,
    pub symbol: Option<char>,
    pub look: PlatformLook,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulletView {
    pub start: Vec2,
    pub end: Vec2,
    pub weapon: Weapon,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Hud {
    pub score: f32,
    pub misses: u32,
    pub wpm: f32,
    pub health: u8,
    pub max_health: u8,
    pub weapon: Weapon,
    pub shots_left: i32,
    pub free_movement: bool,
}
