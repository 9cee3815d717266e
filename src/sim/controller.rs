//! Encounter and spawn controller
//!
//! Turns key events into typing, targeting and jump scheduling, keeps the
//! player advancing, resolves player contact with opponents and powerups,
//! and spawns new opponents on a cadence that speeds up with the score.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::anim::Facing;
use super::geom::Rect;
use super::input::KeyEvent;
use super::player::{PlayerState, SHOTGUN_SHOTS, Weapon};
use super::powerup::{Powerup, PowerupKind};
use super::state::{EntityId, GamePhase, GameState};
use crate::settings::{JumpLimits, OpponentKind};

/// Chance a beaten opponent leaves a powerup
const DROP_CHANCE: f64 = 0.3;
/// Share of drops that are hearts; the rest are shotguns
const HEART_SHARE: f64 = 0.6;
/// Base spawn interval in ticks, divided by `SPAWN_RATE * level`
const SPAWN_INTERVAL: f32 = 120.0;
const SPAWN_RATE: f32 = 0.2;

/// A jump waiting for the player to reach its take-off point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingJump {
    pub platform: EntityId,
    pub rect: Rect,
    /// The player's leading edge must pass this x to jump
    pub threshold: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    /// Direction of travel
    pub direction: Facing,
    /// Ticks since the last spawn
    pub spawn_count: u32,
    pub pending: Option<PendingJump>,
    /// Debug mode: held direction keys move the player, Space jumps
    pub free_movement: bool,
    /// Direction keys held down, most recent last
    pub held: Vec<Facing>,
}

/// Dispatch one key event
pub fn handle_event(state: &mut GameState, event: KeyEvent) {
    match event {
        KeyEvent::Letter(c) => type_letter(state, c),
        KeyEvent::Special(c) => type_special(state, c),
        KeyEvent::DirectionDown(direction) => {
            if state.controller.free_movement {
                if !state.controller.held.contains(&direction) {
                    state.controller.held.push(direction);
                }
            } else if direction != state.controller.direction {
                change_direction(state);
            }
        }
        KeyEvent::DirectionUp(direction) => {
            state.controller.held.retain(|&d| d != direction);
        }
        KeyEvent::Space => {
            if state.controller.free_movement {
                state.player.jump(None);
            } else {
                change_direction(state);
            }
        }
        KeyEvent::Unselect => unselect(state),
        KeyEvent::ToggleFreeMovement => {
            let controller = &mut state.controller;
            controller.free_movement = !controller.free_movement;
            controller.held.clear();
            log::info!(
                "Free movement {}",
                if controller.free_movement { "on" } else { "off" }
            );
        }
        // Only meaningful during a challenge
        KeyEvent::Confirm => {}
    }
}

/// Type a word character against the current target, or pick a target
pub fn type_letter(state: &mut GameState, c: char) {
    let target = match state.player.selected_opponent {
        Some(id) => {
            let hit = state
                .opponent_mut(id)
                .is_some_and(|a| a.opponent.type_on(c));
            hit.then_some(id)
        }
        None => {
            let hit = state
                .opponents
                .iter_mut()
                .find_map(|a| a.opponent.type_on(c).then_some(a.id));
            if hit.is_some() {
                state.player.selected_opponent = hit;
            }
            hit
        }
    };

    let Some(id) = target else {
        state.score.miss();
        return;
    };

    let Some(active) = state.opponent(id) else {
        return;
    };
    let rect = active.body().rect;
    let defeated = active.opponent.defeated();
    state
        .player
        .shoot(rect.center(), rect.size(), id, &mut state.rng);

    if defeated {
        defeat(state, id);
    }
}

/// Score a completed word, start the opponent's death and maybe drop a powerup
fn defeat(state: &mut GameState, id: EntityId) {
    let Some(active) = state
        .opponents
        .iter_mut()
        .find(|a| a.id == id)
    else {
        return;
    };
    let value = active.opponent.value();
    let center = active.body().rect.center();
    active.opponent.destroy(&state.assets, &mut state.rng);
    log::debug!(
        "Defeated {} #{} \"{}\"",
        active.opponent.kind().as_str(),
        id,
        active.body().word.text()
    );

    state.score.increase(value);
    state.player.selected_opponent = None;
    if state.player.state == PlayerState::Shooting {
        state.player.idle();
    }

    maybe_drop_powerup(state, center);
}

fn maybe_drop_powerup(state: &mut GameState, pos: Vec2) {
    if !state.rng.random_bool(DROP_CHANCE) {
        return;
    }
    if state.powerups.len() >= state.settings.max_powerups {
        return;
    }
    let kind = if state.rng.random_bool(HEART_SHARE) {
        PowerupKind::Heart
    } else {
        PowerupKind::Shotgun
    };
    let id = state.next_entity_id();
    let statics = state.level.static_rects();
    match Powerup::drop_at(id, kind, pos, &statics, &state.assets) {
        Some(powerup) => {
            log::debug!("Dropped {:?} #{}", kind, id);
            state.powerups.push(powerup);
        }
        None => log::debug!("No ground under {:?} drop", kind),
    }
}

/// Where the player must be to jump onto `platform`, and which way to travel
pub fn jump_threshold(player: &Rect, platform: &Rect, limits: JumpLimits) -> (Facing, f32) {
    if player.right() < platform.left() {
        (Facing::Right, platform.left() - limits.max_width)
    } else {
        (Facing::Left, platform.right() + limits.max_width)
    }
}

/// Select the reachable platform carrying `symbol` and arm a jump onto it
pub fn type_special(state: &mut GameState, symbol: char) {
    if state.player.state.airborne() {
        return;
    }
    let Some(platform) = state.level.find_target(symbol) else {
        log::debug!("No reachable platform for {:?}", symbol);
        return;
    };
    let (id, rect) = (platform.id, platform.rect);

    let (direction, threshold) =
        jump_threshold(&state.player.rect, &rect, state.settings.jump_limits());
    state.level.select(Some(id));
    state.controller.direction = direction;
    state.controller.pending = Some(PendingJump {
        platform: id,
        rect,
        threshold,
    });
    log::debug!("Jump armed for platform #{} at x {}", id, threshold);
}

/// Keep the player moving and fire an armed jump once past its threshold
pub fn advance(state: &mut GameState) {
    let player = &mut state.player;
    let controller = &mut state.controller;

    if let Some(jump) = controller.pending {
        if !matches!(player.state, PlayerState::Shooting | PlayerState::Jumping) {
            let past = match controller.direction {
                Facing::Right => player.rect.right() > jump.threshold,
                Facing::Left => player.rect.left() < jump.threshold,
            };
            if past && player.jump(Some(jump.rect)) {
                controller.pending = None;
                state.level.select(None);
            }
        }
    }

    if player.state == PlayerState::Shooting {
        return;
    }
    if !controller.free_movement {
        player.direct(controller.direction);
    } else if let Some(&direction) = controller.held.last() {
        player.direct(direction);
    }
}

/// Reverse travel and cancel any armed jump
pub fn change_direction(state: &mut GameState) {
    let controller = &mut state.controller;
    controller.direction = controller.direction.flipped();
    if controller.pending.take().is_some() {
        state.level.select(None);
    }
}

/// Drop the typing target, forgetting its progress
pub fn unselect(state: &mut GameState) {
    let Some(id) = state.player.selected_opponent.take() else {
        return;
    };
    if let Some(active) = state.opponent_mut(id) {
        active.opponent.release();
    }
    if state.player.state == PlayerState::Shooting {
        state.player.idle();
    }
}

/// Remove opponents and powerups the player touches and apply their effects.
/// Contact costs at most one heart per tick, and none while already stunned.
pub fn resolve_encounters(state: &mut GameState) {
    let player_rect = state.player.rect;
    let mut hurt = false;
    let mut challenge = false;

    state.opponents.retain(|active| {
        if !active.body().rect.intersects(&player_rect) {
            return true;
        }
        if active.opponent.kind() == OpponentKind::Commando {
            challenge = true;
        } else if !active.opponent.is_dying() {
            hurt = true;
        }
        false
    });
    state.validate_selection();

    if hurt && state.player.state != PlayerState::Hit {
        state.health.decrease();
        state.player.hit();
        log::debug!("Player hit, health {}", state.health.value());
    }

    if challenge {
        state.phase = GamePhase::Challenge;
        state.controller.pending = None;
        state.level.select(None);
        log::info!("Challenge started");
        return;
    }

    let mut picked = Vec::new();
    state.powerups.retain(|powerup| {
        if powerup.rect.intersects(&player_rect) {
            picked.push(powerup.kind);
            false
        } else {
            true
        }
    });
    for kind in picked {
        match kind {
            PowerupKind::Heart => state.health.increase(),
            PowerupKind::Shotgun => state.player.arm(Weapon::Shotgun, SHOTGUN_SHOTS),
        }
    }
}

/// Count a tick toward the next spawn and spawn when due
pub fn spawn_tick(state: &mut GameState) {
    state.controller.spawn_count += 1;
    let interval = SPAWN_INTERVAL / (SPAWN_RATE * state.score.level() as f32);
    if state.controller.spawn_count as f32 > interval {
        state.controller.spawn_count = 0;
        spawn_opponent(state);
    }
}

/// Spawn one opponent ahead of the player, unless the cap is reached or no
/// word with a free first letter is available
pub fn spawn_opponent(state: &mut GameState) -> Option<EntityId> {
    if state.opponents.len() >= state.settings.max_enemies {
        return None;
    }

    let excluded: BTreeSet<char> = state.opponents.iter().filter_map(|a| a.initial()).collect();
    let Some(text) = state.words.next_word(&excluded, &mut state.rng) else {
        log::debug!("No word free of {:?}", excluded);
        return None;
    };

    let pos = spawn_position(state);
    let kind = *state.settings.enabled_opponents.choose(&mut state.rng)?;
    Some(state.spawn_opponent(kind, &text, pos))
}

/// Half a screen to a screen away on the side the player is heading, and a
/// little above
fn spawn_position(state: &mut GameState) -> Vec2 {
    let w = state.settings.screen_width as i32;
    let h = state.settings.screen_height as i32;
    let rng = &mut state.rng;

    let distance = rng.random_range(w / 2..=w) as f32;
    let side = match state.player.state {
        PlayerState::Running | PlayerState::Jumping | PlayerState::Falling => {
            state.controller.direction.sign()
        }
        _ if rng.random_bool(0.5) => 1.0,
        _ => -1.0,
    };
    let rise = rng.random_range(h / 6..=h / 5) as f32;

    state.player.position + Vec2::new(side * distance, -rise)
}
