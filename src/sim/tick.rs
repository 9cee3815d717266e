//! Fixed timestep simulation tick
//!
//! One ordered pass per rendered frame: input dispatch, entity ticks,
//! encounters, camera and culling, then reachability.

use super::controller;
use super::input::KeyEvent;
use super::state::{GamePhase, GameState};

/// Input events for a single tick, in the order they arrived
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<KeyEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = KeyEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::GameOver => return,
        GamePhase::Challenge => {
            if input.events.contains(&KeyEvent::Confirm) {
                state.phase = GamePhase::Playing;
                state.controller.held.clear();
                log::info!("Challenge over, back to the level");
            }
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    for &event in &input.events {
        controller::handle_event(state, event);
    }
    controller::advance(state);

    let camera = state.camera.rect;
    state.level.place_platforms(&camera, &mut state.rng);

    // Opponents chase the player's center over every platform
    let statics = state.level.static_rects();
    let chase = state.player.rect.center();
    for active in &mut state.opponents {
        active.opponent.tick(chase, &statics, &mut state.rng);
    }
    state.opponents.retain(|a| !a.opponent.expired());
    state.validate_selection();

    for powerup in &mut state.powerups {
        powerup.tick();
    }

    let aim = state
        .player
        .selected_opponent
        .and_then(|id| state.opponent(id))
        .map(|a| a.body().rect.center());
    let screen = state.level.screen_rects();
    let impacts = state.player.tick(&screen, aim);
    for impact in impacts {
        if let Some(active) = state.opponent_mut(impact.target) {
            active.opponent.hit(impact.weapon);
        }
    }

    controller::resolve_encounters(state);
    if state.phase == GamePhase::Playing {
        controller::spawn_tick(state);
    }

    state.camera.follow(&state.player.rect);
    let camera = state.camera.rect;
    state.level.screencheck(&camera, &mut state.rng);

    let bounds = state.camera.keep_bounds();
    state.opponents.retain(|a| a.body().rect.intersects(&bounds));
    state.powerups.retain(|p| p.rect.intersects(&bounds));
    state.validate_selection();

    state
        .level
        .update_reachability(&state.player.rect, state.settings.jump_limits());

    if state.health.is_empty() && state.phase == GamePhase::Playing {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {} ticks: score {:.1}, {} misses, {:.1} wpm",
            state.time_ticks,
            state.score.score,
            state.score.misses,
            state.score.wpm(state.time_ticks)
        );
    }
}
