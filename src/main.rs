//! Typer Combat entry point
//!
//! The native build has no window: it builds the session from the command
//! line and config file, lets a scripted typist play for a while, and logs
//! how it went.

use typer_combat::consts::TICKS_PER_SECOND;
use typer_combat::settings::OpponentKind;
use typer_combat::sim::{GamePhase, GameState, KeyEvent, PlayerState, TickInput, tick};
use typer_combat::{AssetRegistry, Settings, WordList};

/// Length of the scripted session
const DEMO_SECONDS: u64 = 120;
/// Ticks between keystrokes of the scripted typist (about 90 wpm)
const KEYSTROKE_TICKS: u64 = 8;
/// Ticks between jump attempts while no opponent is around
const JUMP_TICKS: u64 = 90;

fn main() {
    env_logger::init();
    log::info!("Typer Combat (native) starting...");

    let settings = match Settings::from_env().with_width_arg(std::env::args().nth(1).as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: typer-combat [screen width 640..=1280]");
            std::process::exit(2);
        }
    };

    let assets = match settings.asset_file.as_deref().map(AssetRegistry::load) {
        Some(Ok(assets)) => assets,
        Some(Err(e)) => {
            log::warn!("Ignoring asset overrides: {}", e);
            AssetRegistry::builtin()
        }
        None => AssetRegistry::builtin(),
    };
    let words = settings
        .word_file
        .as_deref()
        .map(WordList::load_or_builtin)
        .unwrap_or_default();

    let mut state = GameState::new(settings, assets, Box::new(words));
    let ticks = DEMO_SECONDS * TICKS_PER_SECOND as u64;
    for frame in 0..ticks {
        let input = TickInput::new(autotype(&state, frame));
        tick(&mut state, &input);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let snapshot = state.snapshot();
    log::info!(
        "Session over ({:?}): score {:.1}, {} misses, {:.1} wpm, {} hearts left",
        snapshot.phase,
        snapshot.hud.score,
        snapshot.hud.misses,
        snapshot.hud.wpm,
        snapshot.hud.health
    );
    match serde_json::to_string_pretty(&snapshot.hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not encode summary: {}", e),
    }
}

/// Keys the scripted typist presses on `frame`
fn autotype(state: &GameState, frame: u64) -> Vec<KeyEvent> {
    if state.phase == GamePhase::Challenge {
        return vec![KeyEvent::Confirm];
    }
    if frame % KEYSTROKE_TICKS != 0 {
        return Vec::new();
    }

    // Keep typing the current target
    if let Some(active) = state
        .player
        .selected_opponent
        .and_then(|id| state.opponent(id))
    {
        let word = &active.body().word;
        return word
            .text()
            .chars()
            .nth(word.typed())
            .map(KeyEvent::Letter)
            .into_iter()
            .collect();
    }

    // Otherwise start on the closest opponent that can still be typed
    let feet = state.player.position;
    let next = state
        .opponents
        .iter()
        .filter(|a| !a.opponent.is_dying() && a.body().word.typed() == 0)
        .filter(|a| a.opponent.kind() != OpponentKind::Commando)
        .min_by(|a, b| {
            a.body()
                .pos
                .distance(feet)
                .total_cmp(&b.body().pos.distance(feet))
        });
    if let Some(first) = next.and_then(|a| a.initial()) {
        return vec![KeyEvent::Letter(first)];
    }

    // Nothing to shoot: climb now and then
    let grounded = !state.player.state.airborne() && state.player.state != PlayerState::Hit;
    if frame % JUMP_TICKS == 0 && grounded {
        if let Some(symbol) = state
            .level
            .platforms()
            .filter(|p| p.reachable)
            .find_map(|p| p.symbol)
        {
            return vec![KeyEvent::Special(symbol)];
        }
    }
    Vec::new()
}
