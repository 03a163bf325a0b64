//! Llama destroys the world (headless runner)
//!
//! Plays a scripted run through a small demo level and logs what happened.
//! Usage: `llama-destroys [settings.json]`

use llama_destroys::Level;
use llama_destroys::settings::Settings;
use llama_destroys::sim::{Action, FixedStep, GameEvent, GameState, InputEvent, TickInput, tick};

const DEMO_LEVEL: &[&str] = &[
    "SSSSSSSSSSSSSSSSSSSS",
    "S..................S",
    "S..................S",
    "S.P................S",
    "S..........K.......S",
    "S.......DDDDD......S",
    "S..................E",
    "S...............DDDS",
    "SSSSSSSSBBBBSSSSSSSS",
];

/// Seconds of play before giving up
const MAX_SECONDS: f32 = 60.0;
/// Pretend display refresh
const FRAME_SECONDS: f32 = 1.0 / 30.0;

/// Hold right the whole time, jump every so often
fn scripted_input(tick_index: u64) -> TickInput {
    match tick_index % 45 {
        0 if tick_index == 0 => TickInput::new([
            InputEvent::Pressed(Action::Right),
            InputEvent::Pressed(Action::Run),
        ]),
        0 => TickInput::new([InputEvent::Pressed(Action::Jump)]),
        20 => TickInput::new([InputEvent::Released(Action::Jump)]),
        _ => TickInput::default(),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Llama destroys the world (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let level = match Level::from_rows("demo", DEMO_LEVEL, settings.physics.block_size) {
        Ok(level) => level,
        Err(e) => {
            log::error!("Could not build demo level: {}", e);
            std::process::exit(1);
        }
    };

    let mut state = GameState::new(level, settings, 0x11a3a);
    let mut step = FixedStep::new(&settings);
    let mut elapsed = 0.0;

    while elapsed < MAX_SECONDS && !state.is_over() {
        elapsed += FRAME_SECONDS;
        for _ in 0..step.advance(FRAME_SECONDS) {
            let input = scripted_input(state.time_ticks);
            tick(&mut state, &input);
        }

        for event in state.drain_events() {
            match event {
                GameEvent::PlayerDied => log::info!("Llama died ({} so far)", state.deaths),
                GameEvent::WeaponPickedUp => log::info!("Llama is armed"),
                GameEvent::Explosion(cell) => log::info!("Boom at {:?}", cell),
                GameEvent::LevelComplete => log::info!("Level complete"),
            }
        }
    }

    if let Some(player) = state.player() {
        log::info!(
            "Finished after {} ticks: phase {:?}, deaths {}, player at {:?} ({:?})",
            state.time_ticks,
            state.phase,
            state.deaths,
            player.body.topleft(),
            player.state
        );
    }

    let player_cell = state
        .player()
        .map(|p| llama_destroys::TileMap::world_to_map(&state.level, p.body.center()));
    for (y, row) in state.level.rows().enumerate() {
        let line: String = row
            .iter()
            .map(|block| {
                if Some(block.pos) == player_cell {
                    '@'
                } else {
                    block.character()
                }
            })
            .collect();
        log::info!("{:2} {}", y, line);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the product on wasm
}
