//! Fixed timestep simulation tick
//!
//! Advances a [`GameState`] deterministically: same level, seed and inputs
//! always give the same run.

use super::entities::{Actor, Brochette};
use super::player::InputEvent;
use super::state::{GameEvent, GameState, LevelPhase};
use crate::level::BlockKind;
use crate::physics::Collision;
use crate::settings::Settings;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key presses and releases since the last tick, in order
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// Advance the game by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        LevelPhase::Over => return,
        LevelPhase::Exploding { ticks_left, origin } => {
            if ticks_left <= 1 {
                log::info!("Level {} complete after {} ticks", state.level.name, state.time_ticks);
                state.phase = LevelPhase::Over;
                state.events.push(GameEvent::LevelComplete);
            } else {
                state.phase = LevelPhase::Exploding {
                    ticks_left: ticks_left - 1,
                    origin,
                };
            }
        }
        LevelPhase::Playing => {
            if let Some(player) = state.player_mut() {
                for event in &input.events {
                    player.handle_input(*event);
                }
            }

            state.space.simulate(&state.level);
            spawn_brochettes(state);
            handle_player_collisions(state);
        }
    }

    state.time_ticks += 1;
}

fn spawn_brochettes(state: &mut GameState) {
    let block_size = state.level.block_size;
    let speed = state.settings.physics.brochette_speed;

    for request in state.level.internal_logic(&mut state.rng) {
        let brochette = Brochette::new(request.pos, request.direction, block_size, speed);
        state.space.add(Actor::Brochette(brochette));
    }
}

/// React to what the player touched this tick. Death and explosion end the
/// tick's handling immediately.
fn handle_player_collisions(state: &mut GameState) {
    let Some(player) = state.player() else {
        return;
    };
    let collisions = player.body.collisions.clone();
    let mut picked_up = false;

    for collision in collisions {
        match collision {
            Collision::Tile(cell) => {
                let block = state.level.get_block(cell);
                if block.deadly() {
                    state.reset();
                    return;
                }
                if block.kind == BlockKind::End {
                    state.explode(cell);
                    return;
                }
            }
            Collision::Projectile(id) => {
                if state.space.get(id).is_some_and(Actor::deadly) {
                    state.reset();
                    return;
                }
                if let Some(Actor::Ak47(weapon)) = state.space.get_mut(id) {
                    // Removed from the space on the next simulate
                    weapon.body.dead = true;
                    picked_up = true;
                }
            }
            Collision::Static(_) => {}
        }
    }

    if picked_up {
        if let Some(player) = state.player_mut() {
            player.has_ak47 = true;
        }
        log::info!("AK47 picked up");
        state.events.push(GameEvent::WeaponPickedUp);
    }
}

/// Turns real elapsed time into a number of fixed ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    /// Seconds per tick
    pub dt: f32,
    pub max_substeps: u32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(settings: &Settings) -> Self {
        Self {
            dt: settings.tick_seconds(),
            max_substeps: settings.physics.max_substeps,
            accumulator: 0.0,
        }
    }

    /// Add `elapsed` seconds and return how many ticks to run now. When more
    /// than `max_substeps` are due the backlog is dropped.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }

        if self.accumulator >= self.dt {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
