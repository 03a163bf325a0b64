//! Game state
//!
//! Everything a running level needs: the live grid, the space holding the
//! player and projectiles, and a pristine copy of the level to rebuild from
//! when the player dies. Driven one tick at a time by [`tick`](super::tick).

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Actor, Ak47};
use super::player::Player;
use crate::consts::EXPLOSION_TICKS;
use crate::level::{Level, ObjectKind};
use crate::physics::{BodyId, Space};
use crate::settings::Settings;

/// Current phase of the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Physics running, player in control
    Playing,
    /// End block touched, the level is blowing up
    Exploding { ticks_left: u32, origin: IVec2 },
    /// Nothing left to simulate
    Over,
}

/// Things that happened during a tick, for the outer layers (sound, stats)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerDied,
    WeaponPickedUp,
    /// Explosion started from this cell
    Explosion(IVec2),
    LevelComplete,
}

/// Complete state of one level being played
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Level as loaded, used on reset
    pristine: Level,
    pub level: Level,
    pub space: Space<Actor>,
    /// Id of the player's body in `space`
    pub player: BodyId,
    pub phase: LevelPhase,
    pub deaths: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events, see [`GameState::drain_events`]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(level: Level, settings: Settings, seed: u64) -> Self {
        let mut state = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            pristine: level.clone(),
            level,
            space: Space::new(settings.physics.gravity),
            player: BodyId::default(),
            phase: LevelPhase::Playing,
            deaths: 0,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.populate(false);
        state
    }

    /// Fill a fresh space with the player and the level's pickups
    fn populate(&mut self, respawn: bool) {
        let block_size = self.level.block_size;
        let mut space = Space::new(self.settings.physics.gravity);

        let player = Player::new(self.level.world_start(), self.settings.player, respawn);
        self.player = space.add(Actor::Player(player));

        for object in &self.level.objects {
            if object.kind == ObjectKind::Ak47 {
                space.add(Actor::Ak47(Ak47::new(object.cell, block_size)));
            }
        }
        self.space = space;
    }

    pub fn player(&self) -> Option<&Player> {
        self.space.get(self.player).and_then(Actor::as_player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.space.get_mut(self.player).and_then(Actor::as_player_mut)
    }

    /// Player died: rebuild the level and respawn
    pub fn reset(&mut self) {
        self.deaths += 1;
        log::info!("Player died in level {}, resetting (deaths: {})", self.level.name, self.deaths);

        self.level = self.pristine.clone();
        self.populate(true);
        self.phase = LevelPhase::Playing;
        self.events.push(GameEvent::PlayerDied);
    }

    /// Start blowing the level up from `origin`
    pub fn explode(&mut self, origin: IVec2) {
        log::info!("Level {} exploding from {:?}", self.level.name, origin);
        self.phase = LevelPhase::Exploding {
            ticks_left: EXPLOSION_TICKS,
            origin,
        };
        self.events.push(GameEvent::Explosion(origin));
    }

    pub fn is_over(&self) -> bool {
        self.phase == LevelPhase::Over
    }

    /// Take the events collected since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Entity;

    const ROWS: &[&str] = &[
        "SSSSSSSS",
        "S......S",
        "S..P...S",
        "S......S",
        "S.K..K.S",
        "SSSSSSSS",
    ];

    fn state() -> GameState {
        let level = Level::from_rows("test", ROWS, 32.0).unwrap();
        GameState::new(level, Settings::default(), 7)
    }

    #[test]
    fn test_new_populates_space() {
        let state = state();
        assert_eq!(state.space.moving_bodies().len(), 1);
        assert_eq!(state.space.projectiles().len(), 2);

        let player = state.player().unwrap();
        assert_eq!(player.body.topleft(), glam::Vec2::new(96.0, 64.0));
        assert_eq!(player.respawn, 0);
        assert_eq!(state.phase, LevelPhase::Playing);
    }

    #[test]
    fn test_reset_rebuilds_level_and_player() {
        let mut state = state();
        state.level.erase(IVec2::new(0, 1));
        state.player_mut().unwrap().body.shape.topleft = glam::Vec2::new(150.0, 40.0);

        state.reset();

        assert_eq!(state.deaths, 1);
        assert_eq!(state.level.get_block(IVec2::new(0, 1)).character(), 'S');
        let player = state.player().unwrap();
        assert_eq!(player.body().topleft(), state.level.world_start());
        assert_eq!(player.respawn, state.settings.player.respawn_blink);
        assert_eq!(state.drain_events(), vec![GameEvent::PlayerDied]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_explode_switches_phase() {
        let mut state = state();
        state.explode(IVec2::new(4, 5));
        assert_eq!(
            state.phase,
            LevelPhase::Exploding {
                ticks_left: EXPLOSION_TICKS,
                origin: IVec2::new(4, 5)
            }
        );
        assert_eq!(state.drain_events(), vec![GameEvent::Explosion(IVec2::new(4, 5))]);
    }
}
