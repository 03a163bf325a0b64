//! Game layer on top of the physics core
//!
//! Deterministic like the physics it drives:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod entities;
pub mod player;
pub mod state;
pub mod tick;

pub use entities::{Actor, Ak47, Brochette};
pub use player::{Action, Facing, InputEvent, Player, PlayerState};
pub use state::{GameEvent, GameState, LevelPhase};
pub use tick::{FixedStep, TickInput, tick};
