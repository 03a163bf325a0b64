//! Llama destroys the world - platformer core
//!
//! Core modules:
//! - `physics`: AABB bodies, tile collision and the simulation step
//! - `level`: Tile grid, block catalogue and barbecue spawners
//! - `sim`: Player controller, projectiles and the fixed-step game tick
//! - `settings`: Data-driven tuning

pub mod error;
pub mod level;
pub mod physics;
pub mod settings;
pub mod sim;

pub use error::{LevelError, PhysicsError, SettingsError};
pub use level::{Block, BlockKind, Direction, Level};
pub use physics::{Aabb, Body, BodyId, Space, TileMap};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Edge length of a level tile in pixels
    pub const DEFAULT_BLOCK_SIZE: f32 = 32.0;

    /// Fixed simulation rate (ticks per second)
    pub const UPDATE_HZ: u32 = 60;
    /// Maximum ticks run for a single frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Ticks a level keeps exploding before it is over
    pub const EXPLOSION_TICKS: u32 = 90;
}

/// Clamp `x` into `[mini, maxi]`. An empty range leaves `x` untouched
/// instead of panicking like `f32::clamp`.
#[inline]
pub fn clamp(x: f32, mini: f32, maxi: f32) -> f32 {
    if maxi < mini {
        return x;
    }
    if x < mini {
        return mini;
    }
    if x > maxi {
        return maxi;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(12.0, -5.0, 5.0), 5.0);
        assert_eq!(clamp(-12.0, -5.0, 5.0), -5.0);
        assert_eq!(clamp(1.5, -5.0, 5.0), 1.5);
        assert_eq!(clamp(7.0, 5.0, -5.0), 7.0);
    }
}
