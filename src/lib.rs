//! Bunny Runner - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, scrolling, collisions, scoring)
//! - `scene`: Capability interface to an external scene graph
//! - `runner`: Frame driver tying the simulation to a scene and score storage
//! - `persistence`: Best-score storage with graceful fallback
//! - `settings`: Player preferences
//! - `platform`: Browser bindings (wasm32 only)

pub mod persistence;
pub mod platform;
pub mod runner;
pub mod scene;
pub mod settings;
pub mod sim;

pub use runner::{Hud, Runner};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// World x offset of each lane (left, middle, right)
    pub const LANE_X: [f32; 3] = [-2.0, 0.0, 2.0];
    /// Lane the player starts a run in
    pub const START_LANE: usize = 1;
    /// Fraction of the remaining lane gap closed per tick
    pub const LANE_EASING: f32 = 0.2;

    /// Player z never changes, the world scrolls instead
    pub const PLAYER_Z: f32 = 0.0;
    /// Initial upward velocity of a jump (units/tick)
    pub const JUMP_POWER: f32 = 0.3;
    /// Downward acceleration while airborne (units/tick²)
    pub const GRAVITY: f32 = 0.015;
    /// Fraction of the player's size trimmed from each face for forgiving hits
    pub const PLAYER_HITBOX_SHRINK: f32 = 0.05;

    /// Spawn distance ahead of the player
    pub const OBSTACLE_SPAWN_DISTANCE: f32 = 50.0;
    pub const COLLECTIBLE_SPAWN_DISTANCE: f32 = 45.0;
    /// Entities further than this behind the player are removed
    pub const REMOVAL_DISTANCE: f32 = 20.0;
    /// Active set caps (bound per-tick collision cost)
    pub const MAX_OBSTACLES: usize = 20;
    pub const MAX_COLLECTIBLES: usize = 15;
    /// Collectibles avoid lanes holding an obstacle within this z distance
    pub const LANE_AVOID_DISTANCE: f32 = 5.0;
    /// Float height of collectibles
    pub const COLLECTIBLE_Y: f32 = 1.5;

    /// Spawn interval floors (ms)
    pub const OBSTACLE_MIN_INTERVAL_FLOOR: f64 = 400.0;
    pub const OBSTACLE_MAX_INTERVAL_FLOOR: f64 = 600.0;
    pub const COLLECTIBLE_MIN_INTERVAL_FLOOR: f64 = 1000.0;
    pub const COLLECTIBLE_MAX_INTERVAL_FLOOR: f64 = 2000.0;

    /// Combo window (ms)
    pub const COMBO_TIMEOUT_MS: f64 = 3000.0;
    /// Points per collectible before the multiplier
    pub const COLLECT_BASE_POINTS: u64 = 10;
    /// Multiplier cap
    pub const MAX_COMBO_MULTIPLIER: u32 = 10;
    /// Score thresholds that trigger a one-time celebration
    pub const MILESTONES: [u64; 9] = [100, 250, 500, 750, 1000, 1500, 2000, 3000, 5000];

    /// Passive score: +1 every this many playing ticks
    pub const PASSIVE_SCORE_TICKS: u64 = 30;

    /// Largest frame delta fed into the simulation clock (ms)
    pub const MAX_FRAME_DT_MS: f64 = 100.0;

    /// Collectibles placed ahead of the player when a run starts
    pub const INITIAL_COLLECTIBLE_Z: [f32; 3] = [-15.0, -23.0, -31.0];
}

/// World x offset of a lane, clamping out-of-range indices to the edge lanes
#[inline]
pub fn lane_x(lane: usize) -> f32 {
    consts::LANE_X[lane.min(consts::LANE_X.len() - 1)]
}

/// Shift a lane index by `delta`, clamped to the valid lane range
#[inline]
pub fn shift_lane(lane: usize, delta: i8) -> usize {
    let max = (consts::LANE_X.len() - 1) as i64;
    (lane as i64 + delta as i64).clamp(0, max) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_lane_clamps() {
        assert_eq!(shift_lane(0, -1), 0);
        assert_eq!(shift_lane(2, 1), 2);
        assert_eq!(shift_lane(1, -1), 0);
        assert_eq!(shift_lane(1, 1), 2);
    }

    #[test]
    fn test_lane_x() {
        assert_eq!(lane_x(0), -2.0);
        assert_eq!(lane_x(1), 0.0);
        assert_eq!(lane_x(7), 2.0);
    }
}
