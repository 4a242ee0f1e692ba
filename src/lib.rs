//! Ocean Angler - a 2D fishing game simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fishing state machine, rope physics, fish/predator AI, economy)
//! - `catalog`: Static reference data (species, junk, predators, rods, lures, chum)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `leaderboard`: Leaderboard lists and their refresh timer
//! - `persistence`: Fire-and-forget score records
//! - `platform`: Browser glue (storage, fetch)

pub mod catalog;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use leaderboard::{Leaderboard, RefreshTimer};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate. Timers and per-frame rates are expressed in frames at this rate.
    pub const SIM_HZ: f32 = 60.0;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of verlet particles in the fishing line
    pub const ROPE_SEGMENTS: usize = 12;

    /// Fixed catch-history length (newest first)
    pub const MAX_HISTORY: usize = 50;

    /// Reel target marker bounds
    pub const REEL_TARGET_MIN: f32 = 0.12;
    pub const REEL_TARGET_MAX: f32 = 0.88;
    /// Reel progress marker bounds
    pub const REEL_PROGRESS_MIN: f32 = 0.05;
    pub const REEL_PROGRESS_MAX: f32 = 0.95;

    /// Starting wallet
    pub const STARTING_MONEY: u64 = 50;
    /// Starting attribute points
    pub const STARTING_ATTRIBUTE_POINTS: u32 = 3;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Move `current` toward `target` by at most `max_step`
#[inline]
pub fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    if current < target {
        (current + max_step).min(target)
    } else {
        (current - max_step).max(target)
    }
}

/// Round to one decimal place (weights and lengths are displayed this way)
#[inline]
pub fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Evaluate a quadratic bezier at `t`
#[inline]
pub fn quad_bezier(p0: Vec2, control: Vec2, p1: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + control * (2.0 * u * t) + p1 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_never_overshoots() {
        assert_eq!(approach(0.0, 1.0, 0.3), 0.3);
        assert_eq!(approach(0.9, 1.0, 0.3), 1.0);
        assert_eq!(approach(1.0, 0.0, 0.25), 0.75);
        assert_eq!(approach(0.1, 0.0, 0.25), 0.0);
    }

    #[test]
    fn test_round1() {
        assert!((round1(3.14159) - 3.1).abs() < 1e-6);
        assert!((round1(2.96) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_quad_bezier_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let c = Vec2::new(50.0, 80.0);
        let b = Vec2::new(100.0, 10.0);
        assert_eq!(quad_bezier(a, c, b, 0.0), a);
        assert_eq!(quad_bezier(a, c, b, 1.0), b);
    }
}
