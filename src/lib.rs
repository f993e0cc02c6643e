//! Road Dodger - An endless-road arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, scoring, run phases)
//! - `session`: Driver-facing wrapper that owns one run and its score service
//! - `service`: The `addScore` / `getHighScores` collaborator
//! - `persistence`: Versioned JSON save files with backup recovery
//! - `settings`: Variant selection and data-driven game rules

pub mod highscores;
pub mod persistence;
pub mod service;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use highscores::{HighScores, ScoreEntry};
pub use service::{LocalScoreService, ScoreError, ScoreService};
pub use session::{RunSummary, Session, SubmitOutcome};
pub use settings::{Rules, Settings, Variant};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player car size (opponents share it)
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    /// Distance from the bottom edge to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 150.0;
    /// Lateral movement per step while left/right is held
    pub const LATERAL_STEP: f32 = 5.0;

    /// Forward speed range and keyboard adjustment per step
    pub const MAX_SPEED: f32 = 200.0;
    pub const SPEED_STEP: f32 = 1.0;
    /// Speed change per unit of vertical swipe
    pub const SWIPE_SPEED_FACTOR: f32 = 0.1;

    /// Lane-marking scroll
    pub const ROAD_SPEED: f32 = 5.0;
    pub const ROAD_MARK_PERIOD: f32 = 50.0;
    /// Player speed divisor for the road scroll
    pub const ROAD_SPEED_DIVISOR: f32 = 20.0;
    /// Player speed divisor for the obstacle scroll
    pub const OBSTACLE_SCROLL_DIVISOR: f32 = 30.0;

    /// Opponents
    pub const OPPONENT_COUNT: usize = 3;
    pub const OPPONENT_SPACING: f32 = 200.0;
    pub const OPPONENT_RESPAWN_Y: f32 = -200.0;
    pub const OPPONENT_MIN_SPEED: f32 = 2.0;
    pub const OPPONENT_SPEED_RANGE: f32 = 2.0;

    /// Shooter variant
    pub const FIRE_RATE_MS: f64 = 500.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_SIZE: f32 = 6.0;

    /// Rewards
    pub const PASS_REWARD: u64 = 100;
    pub const HIT_REWARD: u64 = 200;
    pub const TIME_BONUS_INTERVAL_MS: f64 = 1000.0;
    pub const TIME_BONUS_RATE: u64 = 100;
}

/// Wrap a value into `[0, period)`
#[inline]
pub fn wrap(value: f32, period: f32) -> f32 {
    let wrapped = value % period;
    if wrapped < 0.0 {
        wrapped + period
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(55.0, 50.0), 5.0);
        assert_eq!(wrap(-5.0, 50.0), 45.0);
        assert_eq!(wrap(0.0, 50.0), 0.0);
    }
}
