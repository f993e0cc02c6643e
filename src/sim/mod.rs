//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One discrete step per driver call, never self-scheduled
//! - Injected RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, platform or I/O dependencies

pub mod autopilot;
pub mod collision;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Rect, aabb_overlap, legacy_corner_distance_overlap};
pub use rng::{RandomSource, ScriptedRandom, seeded};
pub use state::{GamePhase, GameState, Obstacle, ObstacleKind, Player, Projectile};
pub use tick::{
    EntitySnapshot, PointerDelta, StepInput, StepResult, return_to_menu, start_run, step,
};
