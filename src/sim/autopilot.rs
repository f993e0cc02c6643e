//! Idle/demo mode: derives inputs from the current state
//!
//! Used by the headless runner and the attract screen. Reads the state only,
//! so replays stay deterministic.

use super::state::{GamePhase, GameState, Obstacle};
use super::tick::StepInput;

/// Speed the autopilot settles at
pub const CRUISE_SPEED: f32 = 60.0;
/// Extra clearance kept on each side of the car when judging threats
pub const LANE_MARGIN: f32 = 12.0;
/// How far ahead (field units above the car) obstacles count as threats
pub const LOOKAHEAD: f32 = 260.0;

/// Pick inputs for the next step
pub fn plan(state: &GameState) -> StepInput {
    let mut input = StepInput::default();
    if state.phase != GamePhase::Playing {
        return input;
    }

    let player = &state.player;
    if player.speed < CRUISE_SPEED {
        input.accelerate = true;
    } else if player.speed > CRUISE_SPEED {
        input.decelerate = true;
    }

    let lane_left = player.pos.x - LANE_MARGIN;
    let lane_right = player.pos.x + player.size.x + LANE_MARGIN;
    let in_lane = |o: &Obstacle| o.pos.x < lane_right && o.pos.x + o.size.x > lane_left;

    // Closest obstacle bearing down on our lane
    let threat = state
        .obstacles
        .iter()
        .filter(|o| in_lane(*o))
        .filter(|o| {
            let gap = player.pos.y - (o.pos.y + o.size.y);
            gap > -player.size.y && gap < LOOKAHEAD
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(threat) = threat {
        let threat_center = threat.pos.x + threat.size.x / 2.0;
        let player_center = player.pos.x + player.size.x / 2.0;
        let room_left = player.pos.x;
        let room_right = state.rules.player_max_x() - player.pos.x;

        let go_left = if (threat_center - player_center).abs() < 1.0 {
            room_left > room_right
        } else {
            threat_center > player_center
        };
        // Switch sides when pinned against the edge
        let go_left = if go_left && room_left < state.rules.lateral_step {
            false
        } else if !go_left && room_right < state.rules.lateral_step {
            true
        } else {
            go_left
        };

        input.left = go_left;
        input.right = !go_left;
    }

    if state.variant.shooting_enabled() {
        let muzzle_x = player.pos.x + player.size.x / 2.0;
        input.fire = state.obstacles.iter().any(|o| {
            o.pos.y + o.size.y <= player.pos.y
                && o.pos.x <= muzzle_x
                && muzzle_x <= o.pos.x + o.size.x
        });
    }

    input
}
