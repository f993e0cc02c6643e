//! Per-frame simulation step
//!
//! Advances a run by one discrete step. Motion is per step (one step per
//! driver frame); `dt_ms` feeds the run clock used for fire rate and the
//! survival bonus.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::state::{GamePhase, GameState};

/// Relative pointer/touch movement since the previous step
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerDelta {
    /// Horizontal movement in field units
    pub dx: f32,
    /// Vertical movement in screen coordinates (negative = swipe up)
    pub dy: f32,
    /// A tap since the previous step (fires in shooter variants)
    pub is_tap: bool,
}

/// Input intents sampled for a single step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInput {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub decelerate: bool,
    pub fire: bool,
    /// Pointer/touch variant input
    pub pointer: Option<PointerDelta>,
}

impl StepInput {
    fn wants_fire(&self) -> bool {
        self.fire || self.pointer.is_some_and(|p| p.is_tap)
    }
}

/// Numeric snapshot of a box on the road
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// What the driver needs after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub phase: GamePhase,
    pub score: u64,
    pub time_bonus: u64,
    /// `score + time_bonus`
    pub total_score: u64,
    pub speed: f32,
    pub road_offset: f32,
    pub elapsed_ms: f64,
    pub player: EntitySnapshot,
    pub obstacles: Vec<EntitySnapshot>,
    pub projectiles: Vec<EntitySnapshot>,
    /// Set only on the step that ended the run
    pub just_ended: bool,
}

impl StepResult {
    /// Snapshot the current state
    pub fn capture(state: &GameState, just_ended: bool) -> Self {
        let player = &state.player;
        Self {
            phase: state.phase,
            score: state.score,
            time_bonus: state.time_bonus,
            total_score: state.total_score(),
            speed: player.speed,
            road_offset: state.road_offset,
            elapsed_ms: state.elapsed_ms,
            player: snapshot(0, player.pos, player.size),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| snapshot(o.id, o.pos, o.size))
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| snapshot(p.id, p.pos, Vec2::splat(p.size)))
                .collect(),
            just_ended,
        }
    }
}

fn snapshot(id: u32, pos: Vec2, size: Vec2) -> EntitySnapshot {
    EntitySnapshot {
        id,
        x: pos.x,
        y: pos.y,
        width: size.x,
        height: size.y,
    }
}

/// Begin a new run from any phase
pub fn start_run<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) -> StepResult {
    state.reset_run(rng);
    state.phase = GamePhase::Playing;
    state.runs_started += 1;
    log::info!(
        "Run {} started ({} variant)",
        state.runs_started,
        state.variant.as_str()
    );
    StepResult::capture(state, false)
}

/// Leave the game-over screen for the menu. No-op in other phases.
pub fn return_to_menu(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        state.phase = GamePhase::Menu;
    }
}

/// Advance the run by one step
pub fn step<R: RandomSource + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    input: &StepInput,
    dt_ms: f64,
) -> StepResult {
    if state.phase != GamePhase::Playing {
        return StepResult::capture(state, false);
    }
    // Zero, negative and NaN frame times advance nothing
    if !(dt_ms > 0.0) || !dt_ms.is_finite() {
        return StepResult::capture(state, false);
    }

    state.elapsed_ms += dt_ms;

    apply_steering(state, input);
    apply_throttle(state, input);
    if state.variant.shooting_enabled() && input.wants_fire() {
        try_fire(state);
    }

    let rules = &state.rules;
    let scroll = rules.road_speed + state.player.speed / crate::consts::ROAD_SPEED_DIVISOR;
    state.road_offset = crate::wrap(state.road_offset + scroll, rules.road_mark_period);

    advance_projectiles(state, rng);
    advance_obstacles(state, rng);

    let just_ended = check_player_collision(state);

    if !just_ended && state.variant.time_bonus_enabled() {
        accrue_time_bonus(state);
    }

    StepResult::capture(state, just_ended)
}

fn apply_steering(state: &mut GameState, input: &StepInput) {
    let rules = &state.rules;
    let player = &mut state.player;
    if input.left {
        player.nudge(-rules.lateral_step, rules);
    }
    if input.right {
        player.nudge(rules.lateral_step, rules);
    }
    if let Some(pointer) = input.pointer {
        if pointer.dx.is_finite() {
            player.nudge(pointer.dx, rules);
        }
    }
}

fn apply_throttle(state: &mut GameState, input: &StepInput) {
    let rules = &state.rules;
    let player = &mut state.player;
    if input.accelerate {
        player.adjust_speed(rules.speed_step, rules);
    }
    if input.decelerate {
        player.adjust_speed(-rules.speed_step, rules);
    }
    if let Some(pointer) = input.pointer {
        if pointer.dy.is_finite() && pointer.dy != 0.0 {
            player.adjust_speed(-pointer.dy * rules.swipe_speed_factor, rules);
        }
    }
}

/// Spawn a projectile if the fire rate allows; early shots are dropped
fn try_fire(state: &mut GameState) {
    let ready = state
        .last_shot_ms
        .is_none_or(|last| state.elapsed_ms - last >= state.rules.fire_rate_ms);
    if ready {
        state.spawn_projectile();
        state.last_shot_ms = Some(state.elapsed_ms);
    }
}

fn advance_projectiles<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) {
    let rules = &state.rules;
    let obstacles = &mut state.obstacles;
    let mut gained = 0;

    state.projectiles.retain_mut(|projectile| {
        projectile.pos.y -= projectile.speed;
        let shot = projectile.rect();

        if let Some(target) = obstacles.iter_mut().find(|o| o.rect().overlaps(&shot)) {
            gained += target.kind.hit_reward(rules);
            log::debug!("Projectile {} destroyed obstacle {}", projectile.id, target.id);
            target.respawn(rng, rules);
            return false;
        }

        !projectile.is_off_field()
    });

    state.score += gained;
}

fn advance_obstacles<R: RandomSource + ?Sized>(state: &mut GameState, rng: &mut R) {
    let rules = &state.rules;
    let scroll = state.player.speed / crate::consts::OBSTACLE_SCROLL_DIVISOR;
    let mut gained = 0;

    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.speed + scroll;
        if obstacle.has_passed(rules) {
            gained += obstacle.kind.pass_reward(rules);
            log::debug!("Obstacle {} passed", obstacle.id);
            obstacle.respawn(rng, rules);
        }
    }

    state.score += gained;
}

/// Returns true when this step ended the run
fn check_player_collision(state: &mut GameState) -> bool {
    let car = state.player.rect();
    let Some(hit) = state.obstacles.iter().find(|o| o.rect().overlaps(&car)) else {
        return false;
    };

    log::info!(
        "Run {} over: collided with obstacle {} (score {}, bonus {}, {:.1}s)",
        state.runs_started,
        hit.id,
        state.score,
        state.time_bonus,
        state.elapsed_ms / 1000.0
    );
    state.phase = GamePhase::GameOver;
    true
}

fn accrue_time_bonus(state: &mut GameState) {
    let interval = state.rules.time_bonus_interval_ms;
    if !(interval > 0.0) {
        return;
    }
    let due = (state.elapsed_ms / interval).floor() as u64;
    if due > state.bonus_intervals {
        state.time_bonus += (due - state.bonus_intervals) * state.rules.time_bonus_rate;
        state.bonus_intervals = due;
    }
}
