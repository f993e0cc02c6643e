//! Game state and core simulation types
//!
//! Everything a run mutates lives in `GameState`; drivers hold one instance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::rng::RandomSource;
use crate::settings::{Rules, Variant};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the title menu
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended by a collision
    GameOver,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Forward speed, 0..=max_speed
    pub speed: f32,
}

impl Player {
    /// Player at the starting line
    pub fn new(rules: &Rules) -> Self {
        Self {
            pos: Vec2::new(
                (rules.field_width / 2.0).min(rules.player_max_x()),
                rules.player_y(),
            ),
            size: Vec2::new(rules.player_width, rules.player_height),
            speed: 0.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Shift horizontally, clamped to the road
    pub fn nudge(&mut self, dx: f32, rules: &Rules) {
        self.pos.x = (self.pos.x + dx).clamp(0.0, rules.player_max_x());
    }

    /// Change forward speed, clamped
    pub fn adjust_speed(&mut self, delta: f32, rules: &Rules) {
        self.speed = (self.speed + delta).clamp(0.0, rules.max_speed);
    }

    /// Where a fired projectile appears: centred on the car, at its top edge
    pub fn muzzle(&self, projectile_size: f32) -> Vec2 {
        Vec2::new(
            self.pos.x + (self.size.x - projectile_size) / 2.0,
            self.pos.y,
        )
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// An opponent car blocking the lane
    #[default]
    Blocking,
}

impl ObstacleKind {
    /// Reward for letting this obstacle leave the bottom of the road
    pub fn pass_reward(&self, rules: &Rules) -> u64 {
        match self {
            ObstacleKind::Blocking => rules.pass_reward,
        }
    }

    /// Reward for shooting this obstacle
    pub fn hit_reward(&self, rules: &Rules) -> u64 {
        match self {
            ObstacleKind::Blocking => rules.hit_reward,
        }
    }
}

/// An opponent vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Base downward speed per step
    pub speed: f32,
}

impl Obstacle {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Move back above the road at a fresh random x. Speed is kept.
    pub fn respawn<R: RandomSource + ?Sized>(&mut self, rng: &mut R, rules: &Rules) {
        self.pos = Vec2::new(
            rng.next_unit() * rules.opponent_max_x(),
            rules.opponent_respawn_y,
        );
    }

    /// Fully below the bottom edge of the road
    #[inline]
    pub fn has_passed(&self, rules: &Rules) -> bool {
        self.pos.y >= rules.field_height
    }
}

/// A player-fired shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    /// Upward speed per step
    pub speed: f32,
}

impl Projectile {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, Vec2::splat(self.size))
    }

    /// Entirely above the top edge of the road
    #[inline]
    pub fn is_off_field(&self) -> bool {
        self.pos.y < -self.size
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Rule set for this state
    pub variant: Variant,
    pub rules: Rules,
    /// Current phase
    pub phase: GamePhase,
    /// Player car
    pub player: Player,
    /// Opponents (stable order by id)
    pub obstacles: Vec<Obstacle>,
    /// Projectiles in flight (stable order by id)
    pub projectiles: Vec<Projectile>,
    /// Points from passed and destroyed obstacles
    pub score: u64,
    /// Points from survival time, shown and submitted alongside `score`
    pub time_bonus: u64,
    /// Lane-marking scroll phase (cosmetic)
    pub road_offset: f32,
    /// Run time in milliseconds
    pub elapsed_ms: f64,
    /// Run time of the last accepted shot
    pub last_shot_ms: Option<f64>,
    /// Number of bonus intervals already credited
    pub bonus_intervals: u64,
    /// Runs started on this state
    pub runs_started: u32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a state sitting on the menu
    pub fn new(variant: Variant, rules: Rules) -> Self {
        Self {
            variant,
            player: Player::new(&rules),
            rules,
            phase: GamePhase::Menu,
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            time_bonus: 0,
            road_offset: 0.0,
            elapsed_ms: 0.0,
            last_shot_ms: None,
            bonus_intervals: 0,
            runs_started: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score as displayed and submitted
    #[inline]
    pub fn total_score(&self) -> u64 {
        self.score + self.time_bonus
    }

    /// Discard the previous run and lay out a fresh one
    pub fn reset_run<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.score = 0;
        self.time_bonus = 0;
        self.road_offset = 0.0;
        self.elapsed_ms = 0.0;
        self.last_shot_ms = None;
        self.bonus_intervals = 0;
        self.player = Player::new(&self.rules);
        self.projectiles.clear();
        self.spawn_obstacles(rng);
    }

    /// Replace all opponents with a fresh staggered column above the road
    pub fn spawn_obstacles<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.obstacles.clear();
        for i in 0..self.rules.opponent_count {
            let x = rng.next_unit() * self.rules.opponent_max_x();
            let speed = rng.next_in(
                self.rules.opponent_min_speed,
                self.rules.opponent_speed_range,
            );
            let obstacle = Obstacle {
                id: self.next_entity_id(),
                kind: ObstacleKind::Blocking,
                pos: Vec2::new(x, -((i + 1) as f32) * self.rules.opponent_spacing),
                size: Vec2::new(self.rules.opponent_width, self.rules.opponent_height),
                speed,
            };
            self.obstacles.push(obstacle);
        }
    }

    /// Spawn a projectile at the player's muzzle
    pub fn spawn_projectile(&mut self) {
        let size = self.rules.projectile_size;
        let projectile = Projectile {
            id: self.next_entity_id(),
            pos: self.player.muzzle(size),
            size,
            speed: self.rules.projectile_speed,
        };
        self.projectiles.push(projectile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRandom;

    #[test]
    fn test_new_state_is_on_menu() {
        let state = GameState::new(Variant::Classic, Rules::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.player.pos, Vec2::new(400.0, 450.0));
    }

    #[test]
    fn test_spawn_obstacles_layout() {
        let mut state = GameState::new(Variant::Classic, Rules::default());
        let mut rng = ScriptedRandom::constant(0.5);
        state.spawn_obstacles(&mut rng);

        assert_eq!(state.obstacles.len(), 3);
        for (i, obstacle) in state.obstacles.iter().enumerate() {
            assert_eq!(obstacle.pos.x, 370.0);
            assert_eq!(obstacle.pos.y, -200.0 * (i as f32 + 1.0));
            assert_eq!(obstacle.speed, 3.0);
        }
    }

    #[test]
    fn test_player_clamps() {
        let rules = Rules::default();
        let mut player = Player::new(&rules);
        player.nudge(-10_000.0, &rules);
        assert_eq!(player.pos.x, 0.0);
        player.nudge(10_000.0, &rules);
        assert_eq!(player.pos.x, 740.0);
        player.adjust_speed(500.0, &rules);
        assert_eq!(player.speed, 200.0);
        player.adjust_speed(-500.0, &rules);
        assert_eq!(player.speed, 0.0);
    }

    #[test]
    fn test_muzzle_is_centered() {
        let rules = Rules::default();
        let player = Player::new(&rules);
        let muzzle = player.muzzle(6.0);
        assert_eq!(muzzle.x + 3.0, player.rect().center().x);
        assert_eq!(muzzle.y, player.pos.y);
    }

    #[test]
    fn test_respawn_keeps_speed() {
        let rules = Rules::default();
        let mut obstacle = Obstacle {
            id: 1,
            kind: ObstacleKind::Blocking,
            pos: Vec2::new(10.0, 700.0),
            size: Vec2::new(60.0, 100.0),
            speed: 3.5,
        };
        assert!(obstacle.has_passed(&rules));
        obstacle.respawn(&mut ScriptedRandom::constant(0.25), &rules);
        assert_eq!(obstacle.pos, Vec2::new(185.0, -200.0));
        assert_eq!(obstacle.speed, 3.5);
    }

    #[test]
    fn test_rewards_are_uniform() {
        let rules = Rules::default();
        assert_eq!(ObstacleKind::Blocking.pass_reward(&rules), 100);
        assert_eq!(ObstacleKind::Blocking.hit_reward(&rules), 200);
    }
}
