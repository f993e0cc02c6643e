//! Driver-facing game session
//!
//! Owns one `GameState`, its random source and the score service. Drivers
//! call `step` once per frame and submit the final score after a run ends,
//! never from inside a step.

use rand_pcg::Pcg32;

use crate::highscores::ScoreEntry;
use crate::service::{ScoreError, ScoreService, validate_name};
use crate::settings::Settings;
use crate::sim::{self, GamePhase, GameState, RandomSource, StepInput, StepResult};

/// Final numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct RunSummary {
    pub run: u32,
    pub score: u64,
    pub time_bonus: u64,
    pub total_score: u64,
    pub elapsed_ms: f64,
}

/// What happened to a score submission
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", content = "scores")]
pub enum SubmitOutcome {
    /// Stored; carries the updated leaderboard
    Submitted(Vec<ScoreEntry>),
    /// Blank name, nothing was sent
    Rejected,
    /// No finished run to submit
    NothingToSubmit,
    /// The service call failed; already logged
    Failed,
}

type ExitCallback = Box<dyn FnMut(&RunSummary)>;

/// One player's game: simulation, randomness and leaderboard
pub struct Session<S: ScoreService, R: RandomSource = Pcg32> {
    state: GameState,
    rng: R,
    service: S,
    last_result: StepResult,
    last_run: Option<RunSummary>,
    on_exit: Vec<ExitCallback>,
}

impl<S: ScoreService> Session<S, Pcg32> {
    /// Session with a seeded PCG random source
    pub fn new(settings: &Settings, service: S, seed: u64) -> Self {
        Self::with_rng(settings, service, sim::seeded(seed))
    }
}

impl<S: ScoreService, R: RandomSource> Session<S, R> {
    /// Session with a caller-supplied random source
    pub fn with_rng(settings: &Settings, service: S, rng: R) -> Self {
        let state = GameState::new(settings.variant, settings.rules.clone());
        let last_result = StepResult::capture(&state, false);
        Self {
            state,
            rng,
            service,
            last_result,
            last_run: None,
            on_exit: Vec::new(),
        }
    }

    /// Register a callback fired once when a run ends
    pub fn on_exit(&mut self, callback: impl FnMut(&RunSummary) + 'static) {
        self.on_exit.push(Box::new(callback));
    }

    /// Start (or restart) a run. An unsubmitted previous run is dropped.
    pub fn start_run(&mut self) -> &StepResult {
        self.last_run = None;
        self.last_result = sim::start_run(&mut self.state, &mut self.rng);
        &self.last_result
    }

    /// Advance one frame
    pub fn step(&mut self, input: &StepInput, dt_ms: f64) -> &StepResult {
        self.last_result = sim::step(&mut self.state, &mut self.rng, input, dt_ms);

        if self.last_result.just_ended {
            let summary = RunSummary {
                run: self.state.runs_started,
                score: self.state.score,
                time_bonus: self.state.time_bonus,
                total_score: self.state.total_score(),
                elapsed_ms: self.state.elapsed_ms,
            };
            self.last_run = Some(summary);
            for callback in &mut self.on_exit {
                callback(&summary);
            }
        }
        &self.last_result
    }

    /// Leave the game-over screen
    pub fn return_to_menu(&mut self) -> &StepResult {
        sim::return_to_menu(&mut self.state);
        self.last_result = StepResult::capture(&self.state, false);
        &self.last_result
    }

    /// Submit the last finished run under `name`.
    ///
    /// A run is stored at most once. Failures are logged and reported as
    /// `Failed`; nothing is retried, but the run stays available.
    pub fn submit_score(&mut self, name: &str) -> SubmitOutcome {
        let Ok(name) = validate_name(name) else {
            return SubmitOutcome::Rejected;
        };
        let Some(run) = self.last_run else {
            return SubmitOutcome::NothingToSubmit;
        };

        match self.service.add_score(name, run.total_score) {
            Ok(board) => {
                self.last_run = None;
                SubmitOutcome::Submitted(board)
            }
            Err(ScoreError::EmptyName) => SubmitOutcome::Rejected,
            Err(e) => {
                log::error!("Error submitting score: {e}");
                SubmitOutcome::Failed
            }
        }
    }

    /// Current leaderboard, or None if the service failed (logged)
    pub fn high_scores(&self) -> Option<Vec<ScoreEntry>> {
        match self.service.get_high_scores() {
            Ok(scores) => Some(scores),
            Err(e) => {
                log::error!("Error fetching scores: {e}");
                None
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn last_result(&self) -> &StepResult {
        &self.last_result
    }

    pub fn last_run(&self) -> Option<RunSummary> {
        self.last_run
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}
