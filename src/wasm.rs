//! Browser bindings
//!
//! The page owns the canvas and the animation frame loop; it calls `step`
//! once per frame and draws the returned JSON snapshot.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::highscores::{HighScores, ScoreEntry};
use crate::service::{LocalScoreService, ScoreError, ScoreService};
use crate::session::{Session, SubmitOutcome};
use crate::settings::{Settings, Variant};
use crate::sim::{PointerDelta, StepInput};

/// Leaderboard kept in LocalStorage
struct BrowserScoreService {
    inner: LocalScoreService,
}

impl BrowserScoreService {
    fn load() -> Self {
        Self {
            inner: LocalScoreService::with_board(HighScores::load()),
        }
    }
}

impl ScoreService for BrowserScoreService {
    fn add_score(&mut self, name: &str, score: u64) -> Result<Vec<ScoreEntry>, ScoreError> {
        let board = self.inner.add_score(name, score)?;
        if !self.inner.board().save() {
            return Err(ScoreError::Rejected("LocalStorage unavailable".into()));
        }
        Ok(board)
    }

    fn get_high_scores(&self) -> Result<Vec<ScoreEntry>, ScoreError> {
        self.inner.get_high_scores()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Snapshot serialization failed: {e}");
        "null".to_string()
    })
}

/// Game instance exported to JavaScript
#[wasm_bindgen]
pub struct WasmGame {
    session: Rc<RefCell<Session<BrowserScoreService>>>,
    settings: Rc<RefCell<Settings>>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game on the menu. An unknown variant keeps the saved one.
    #[wasm_bindgen(constructor)]
    pub fn new(variant: Option<String>) -> WasmGame {
        let mut settings = Settings::load();
        if let Some(variant) = variant.as_deref().and_then(Variant::parse) {
            settings.variant = variant;
        }

        let seed = js_sys::Date::now() as u64;
        log::info!(
            "Game initialized with seed: {} ({} variant)",
            seed,
            settings.variant.as_str()
        );
        let session = Session::new(&settings, BrowserScoreService::load(), seed);

        WasmGame {
            session: Rc::new(RefCell::new(session)),
            settings: Rc::new(RefCell::new(settings)),
        }
    }

    #[wasm_bindgen(js_name = startRun)]
    pub fn start_run(&self) -> String {
        to_json(self.session.borrow_mut().start_run())
    }

    /// Advance one frame and return the snapshot as JSON
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &self,
        left: bool,
        right: bool,
        accelerate: bool,
        decelerate: bool,
        fire: bool,
        dx: f32,
        dy: f32,
        tap: bool,
        dt_ms: f64,
    ) -> String {
        let pointer = (dx != 0.0 || dy != 0.0 || tap).then_some(PointerDelta {
            dx,
            dy,
            is_tap: tap,
        });
        let input = StepInput {
            left,
            right,
            accelerate,
            decelerate,
            fire,
            pointer,
        };
        to_json(self.session.borrow_mut().step(&input, dt_ms))
    }

    #[wasm_bindgen(js_name = returnToMenu)]
    pub fn return_to_menu(&self) -> String {
        to_json(self.session.borrow_mut().return_to_menu())
    }

    /// Last name used, to prefill the entry box
    #[wasm_bindgen(js_name = lastPlayerName)]
    pub fn last_player_name(&self) -> Option<String> {
        self.settings.borrow().last_player_name.clone()
    }

    /// Submit the finished run outside the frame loop.
    ///
    /// `on_done` receives the outcome JSON once the submission settles.
    #[wasm_bindgen(js_name = submitScore)]
    pub fn submit_score(&self, name: String, on_done: js_sys::Function) {
        let session = Rc::clone(&self.session);
        let settings = Rc::clone(&self.settings);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = session.borrow_mut().submit_score(&name);
            if matches!(outcome, SubmitOutcome::Submitted(_)) {
                let mut settings = settings.borrow_mut();
                settings.remember_name(&name);
                settings.save();
            }
            let json = JsValue::from_str(&to_json(&outcome));
            if let Err(e) = on_done.call1(&JsValue::NULL, &json) {
                log::warn!("Submit callback failed: {e:?}");
            }
        });
    }

    /// Leaderboard as JSON (`null` if unavailable)
    #[wasm_bindgen(js_name = highScores)]
    pub fn high_scores(&self) -> String {
        to_json(&self.session.borrow().high_scores())
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Road Dodger starting...");
}
