//! Road Dodger entry point
//!
//! Native builds run a headless autopilot session and post the result to a
//! file-backed leaderboard. The browser build is driven from JavaScript
//! through `road_dodger::wasm`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use road_dodger::session::{Session, SubmitOutcome};
    use road_dodger::settings::{Settings, Variant};
    use road_dodger::sim::autopilot;
    use road_dodger::{LocalScoreService, ScoreService};

    /// Headless Road Dodger runner
    #[derive(Parser, Debug)]
    #[command(name = "road-dodger", version, about)]
    struct Args {
        /// Run seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// classic, shooter, survival or arcade (overrides the settings file)
        #[arg(long)]
        variant: Option<Variant>,

        /// Maximum steps before giving up on the run
        #[arg(long, default_value_t = 36_000)]
        steps: u32,

        /// Milliseconds per step
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        dt: f64,

        /// Name to submit the score under (skip submission when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Leaderboard file (overrides the settings file)
        #[arg(long)]
        scores: Option<PathBuf>,

        /// Settings JSON file
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let args = Args::parse();

        let mut settings = match &args.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        if let Some(variant) = args.variant {
            settings.variant = variant;
        }
        if let Some(path) = &args.scores {
            settings.leaderboard_path = Some(path.clone());
        }

        let service = match &settings.leaderboard_path {
            Some(path) => LocalScoreService::open(path)
                .with_context(|| format!("opening leaderboard {}", path.display()))?,
            None => LocalScoreService::in_memory(),
        };

        let seed = args.seed.unwrap_or_else(rand::random);
        log::info!(
            "Road Dodger (native) starting: seed {seed}, {} variant",
            settings.variant.as_str()
        );

        let mut session = Session::new(&settings, service, seed);
        session.on_exit(|run| {
            println!(
                "Run {} over after {:.1}s: score {} + time bonus {} = {}",
                run.run,
                run.elapsed_ms / 1000.0,
                run.score,
                run.time_bonus,
                run.total_score
            );
        });

        session.start_run();
        let mut finished = false;
        for _ in 0..args.steps {
            let input = autopilot::plan(session.state());
            if session.step(&input, args.dt).just_ended {
                finished = true;
                break;
            }
        }
        if !finished {
            let result = session.last_result();
            println!(
                "Still driving after {} steps: score {}",
                args.steps, result.total_score
            );
            return Ok(());
        }

        if let Some(name) = &args.name {
            match session.submit_score(name) {
                SubmitOutcome::Submitted(_) => {
                    if let Some(path) = &args.settings {
                        settings.remember_name(name);
                        if let Err(e) = settings.write_to(path) {
                            log::warn!("Settings not saved: {e}");
                        }
                    }
                }
                SubmitOutcome::Rejected => println!("Name is blank, score not submitted"),
                SubmitOutcome::NothingToSubmit | SubmitOutcome::Failed => {}
            }
        }

        let board = session.service().board();
        if board.is_empty() {
            println!("\nNo high scores yet");
            return Ok(());
        }
        println!("\nHigh scores");
        let scores = session.service().get_high_scores()?;
        for (index, entry) in scores.iter().enumerate() {
            println!("{:>2}. {:<16} {:>8}", index + 1, entry.name, entry.score);
        }
        if let Some(best) = board.top_score() {
            println!("Best: {best}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is road_dodger::wasm::wasm_start
}
