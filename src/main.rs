//! Dino Dash headless runner
//!
//! Drives the simulation with a fixed frame clock and a simple autopilot
//! standing in for the keyboard. Useful for balance checks and soak runs.

use std::path::PathBuf;

use clap::Parser;
use env_logger::{Builder, Env};

use dino_dash::sim::{Round, TickInput, format_score};
use dino_dash::{Tuning, TuningError};

/// Longest frame the host passes to the simulation (ms)
const MAX_FRAME_MS: f32 = 100.0;

#[derive(Parser, Debug)]
#[command(name = "dino-dash", about = "Run the Dino Dash simulation headless")]
struct Args {
    /// Tuning JSON file (defaults are used for missing fields)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Frame time in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f32,

    /// Give up on a round after this many frames
    #[arg(long, default_value_t = 36_000)]
    max_frames: u32,

    /// Number of rounds to play
    #[arg(long, default_value_t = 1)]
    rounds: u32,

    /// Print every tick result as a JSON line
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Turns raw key state into the edge/duration signals the sim expects
#[derive(Debug, Default)]
struct InputTracker {
    jump_down: bool,
    jump_held_ms: f32,
}

impl InputTracker {
    fn sample(&mut self, jump_down: bool, duck_down: bool, frame_ms: f32) -> TickInput {
        let just_pressed = jump_down && !self.jump_down;
        if just_pressed {
            self.jump_held_ms = 0.0;
        } else if jump_down {
            self.jump_held_ms += frame_ms;
        }
        self.jump_down = jump_down;

        TickInput {
            jump_just_pressed: just_pressed,
            jump_held: jump_down,
            jump_held_ms: if jump_down { self.jump_held_ms } else { 0.0 },
            duck_held: duck_down,
        }
    }
}

/// Hold jump while an obstacle is close ahead
fn autopilot(round: &Round) -> bool {
    let state = round.state();
    let player = &state.player;
    let reach = player.duck_hitbox(&state.tuning).right();
    let nearest = state
        .obstacles
        .iter()
        .map(|o| o.bounds())
        .filter(|b| b.right() > player.pos.x)
        .map(|b| b.left() - reach)
        .fold(f32::INFINITY, f32::min);

    if player.on_floor {
        (40.0..80.0).contains(&nearest)
    } else {
        player.velocity_y < 0.0
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() -> Result<(), TuningError> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };
    if let Some(seed) = args.seed {
        tuning.seed = seed;
    }
    tuning.validate()?;

    log::info!("Dino Dash (headless) starting, seed {}", tuning.seed);

    let frame_ms = args.frame_ms.min(MAX_FRAME_MS);
    let mut round = Round::new(tuning);
    let mut input = InputTracker::default();

    for index in 0..args.rounds {
        if index > 0 {
            round.request_restart();
            round.tick(frame_ms, &TickInput::default());
        }

        let mut frames = 0;
        while round.is_running() && frames < args.max_frames {
            let signals = input.sample(autopilot(&round), false, frame_ms);
            let result = round.tick(frame_ms, &signals);
            if args.json {
                match serde_json::to_string(&result) {
                    Ok(line) => println!("{line}"),
                    Err(e) => log::warn!("Failed to encode tick: {}", e),
                }
            }
            frames += 1;
        }

        if round.is_running() {
            log::info!("Round {} still running after {} frames", index + 1, frames);
        }
        println!(
            "round {:>3}  score {}  frames {}",
            index + 1,
            format_score(round.score()),
            frames
        );
    }

    println!("best {}", format_score(round.best_score()));
    Ok(())
}
