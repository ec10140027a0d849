//! Stack Tower headless runner
//!
//! Plays one autoplay run at a fixed 60 Hz frame rate and prints the final
//! snapshot as JSON. Usage: `stack-tower [seed] [tuning.json]`.

use stack_tower::SessionStats;
use stack_tower::renderer::project;
use stack_tower::sim::{RunPhase, SimState, TickInput, tick};
use stack_tower::tuning::Tuning;

const FRAME_DT: f32 = 1.0 / 60.0;
/// Hard stop for runs that never miss
const MAX_FRAMES: u32 = 60 * 60 * 10;

fn load_tuning(path: Option<&str>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(2);
            }
        },
        Err(e) => {
            log::error!("Failed to read {path}: {e}");
            std::process::exit(2);
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let tuning = load_tuning(args.get(1).map(String::as_str));
    log::info!("Stack Tower (headless) starting with seed {seed}");

    let mut state = SimState::new(tuning, seed);
    let mut stats = SessionStats::new();
    let input = TickInput {
        start: true,
        autoplay: true,
        ..Default::default()
    };
    tick(&mut state, &input, 0.0);

    let steady = TickInput {
        autoplay: true,
        ..Default::default()
    };
    let mut frames = 0;
    while state.phase == RunPhase::Playing && frames < MAX_FRAMES {
        tick(&mut state, &steady, FRAME_DT);
        stats.extend(state.drain_events());
        frames += 1;
    }

    // Let debris and bursts settle
    for _ in 0..60 {
        tick(&mut state, &TickInput::default(), FRAME_DT);
    }

    let snapshot = state.snapshot();
    let frame = project(
        &snapshot,
        state.tuning.block_height,
        state.tuning.pulse_duration,
    );
    log::info!(
        "Finished after {frames} frames: score {} | best streak {} | {} instances",
        snapshot.score,
        stats.best_perfect_streak,
        frame.blocks.len()
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }
}
