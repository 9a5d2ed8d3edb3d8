//! Ball Packing headless runner
//!
//! Generates a playfield, drops particles on a fixed cadence (cycling through
//! the spouts) and runs the tick loop until the shape is filled or the frame
//! cap is reached. Prints a JSON summary of the run.
//!
//! Usage: `ball-packing [seed] [max_frames]`. Set `BALL_PACKING_SETTINGS` to a
//! JSON settings file to override tuning; `RUST_LOG` controls logging.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use ball_packing::Settings;
    use ball_packing::sim::{FillSession, TickInput, TickLoop};
    use serde::Serialize;

    /// Frames between particle drops
    const DROP_INTERVAL: u64 = 6;
    /// Frames between progress log lines
    const LOG_INTERVAL: u64 = 600;
    const DEFAULT_MAX_FRAMES: u64 = 20_000;

    #[derive(Debug, Serialize)]
    struct RunSummary {
        seed: u64,
        frames: u64,
        particles: usize,
        fill_percentage: f32,
        won: bool,
        outline_points: usize,
        spouts: usize,
        used_fallback: bool,
    }

    fn load_settings() -> Settings {
        match std::env::var("BALL_PACKING_SETTINGS") {
            Ok(path) => Settings::load(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring settings file {path}: {e}");
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str) -> Option<T> {
        let raw = arg?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Invalid {name} {raw:?}, using default");
                None
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = parse_arg(args.next(), "seed").unwrap_or_else(rand::random::<u64>);
        let max_frames = parse_arg(args.next(), "max_frames").unwrap_or(DEFAULT_MAX_FRAMES);

        let mut session = FillSession::new(seed, load_settings());
        let spout_count = session.spouts().len().max(1);

        let mut tick_loop = TickLoop::new();
        let handle = tick_loop.start();
        let mut frames = 0;
        let mut drops = 0;

        while frames < max_frames {
            let drop = frames % DROP_INTERVAL == 0;
            let input = TickInput {
                select_spout: drop.then_some(drops % spout_count),
                drop,
                reset: false,
            };
            if !tick_loop.run_frame(handle, &mut session, &input) {
                break;
            }
            if drop {
                drops += 1;
            }
            frames += 1;

            if frames % LOG_INTERVAL == 0 {
                log::info!(
                    "frame {frames}: {} particles, {:.1}% filled",
                    session.particles().len(),
                    session.fill_percentage()
                );
            }
        }
        tick_loop.cancel(handle);

        let summary = RunSummary {
            seed,
            frames,
            particles: session.particles().len(),
            fill_percentage: session.fill_percentage(),
            won: session.is_won(),
            outline_points: session.outline().len(),
            spouts: session.spouts().len(),
            used_fallback: session.playfield().used_fallback,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize run summary: {e}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ball Packing (native) starting...");
    runner::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm; nothing to run here
}
