//! headless: runs the pursuit engine against a stand-in renderer.
//!
//! The "renderer" polls the snapshot channel at a fixed frame rate, always
//! draws the newest generation, and counts the ticks it had to skip.  Drawing
//! is replaced by a per-category summary of the frame.
//!
//! ```text
//! headless [PRESET | CONFIG.json] [SECONDS]
//! ```
//!
//! `PRESET` is one of `trails`, `dense`, `swarm` (default `trails`).  A
//! `.json` argument is read as a `SimConfig`; missing fields take the
//! defaults.  Set `RUST_LOG=info` (or `debug`) for engine logs.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use ps_agent::Snapshot;
use ps_core::{Category, Preset, SimConfig};
use ps_sim::TracingObserver;

// ── Constants ─────────────────────────────────────────────────────────────────

const FRAME_RATE:       u32 = 60;
const DEFAULT_SECONDS:  u64 = 5;
const SUMMARY_INTERVAL: u64 = 600; // ticks between engine log summaries

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_config(arg: Option<&str>) -> Result<SimConfig> {
    let Some(arg) = arg else {
        return Ok(Preset::default().config());
    };
    if arg.ends_with(".json") {
        let path = Path::new(arg);
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        return Ok(config);
    }
    Ok(arg.parse::<Preset>()?.config())
}

// ── Frame summary ─────────────────────────────────────────────────────────────

/// What a real renderer would draw, reduced to numbers.
struct FrameSummary {
    count:       [usize; Category::COUNT],
    mean_radius: [f32; Category::COUNT],
    mean_step:   [f32; Category::COUNT],
}

impl FrameSummary {
    fn of(snapshot: &Snapshot) -> Self {
        let mut count = [0; Category::COUNT];
        let mut radius = [0.0; Category::COUNT];
        let mut step = [0.0; Category::COUNT];
        for view in snapshot.iter() {
            let i = view.category.index();
            count[i] += 1;
            radius[i] += view.position.distance_to_origin();
            step[i] += view.position.distance(view.previous_position);
        }
        let mean = |sum: [f32; Category::COUNT]| -> [f32; Category::COUNT] {
            std::array::from_fn(|i| if count[i] == 0 { 0.0 } else { sum[i] / count[i] as f32 })
        };
        Self { mean_radius: mean(radius), mean_step: mean(step), count }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let seconds: u64 = match args.get(1) {
        Some(s) => s.parse().with_context(|| format!("bad duration {s:?}"))?,
        None => DEFAULT_SECONDS,
    };

    println!("=== headless: pursuit simulation ===");
    println!(
        "Runners: {}  |  Hunters: {}  |  World radius: {}  |  Seed: {}",
        config.runners.count, config.hunters.count, config.world_radius, config.seed
    );
    println!("Rendering at {FRAME_RATE} fps for {seconds} s");
    println!();

    let handle = ps_sim::start_with_observer(config, TracingObserver::new(SUMMARY_INTERVAL))?;

    let frame = Duration::from_secs(1) / FRAME_RATE;
    let t0 = Instant::now();
    let mut frames = 0_u64;
    let mut empty_frames = 0_u64;
    let mut skipped = 0_usize;
    let mut last: Option<FrameSummary> = None;
    let mut last_tick = 0;

    while t0.elapsed() < Duration::from_secs(seconds) {
        let frame_start = Instant::now();
        match handle.try_latest()? {
            Some((snapshot, behind)) => {
                skipped += behind;
                last_tick = snapshot.tick.0;
                let summary = FrameSummary::of(&snapshot);
                debug!(
                    tick    = snapshot.tick.0,
                    skipped = behind,
                    runners = summary.count[Category::Runner.index()],
                    hunters = summary.count[Category::Hunter.index()],
                    "frame"
                );
                last = Some(summary);
            }
            None => empty_frames += 1,
        }
        frames += 1;
        if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    let published = handle.published();
    let final_tick = handle.stop()?;
    let elapsed = t0.elapsed();
    info!(final_tick = final_tick.0, "engine joined");

    // Summary.
    println!("Ran {:.2} s: {} ticks simulated, {} published", elapsed.as_secs_f64(), final_tick.0, published);
    println!("  frames drawn   : {frames} ({empty_frames} without a new generation)");
    println!("  last drawn tick: {last_tick}");
    println!("  ticks skipped  : {skipped}");
    if let Some(summary) = last {
        for category in Category::ALL {
            let i = category.index();
            println!(
                "  {:<7} n={:<4} mean |pos|={:>7.1}  mean step={:.3}",
                category.as_str(),
                summary.count[i],
                summary.mean_radius[i],
                summary.mean_step[i]
            );
        }
    }

    Ok(())
}
