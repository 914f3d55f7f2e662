//! # VRBRIDGE Headless Simulator
//!
//! Runs the full bridge against a scripted, jittered headset session and
//! prints what reached the input-emulation layer and the compositor.
//!
//! ```text
//! vrbridge_sim [--seconds N] [--seed N] [--config path.toml]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::collections::HashMap;
use std::process::ExitCode;
use std::thread;
use std::time::Instant;

use crossbeam_channel::bounded;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vrbridge::core::{ChannelSink, Eye};
use vrbridge::rendering::HeadlessAllocator;
use vrbridge::shared::SinkEvent;
use vrbridge::{BridgeConfig, BridgeContext, FrameStatsAccumulator, ScriptedScenario};

/// Input events buffered between the bridge and the consumer thread.
const SINK_CAPACITY: usize = 1024;

struct Args {
    seconds: u32,
    seed: u64,
    config: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { seconds: 24, seed: 0x5EED, config: None };
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = || iter.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--seconds" => args.seconds = value()?.parse().map_err(|e| format!("--seconds: {e}"))?,
            "--seed" => args.seed = value()?.parse().map_err(|e| format!("--seed: {e}"))?,
            "--config" => args.config = Some(value()?),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            error!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let config = match &args.config {
        Some(path) => match BridgeConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => BridgeConfig::default(),
    };

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║              VRBRIDGE - HEADLESS SESSION SIMULATOR               ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    println!("┌─ CONFIGURATION ──────────────────────────────────────────────────┐");
    println!("│ Duration:           {} s", args.seconds);
    println!("│ Refresh Rate:       {} Hz", config.display_refresh_hz);
    println!("│ Seed:               {:#x}", args.seed);
    println!("│ Config:             {}", args.config.as_deref().unwrap_or("<defaults>"));
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let (tx, rx) = bounded(SINK_CAPACITY);
    let consumer = thread::spawn(move || {
        let mut presses: HashMap<&'static str, u32> = HashMap::new();
        let mut analog = 0u32;
        for event in rx {
            match event {
                SinkEvent::Press(button) => *presses.entry(button.as_str()).or_default() += 1,
                SinkEvent::Analog(..) => analog += 1,
                SinkEvent::Release(_) => {}
            }
        }
        (presses, analog)
    });

    let mut scenario = ScriptedScenario::new(args.seed);
    let mut ctx = match BridgeContext::new(
        &config,
        scenario.runtime(),
        ChannelSink::new(tx),
        HeadlessAllocator::new(),
    ) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let dt = config.frame_dt();
    let frames = u64::from(args.seconds) * u64::from(config.display_refresh_hz);
    let mut accumulator = FrameStatsAccumulator::new(config.display_refresh_hz);
    let start = Instant::now();

    for _ in 0..frames {
        scenario.step(ctx.clock().time());
        let stats = ctx.run_frame(dt, &scenario.signal());
        accumulator.record(stats);
    }

    let render = ctx.pipeline().stats();
    let sink_dropped = ctx.sink().dropped();
    drop(ctx);
    info!("Simulated {} frames in {:.2?}", frames, start.elapsed());

    let Ok((presses, analog)) = consumer.join() else {
        error!("Input consumer thread panicked");
        return ExitCode::FAILURE;
    };

    println!();
    accumulator.print_summary();
    println!();
    println!("┌─ COMPOSITOR ─────────────────────────────────────────────────────┐");
    println!("│ Left eye:           {} submitted, {} dropped", render.submitted(Eye::Left), render.dropped(Eye::Left));
    println!("│ Right eye:          {} submitted, {} dropped", render.submitted(Eye::Right), render.dropped(Eye::Right));
    println!("│ Drop Rate:          {:.2}%", render.drop_rate() * 100.0);
    println!("│ Reallocations:      {}", render.reallocations);
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();
    println!("┌─ INPUT SINK ─────────────────────────────────────────────────────┐");
    let mut buttons: Vec<_> = presses.into_iter().collect();
    buttons.sort_unstable();
    for (button, count) in buttons {
        println!("│ {button:<20}{count} presses");
    }
    println!("│ {:<20}{} updates", "analog", analog);
    println!("│ {:<20}{}", "dropped", sink_dropped);
    println!("└──────────────────────────────────────────────────────────────────┘");

    ExitCode::SUCCESS
}
