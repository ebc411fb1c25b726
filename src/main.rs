/*
 * Flocking Simulation - Entry Point
 *
 * `run` opens the nannou window (needs the `gui` feature), `headless`
 * drives the same frame loop against a recording painter and reports what
 * happened, and `print-config` dumps the effective configuration as JSON.
 */

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use flocking::{DebugInfo, Demo, DemoConfig, DemoKind, FrameInput, FrameLoop, Recorder, Simulation, Vector2};

#[derive(Parser)]
#[command(name = "flocking", about = "Boid flocking and joint-chain demos")]
struct Cli {
    /// JSON config file; missing fields take their defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// PRNG seed for a reproducible run.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Which demo to show, overriding the config file.
    #[arg(long, global = true, value_enum)]
    demo: Option<DemoArg>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive window (default).
    Run,
    /// Run without a window for a fixed number of ticks.
    Headless {
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,

        /// Print the final report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as JSON.
    PrintConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum DemoArg {
    Flock,
    Chain,
    Fish,
}

impl From<DemoArg> for DemoKind {
    fn from(arg: DemoArg) -> Self {
        match arg {
            DemoArg::Flock => DemoKind::Flock,
            DemoArg::Chain => DemoKind::Chain,
            DemoArg::Fish => DemoKind::Fish,
        }
    }
}

#[derive(Serialize)]
struct HeadlessReport {
    demo: &'static str,
    draw_calls: usize,
    #[serde(flatten)]
    debug: DebugInfo,
    chain_head: Option<[f32; 2]>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_window(config),
        Command::Headless { ticks, json } => run_headless(config, ticks, json),
        Command::PrintConfig => {
            println!("{}", config.to_json_pretty()?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(demo) = cli.demo {
        config.demo = demo.into();
    }
    Ok(config)
}

#[cfg(feature = "gui")]
fn run_window(config: DemoConfig) -> Result<()> {
    flocking::app::run(config);
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn run_window(_config: DemoConfig) -> Result<()> {
    anyhow::bail!("built without the `gui` feature; rebuild with `--features gui` or use `headless`")
}

// Pointer path for the chain demos: a slow circle around the viewport centre
fn scripted_pointer(demo: &Demo, tick: u64) -> Option<Vector2> {
    match demo {
        Demo::Flock(_) => None,
        Demo::Chain(sim) => {
            let radius = sim.bounds.width.min(sim.bounds.height) / 3.0;
            let angle = tick as f32 * 0.02;
            Some(sim.bounds.center() + Vector2::new(angle.cos(), angle.sin()) * radius)
        }
    }
}

fn run_headless(config: DemoConfig, ticks: u64, json: bool) -> Result<()> {
    let mut rng = config.rng();
    let mut frame_loop = FrameLoop::new(Demo::from_config(&config, &mut rng));
    let mut painter = Recorder::new();
    let mut debug_info = DebugInfo::default();
    info!(demo = frame_loop.simulation().name(), ticks, "Headless run");

    for tick in 0..ticks {
        let input = FrameInput {
            pointer: scripted_pointer(frame_loop.simulation(), tick),
            pointer_down: false,
        };
        painter.commands.clear();
        let started = Instant::now();
        frame_loop.frame(&input, &mut painter);
        debug_info.record_frame(started.elapsed());
    }
    debug_info.ticks = frame_loop.ticks();

    let demo = frame_loop.simulation();
    let mut chain_head = None;
    match demo {
        Demo::Flock(sim) => debug_info.flock = Some(sim.flock.stats()),
        Demo::Chain(sim) => chain_head = sim.chain.head().map(|j| j.position.to_array()),
    }
    let report = HeadlessReport {
        demo: demo.name(),
        draw_calls: painter.frame().len(),
        debug: debug_info,
        chain_head,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("demo:        {}", report.demo);
        println!("ticks:       {}", report.debug.ticks);
        println!("draw calls:  {}", report.draw_calls);
        println!("ticks/sec:   {:.0}", report.debug.ticks_per_second());
        if let Some(stats) = &report.debug.flock {
            println!(
                "speed:       mean {:.3}, min {:.3}, max {:.3}",
                stats.mean_speed, stats.min_speed, stats.max_speed
            );
            println!("centroid:    ({:.1}, {:.1})", stats.centroid_x, stats.centroid_y);
        }
        if let Some([x, y]) = report.chain_head {
            println!("chain head:  ({x:.1}, {y:.1})");
        }
    }
    Ok(())
}
