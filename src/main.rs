//! Schelling segregation runner
//!
//! Loads a run file, drives the relocation loop and feeds every sampled
//! snapshot to the frame writer and the optional text log, then assembles
//! the frames into a GIF and writes a JSON run summary.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use thiserror::Error;

use schelling::core::config::{ConfigError, RunConfig};
use schelling::core::error::SimError;
use schelling::renderer::{self, assemble_gif, FrameWriter, RenderError, SnapshotSink, TextLog};
use schelling::simulation::SimulationLoop;

/// Schelling segregation model on a bounded square grid
#[derive(Parser, Debug)]
#[command(name = "schelling")]
#[command(about = "Run a Schelling segregation simulation and render it")]
struct Args {
    /// Run file (TOML, or JSON when the extension is .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Override the tick budget
    #[arg(long)]
    iterations: Option<u64>,

    /// Override the grid side length
    #[arg(long)]
    size: Option<usize>,

    /// Skip PNG frames (and therefore the GIF)
    #[arg(long, default_value_t = false)]
    no_images: bool,

    /// Skip GIF assembly
    #[arg(long, default_value_t = false)]
    no_gif: bool,

    /// Append the per-snapshot cell dump to the text log
    #[arg(long, default_value_t = false)]
    text_logs: bool,
}

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn load_config(args: &Args) -> Result<RunConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    let sim = &mut config.simulation;
    if args.seed.is_some() {
        sim.seed = args.seed;
    }
    if let Some(iterations) = args.iterations {
        sim.iterations = iterations;
    }
    if let Some(size) = args.size {
        sim.size = size;
    }
    sim.validate()?;

    let output = &mut config.output;
    if args.no_images {
        output.generate_images = false;
        output.generate_gif = false;
    }
    if args.no_gif {
        output.generate_gif = false;
    }
    if args.text_logs {
        output.write_text_logs = true;
    }
    Ok(config)
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("schelling=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let output = &config.output;

    let sim = SimulationLoop::new(&config.simulation)?;
    let budget = sim.budget();
    tracing::info!(
        "Grid {}x{}, happiness_cup {} ({:?}), seed {:?}, budget {} ticks",
        config.simulation.size,
        config.simulation.size,
        config.simulation.happiness_cup,
        config.simulation.threshold,
        sim.seed(),
        budget
    );

    if output.generate_images || output.write_text_logs {
        renderer::prepare_dir(&output.frames_dir)?;
    }
    let mut frames = output.generate_images.then(|| {
        FrameWriter::new(
            output.frames_dir.clone(),
            output.plot_size,
            output.colors.clone(),
            budget,
        )
    });
    let mut text_log = if output.write_text_logs {
        Some(TextLog::open(output.cells_log_path())?)
    } else {
        None
    };

    tracing::info!("Start generating snapshots");
    let start = Instant::now();
    let mut snapshots = sim.snapshots();
    for snapshot in snapshots.by_ref() {
        let snapshot = snapshot?;
        if budget > 0 {
            tracing::info!(
                "{:.2}% is done",
                snapshot.tick as f64 / budget as f64 * 100.0
            );
        }
        if let Some(writer) = frames.as_mut() {
            writer.consume(&snapshot)?;
        }
        if let Some(log) = text_log.as_mut() {
            log.consume(&snapshot)?;
        }
    }
    if let Some(log) = text_log.as_mut() {
        log.flush()?;
    }
    let elapsed = start.elapsed();
    tracing::info!("Snapshots generated. It took {:.9}s", elapsed.as_secs_f64());

    let emitted = snapshots.emitted();
    let summary = snapshots.simulation().summary(emitted, elapsed);
    println!("{}", summary.summary());

    if output.generate_gif && output.generate_images {
        tracing::info!("Start converting images to gif");
        let gif_start = Instant::now();
        assemble_gif(&output.frames_dir, &output.gif_path, output.frame_delay_ms)?;
        tracing::info!(
            "Gif created. It took {:.9}s",
            gif_start.elapsed().as_secs_f64()
        );
    }

    let summary_path = output.gif_path.with_extension("json");
    std::fs::write(&summary_path, summary.to_json())?;
    tracing::info!("Run summary written to {}", summary_path.display());

    Ok(())
}
