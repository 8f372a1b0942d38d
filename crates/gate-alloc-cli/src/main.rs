// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use gate_alloc_model::prelude::{InstanceGenerator, NormalizedData, SnapshotLoader};
use gate_alloc_solver::prelude::{DisruptionEvent, EngineConfig, GateAllocationEngine};
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Turnaround buffer used when no config file is given.
const DEFAULT_CLI_BUFFER_MINUTES: u32 = 30;

#[derive(Parser, Debug)]
#[command(
    name = "gate-alloc",
    version,
    about = "Airport gate assignment and disruption reassignment"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a snapshot, solve it and print the committed assignment.
    Solve {
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Load a snapshot, apply a batch of disruption events and print the report.
    Reassign {
        #[command(flatten)]
        engine: EngineArgs,
        /// JSON array of `close_gate` / `delay_flight` events.
        #[arg(long)]
        events: PathBuf,
    },
    /// Write a seeded synthetic snapshot.
    Generate {
        #[arg(long, default_value_t = 40)]
        flights: usize,
        #[arg(long, default_value_t = 8)]
        gates: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0.0)]
        closed_ratio: f64,
        #[arg(long, default_value_t = 0.0)]
        cancelled_ratio: f64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct EngineArgs {
    /// Operational snapshot (gates, flights, distances) as JSON.
    #[arg(long)]
    data: PathBuf,
    /// Engine configuration as JSON; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the turnaround buffer of the configuration.
    #[arg(long)]
    buffer: Option<u32>,
    /// Start from the loaded gates instead of an initial solve.
    #[arg(long)]
    unsolved: bool,
    /// Minutes a departure-only flight occupies its gate before departure.
    #[arg(long, default_value_t = 30)]
    occupancy_before: i64,
    /// Minutes a departure-only flight occupies its gate after departure.
    #[arg(long, default_value_t = 30)]
    occupancy_after: i64,
    #[arg(long)]
    out: Option<PathBuf>,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct RunRecord<T> {
    command: &'static str,
    input: String,
    start_ts: DateTime<Utc>,
    end_ts: DateTime<Utc>,
    runtime_ms: u128,
    result: T,
}

fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match out {
        Some(path) => {
            let mut w = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut w, value)?;
            w.flush()?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, value)?;
            writeln!(lock)?;
        }
    }
    Ok(())
}

fn load_config(args: &EngineArgs) -> Result<EngineConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => EngineConfig::default().with_buffer_minutes(DEFAULT_CLI_BUFFER_MINUTES),
    };
    if let Some(minutes) = args.buffer {
        config = config.with_buffer_minutes(minutes);
    }
    Ok(config)
}

fn start_engine(args: &EngineArgs) -> Result<GateAllocationEngine, Box<dyn Error>> {
    let config = load_config(args)?;
    let data: NormalizedData = SnapshotLoader::new()
        .with_occupancy(args.occupancy_before, args.occupancy_after)
        .from_path(&args.data)?;
    tracing::info!(
        data = %args.data.display(),
        flights = data.flights().len(),
        gates = data.gates().len(),
        buffer = config.turnaround_buffer_minutes,
        "loaded snapshot"
    );
    if args.unsolved {
        Ok(GateAllocationEngine::unsolved(data, config))
    } else {
        Ok(GateAllocationEngine::bootstrap(data, config)?)
    }
}

fn run_solve(args: EngineArgs) -> Result<(), Box<dyn Error>> {
    let start_ts = Utc::now();
    let t0 = Instant::now();
    let engine = start_engine(&args)?;
    let view = engine.current_assignment();
    tracing::info!(
        generation = view.generation.value(),
        overlaps = view.conflicts.overlaps().len(),
        unresolved = view.conflicts.unresolved().len(),
        "current assignment ready"
    );
    let record = RunRecord {
        command: "solve",
        input: args.data.display().to_string(),
        start_ts,
        end_ts: Utc::now(),
        runtime_ms: t0.elapsed().as_millis(),
        result: view,
    };
    write_json(&record, args.out.as_deref())
}

fn run_reassign(args: EngineArgs, events: PathBuf) -> Result<(), Box<dyn Error>> {
    let start_ts = Utc::now();
    let t0 = Instant::now();
    let batch: Vec<DisruptionEvent> =
        serde_json::from_reader(BufReader::new(File::open(&events)?))?;
    let engine = start_engine(&args)?;
    let report = engine.reassign(&batch)?;
    tracing::info!(
        generation = report.generation.value(),
        changed = report.changed_flights.len(),
        rejected = report.rejected_events.len(),
        degraded = report.degraded,
        "reassignment finished"
    );
    let record = RunRecord {
        command: "reassign",
        input: events.display().to_string(),
        start_ts,
        end_ts: Utc::now(),
        runtime_ms: t0.elapsed().as_millis(),
        result: report,
    };
    write_json(&record, args.out.as_deref())
}

fn run_generate(
    flights: usize,
    gates: usize,
    seed: u64,
    closed_ratio: f64,
    cancelled_ratio: f64,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let doc = InstanceGenerator::new(flights, gates, seed)
        .with_closed_ratio(closed_ratio)
        .with_cancelled_ratio(cancelled_ratio)
        .generate()?;
    write_json(&doc, out.as_deref())
}

fn main() -> ExitCode {
    enable_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Solve { engine } => run_solve(engine),
        Command::Reassign { engine, events } => run_reassign(engine, events),
        Command::Generate {
            flights,
            gates,
            seed,
            closed_ratio,
            cancelled_ratio,
            out,
        } => run_generate(flights, gates, seed, closed_ratio, cancelled_ratio, out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "gate-alloc failed");
            ExitCode::FAILURE
        }
    }
}
