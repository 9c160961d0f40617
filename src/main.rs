use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use spate::likelihood::{
    AnomalyLikelihood, DEFAULT_AVERAGING_WINDOW, DEFAULT_LEARNING_PERIOD,
    DEFAULT_PROBATIONARY_PERIOD, DEFAULT_REFIT_INTERVAL, EstimatorConfig, EstimatorSnapshot,
    ScoringMode,
};
use spate::streams::CsvScoreStream;
use spate::streams::generators::{PhaseAnomaly, SineGenerator};
use spate::tasks::{CalibrationRunner, DatasetExporter};
use spate::ui::cli::drivers::InquireDriver;
use spate::ui::cli::wizard::run_wizard;
use spate::ui::types::choices::{AnomalyParams, CalibrateParams, GenerateParams, TaskChoice};

#[derive(Parser)]
#[command(name = "spate")]
#[command(about = "Streaming anomaly likelihood over scored time series", long_about = None)]
#[command(version)]
struct Cli {
    /// Without a subcommand an interactive wizard collects the task.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn a scored CSV into anomaly likelihoods
    Calibrate {
        /// Scored CSV with timestamp, value and anomaly_score columns
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// CSV the likelihood columns are written to
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long, default_value_t = DEFAULT_PROBATIONARY_PERIOD)]
        probationary_period: u64,
        #[arg(long, default_value_t = DEFAULT_LEARNING_PERIOD)]
        learning_period: u64,
        #[arg(long, default_value_t = DEFAULT_REFIT_INTERVAL)]
        refit_interval: u64,
        #[arg(long, default_value_t = DEFAULT_AVERAGING_WINDOW as u64)]
        averaging_window: u64,
        /// Bound on retained raw scores (unbounded when omitted)
        #[arg(long)]
        history_capacity: Option<u64>,
        /// probability | legacy
        #[arg(long, default_value = "probability")]
        mode: ScoringMode,
        /// Stop after this many records
        #[arg(long)]
        max_records: Option<u64>,
        /// Take a progress snapshot every N records
        #[arg(long, default_value_t = 1000)]
        sample_frequency: u64,
        /// Resume from a saved estimator snapshot (its embedded config wins)
        #[arg(long, value_name = "FILE")]
        snapshot_in: Option<PathBuf>,
        /// Save the estimator state here after the run
        #[arg(long, value_name = "FILE")]
        snapshot_out: Option<PathBuf>,
    },
    /// Write a synthetic noisy-sine dataset to CSV
    Generate {
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        #[arg(long, default_value_t = 4000)]
        records: u64,
        /// Uniform noise in [-a, a] added to each value
        #[arg(long, default_value_t = 0.0)]
        noise_amplitude: f64,
        /// Skip the late phase-window anomaly
        #[arg(long)]
        no_anomaly: bool,
        #[arg(long, default_value_t = 2450)]
        anomaly_start: u64,
        #[arg(long, default_value_t = 1.5)]
        anomaly_magnitude: f64,
        #[arg(long, default_value_t = 1956)]
        seed: u64,
    },
}

impl Commands {
    fn into_choice(self) -> TaskChoice {
        match self {
            Commands::Calibrate {
                input,
                output,
                probationary_period,
                learning_period,
                refit_interval,
                averaging_window,
                history_capacity,
                mode,
                max_records,
                sample_frequency,
                snapshot_in,
                snapshot_out,
            } => TaskChoice::Calibrate(CalibrateParams {
                input,
                output,
                probationary_period,
                learning_period,
                refit_interval,
                averaging_window,
                history_capacity,
                mode,
                max_records,
                sample_frequency,
                snapshot_in,
                snapshot_out,
            }),
            Commands::Generate {
                output,
                records,
                noise_amplitude,
                no_anomaly,
                anomaly_start,
                anomaly_magnitude,
                seed,
            } => TaskChoice::Generate(GenerateParams {
                output,
                records,
                noise_amplitude,
                anomaly: (!no_anomaly).then_some(AnomalyParams {
                    start_index: anomaly_start,
                    magnitude: anomaly_magnitude,
                }),
                seed,
            }),
        }
    }
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let choice = match cli.command {
        Some(command) => command.into_choice(),
        None => run_wizard(&InquireDriver)?,
    };
    debug!(task = %serde_json::to_string(&choice)?, "task resolved");

    match choice {
        TaskChoice::Calibrate(params) => calibrate(&params),
        TaskChoice::Generate(params) => generate(&params),
    }
}

fn calibrate(params: &CalibrateParams) -> Result<()> {
    let estimator = match &params.snapshot_in {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening snapshot {}", path.display()))?;
            let snapshot: EstimatorSnapshot<NaiveDateTime> =
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing snapshot {}", path.display()))?;
            info!(path = %path.display(), "resuming from snapshot");
            AnomalyLikelihood::restore(snapshot)?
        }
        None => AnomalyLikelihood::new(EstimatorConfig {
            probationary_period: params.probationary_period,
            learning_period: params.learning_period,
            refit_interval: params.refit_interval,
            averaging_window: params.averaging_window as usize,
            history_capacity: params.history_capacity.map(|n| n as usize),
            mode: params.mode,
        })?,
    };

    let stream = CsvScoreStream::open(&params.input)
        .with_context(|| format!("opening input {}", params.input.display()))?;
    let mut runner = CalibrationRunner::new(
        estimator,
        Box::new(stream),
        params.max_records,
        params.sample_frequency,
    )?;

    let out_file = File::create(&params.output)
        .with_context(|| format!("creating output {}", params.output.display()))?;
    let mut out = BufWriter::new(out_file);
    let summary = runner.run(&mut out)?;
    out.flush()?;

    for sample in runner.snapshots() {
        debug!(%sample, "calibration sample");
    }
    info!(
        records = summary.records,
        refits = summary.refits,
        max_log_likelihood = summary.max_log_likelihood,
        seconds = summary.seconds,
        output = %params.output.display(),
        "calibration finished"
    );

    if let Some(path) = &params.snapshot_out {
        let snapshot = runner.into_estimator().snapshot();
        let file = File::create(path)
            .with_context(|| format!("creating snapshot {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &snapshot)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot saved");
    }

    Ok(())
}

fn generate(params: &GenerateParams) -> Result<()> {
    let anomaly = params.anomaly.map(|a| PhaseAnomaly {
        start_index: a.start_index as usize,
        magnitude: a.magnitude,
    });
    let mut stream = SineGenerator::new(
        params.noise_amplitude,
        anomaly,
        Some(params.records as usize),
        params.seed,
    )?;

    let written = DatasetExporter::new(None).export(&mut stream, &params.output)?;
    info!(rows = written, output = %params.output.display(), "generation finished");
    Ok(())
}
