use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use strum::{EnumMessage, IntoEnumIterator};

use crate::likelihood::{
    DEFAULT_AVERAGING_WINDOW, DEFAULT_LEARNING_PERIOD, DEFAULT_PROBATIONARY_PERIOD,
    DEFAULT_REFIT_INTERVAL, ScoringMode,
};
use crate::streams::generators::PhaseAnomaly;
use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::choices::{
    AnomalyParams, CalibrateParams, GenerateParams, TaskChoice, TaskKind,
};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

const DEFAULT_SAMPLE_FREQUENCY: u64 = 1000;
const DEFAULT_GENERATED_RECORDS: u64 = 4000;
const DEFAULT_GENERATOR_SEED: u64 = 1956;

struct KindItem<K> {
    kind: K,
    text: String,
}

fn kind_items<K>() -> Vec<KindItem<K>>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let desc = k.get_detailed_message().unwrap_or("");
            let text = if desc.is_empty() {
                label.to_string()
            } else {
                format!("{label}  {DIM_ITALIC}{desc}{RESET}")
            };
            KindItem { kind: k, text }
        })
        .collect()
}

fn select_kind<K: Copy, D: PromptDriver>(
    driver: &D,
    title: &str,
    items: Vec<KindItem<K>>,
) -> Result<K> {
    let texts = items.iter().map(|item| item.text.clone()).collect();
    let index = driver.prompt_select(title, texts)?;
    items
        .get(index)
        .map(|item| item.kind)
        .context("selection out of range")
}

fn mode_items() -> Vec<KindItem<ScoringMode>> {
    ScoringMode::iter()
        .map(|mode| {
            let desc = match mode {
                ScoringMode::Probability => "High values flag anomalies (recommended).",
                ScoringMode::Legacy => "Filtered tail of the averaged score; low values flag.",
            };
            KindItem {
                kind: mode,
                text: format!("{mode}  {DIM_ITALIC}{desc}{RESET}"),
            }
        })
        .collect()
}

/// Collects a complete [`TaskChoice`] interactively.
pub fn run_wizard<D: PromptDriver>(driver: &D) -> Result<TaskChoice> {
    let kind = select_kind(driver, "Choose a task:", kind_items::<TaskKind>())?;
    match kind {
        TaskKind::Calibrate => prompt_calibrate(driver).map(TaskChoice::Calibrate),
        TaskKind::Generate => prompt_generate(driver).map(TaskChoice::Generate),
    }
}

fn prompt_calibrate<D: PromptDriver>(driver: &D) -> Result<CalibrateParams> {
    let input = prompt_path_until_ok(
        driver,
        "Input CSV:",
        "Scored data with timestamp, value and anomaly_score columns",
        "",
        true,
        true,
        &["csv"],
    )?;
    let output = prompt_path_until_ok(
        driver,
        "Output CSV:",
        "Where the likelihood columns get written",
        "",
        false,
        false,
        &[],
    )?;

    let probationary_period = driver.prompt_u64(
        "Probationary period:",
        "Records scored neutrally (0.5) while the estimator warms up",
        DEFAULT_PROBATIONARY_PERIOD,
        None,
        None,
    )?;
    let learning_period = driver.prompt_u64(
        "Learning period:",
        "Leading records excluded from every distribution fit",
        DEFAULT_LEARNING_PERIOD.min(probationary_period),
        None,
        Some(probationary_period),
    )?;
    let refit_interval = driver.prompt_u64(
        "Refit interval:",
        "Refit the score distribution every N records",
        DEFAULT_REFIT_INTERVAL,
        Some(1),
        None,
    )?;
    let averaging_window = driver.prompt_u64(
        "Averaging window:",
        "Moving-average width for the legacy scoring mode",
        DEFAULT_AVERAGING_WINDOW as u64,
        Some(1),
        None,
    )?;
    let history_capacity = prompt_optional_u64(
        driver,
        "History capacity:",
        "Bound on retained raw scores",
    )?;
    let mode = select_kind(driver, "Scoring mode:", mode_items())?;

    let max_records = prompt_optional_u64(driver, "Max records:", "Stop after this many records")?;
    let sample_frequency = driver.prompt_u64(
        "Sample frequency:",
        "Take a progress snapshot every N records",
        DEFAULT_SAMPLE_FREQUENCY,
        Some(1),
        None,
    )?;

    let snapshot_in = prompt_optional_path(
        driver,
        "Snapshot to resume from:",
        "JSON estimator snapshot from a previous run",
    )?;
    let snapshot_out = prompt_optional_path(
        driver,
        "Snapshot to save:",
        "Write the final estimator state here",
    )?;

    Ok(CalibrateParams {
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
    })
}

fn prompt_generate<D: PromptDriver>(driver: &D) -> Result<GenerateParams> {
    let output = prompt_path_until_ok(
        driver,
        "Output CSV:",
        "Where the generated records get written",
        "",
        false,
        false,
        &[],
    )?;
    let records = driver.prompt_u64(
        "Records:",
        "Number of rows to generate",
        DEFAULT_GENERATED_RECORDS,
        Some(1),
        None,
    )?;
    let noise_amplitude = driver.prompt_f64(
        "Noise amplitude:",
        "Uniform noise in [-a, a] added to each value",
        0.0,
        Some(0.0),
        None,
    )?;

    let defaults = PhaseAnomaly::default();
    let with_anomaly = driver.prompt_bool(
        "Inject an anomaly?",
        "Adds a phase-window offset late in the series",
        true,
    )?;
    let anomaly = if with_anomaly {
        let start_index = driver.prompt_u64(
            "Anomaly start index:",
            "First record at which the offset may fire",
            defaults.start_index as u64,
            None,
            None,
        )?;
        let magnitude = driver.prompt_f64(
            "Anomaly magnitude:",
            "Offset added inside the phase window",
            defaults.magnitude,
            None,
            None,
        )?;
        Some(AnomalyParams {
            start_index,
            magnitude,
        })
    } else {
        None
    };

    let seed = driver.prompt_u64("Seed:", "Noise RNG seed", DEFAULT_GENERATOR_SEED, None, None)?;

    Ok(GenerateParams {
        output,
        records,
        noise_amplitude,
        anomaly,
        seed,
    })
}

fn prompt_optional_u64<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
) -> Result<Option<u64>> {
    let answer = driver.prompt_text(title, &format!("{help}\n(leave blank for none)"), "")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }
    let n: u64 = answer
        .parse()
        .with_context(|| format!("invalid integer for {title}"))?;
    Ok(Some(n))
}

fn prompt_optional_path<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
) -> Result<Option<PathBuf>> {
    let answer = driver.prompt_text(title, &format!("{help}\n(leave blank for none)"), "")?;
    let answer = answer.trim();
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(answer)))
    }
}

fn validate_path_str(
    input: &str,
    must_exist: bool,
    must_be_file: bool,
    allowed_exts: &[&str],
) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if must_exist && !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if must_be_file && p.exists() && !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    if !allowed_exts.is_empty() {
        match p.extension().and_then(|e| e.to_str()) {
            Some(ext) if allowed_exts.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {}
            _ => return Err(format!("Expected a .{} file", allowed_exts.join(" / ."))),
        }
    }
    Ok(())
}

fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
    must_exist: bool,
    must_be_file: bool,
    allowed_exts: &[&str],
) -> Result<PathBuf> {
    loop {
        let answer = driver.prompt_text(title, help, default)?;
        match validate_path_str(&answer, must_exist, must_be_file, allowed_exts) {
            Ok(()) => return Ok(PathBuf::from(answer)),
            Err(msg) => {
                eprintln!("✗ {}", msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stubs::{Answer, ScriptedPrompts};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn wizard_assembles_a_calibrate_choice() {
        let mut input = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(input, "timestamp,value,anomaly_score").unwrap();
        let input_path = input.path().to_string_lossy().into_owned();

        let driver = ScriptedPrompts::new(vec![
            Answer::Select(0),
            Answer::Text(input_path.clone()),
            Answer::Text("out.csv".into()),
            Answer::U64(400),
            Answer::U64(200),
            Answer::U64(50),
            Answer::U64(10),
            Answer::Text(String::new()),
            Answer::Select(1),
            Answer::Text("9000".into()),
            Answer::U64(500),
            Answer::Text(String::new()),
            Answer::Text(String::new()),
        ]);

        let choice = run_wizard(&driver).unwrap();
        let TaskChoice::Calibrate(params) = choice else {
            panic!("expected a calibrate choice");
        };
        assert_eq!(params.input, PathBuf::from(input_path));
        assert_eq!(params.output, PathBuf::from("out.csv"));
        assert_eq!(params.probationary_period, 400);
        assert_eq!(params.learning_period, 200);
        assert_eq!(params.refit_interval, 50);
        assert_eq!(params.averaging_window, 10);
        assert_eq!(params.history_capacity, None);
        assert_eq!(params.mode, ScoringMode::Legacy);
        assert_eq!(params.max_records, Some(9000));
        assert_eq!(params.sample_frequency, 500);
        assert!(params.snapshot_in.is_none());
        assert!(params.snapshot_out.is_none());
    }

    #[test]
    fn wizard_assembles_a_generate_choice_without_anomaly() {
        let driver = ScriptedPrompts::new(vec![
            Answer::Select(1),
            Answer::Text("sine.csv".into()),
            Answer::U64(100),
            Answer::F64(0.1),
            Answer::Bool(false),
            Answer::U64(7),
        ]);

        let choice = run_wizard(&driver).unwrap();
        let TaskChoice::Generate(params) = choice else {
            panic!("expected a generate choice");
        };
        assert_eq!(params.output, PathBuf::from("sine.csv"));
        assert_eq!(params.records, 100);
        assert_eq!(params.noise_amplitude, 0.1);
        assert!(params.anomaly.is_none());
        assert_eq!(params.seed, 7);
    }

    #[test]
    fn generate_prompts_for_anomaly_shape_when_enabled() {
        let driver = ScriptedPrompts::new(vec![
            Answer::Select(1),
            Answer::Text("sine.csv".into()),
            Answer::U64(3000),
            Answer::F64(0.0),
            Answer::Bool(true),
            Answer::U64(2450),
            Answer::F64(1.5),
            Answer::U64(1956),
        ]);

        let choice = run_wizard(&driver).unwrap();
        let TaskChoice::Generate(params) = choice else {
            panic!("expected a generate choice");
        };
        let anomaly = params.anomaly.unwrap();
        assert_eq!(anomaly.start_index, 2450);
        assert_eq!(anomaly.magnitude, 1.5);
    }

    #[test]
    fn blank_optional_answers_mean_none() {
        let driver = ScriptedPrompts::new(vec![Answer::Text("   ".into())]);
        let parsed = prompt_optional_u64(&driver, "Max records:", "help").unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn garbage_optional_integer_is_an_error() {
        let driver = ScriptedPrompts::new(vec![Answer::Text("ten".into())]);
        let err = prompt_optional_u64(&driver, "Max records:", "help").unwrap_err();
        assert!(err.to_string().contains("invalid integer"));
    }

    #[test]
    fn path_validation_rejects_wrong_extension_and_missing_files() {
        assert!(validate_path_str("data.txt", false, false, &["csv"]).is_err());
        assert!(validate_path_str("data.CSV", false, false, &["csv"]).is_ok());
        assert!(validate_path_str("   ", false, false, &[]).is_err());
        assert!(validate_path_str("/definitely/not/here.csv", true, true, &["csv"]).is_err());
    }
}
