use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Lines};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::warn;

use crate::core::{Observation, Record};
use crate::streams::stream::{RecordStream, ScoredStream};
use crate::utils::file_parsing::{parse_timestamp, split_row};

/// Historical header spellings accepted for the default columns.
const TIMESTAMP_COLUMNS: [&str; 2] = ["timestamp", "dttm"];
const VALUE_COLUMNS: [&str; 1] = ["value"];
const SCORE_COLUMNS: [&str; 1] = ["anomaly_score"];

const DELIMITER: char = ',';

/// Shared row plumbing of the two CSV streams: owns the open file, skips
/// blank lines, splits rows, and remembers the path so `restart` can reopen.
struct RowCursor {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: u64,
    exhausted: bool,
}

impl RowCursor {
    fn open(path: &Path) -> Result<(Vec<String>, Self), Error> {
        let (header, lines) = read_header(path)?;
        Ok((
            header,
            Self {
                path: path.to_path_buf(),
                lines,
                line_number: 1,
                exhausted: false,
            },
        ))
    }

    fn reopen(&mut self) -> Result<(), Error> {
        let (_, lines) = read_header(&self.path)?;
        self.lines = lines;
        self.line_number = 1;
        self.exhausted = false;
        Ok(())
    }

    /// Next non-blank row, split into unquoted fields. A read error ends the
    /// stream rather than panicking mid-pipeline.
    fn next_fields(&mut self) -> Option<Vec<String>> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(error)) => {
                    warn!(path = %self.path.display(), %error, "read failed; ending stream");
                    self.exhausted = true;
                    return None;
                }
                None => {
                    self.exhausted = true;
                    return None;
                }
            };
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(split_row(&line, DELIMITER));
        }
    }
}

fn read_header(path: &Path) -> Result<(Vec<String>, Lines<BufReader<File>>), Error> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("{}: empty file, expected a header row", path.display()),
            ));
        }
    };
    Ok((split_row(&header, DELIMITER), lines))
}

fn require_column(header: &[String], names: &[&str], path: &Path) -> Result<usize, Error> {
    header
        .iter()
        .position(|field| names.iter().any(|name| field.eq_ignore_ascii_case(name)))
        .ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidData,
                format!(
                    "{}: no column named {:?} in header {:?}",
                    path.display(),
                    names,
                    header
                ),
            )
        })
}

fn parse_field_f64(fields: &[String], index: usize) -> Option<f64> {
    fields.get(index)?.trim().parse::<f64>().ok()
}

fn parse_field_timestamp(fields: &[String], index: usize) -> Option<NaiveDateTime> {
    parse_timestamp(fields.get(index)?)
}

/// File-backed [`RecordStream`] over `timestamp,value` CSV data.
///
/// Columns are located by header name (any of the historical spellings,
/// case-insensitive); all other columns are ignored. Malformed rows are
/// skipped with a warning.
pub struct CsvRecordStream {
    cursor: RowCursor,
    timestamp_index: usize,
    value_index: usize,
}

impl CsvRecordStream {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let (header, cursor) = RowCursor::open(path)?;
        Ok(Self {
            timestamp_index: require_column(&header, &TIMESTAMP_COLUMNS, path)?,
            value_index: require_column(&header, &VALUE_COLUMNS, path)?,
            cursor,
        })
    }

    /// Opens with explicit column names instead of the defaults.
    pub fn open_with_columns(
        path: impl AsRef<Path>,
        timestamp_column: &str,
        value_column: &str,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let (header, cursor) = RowCursor::open(path)?;
        Ok(Self {
            timestamp_index: require_column(&header, &[timestamp_column], path)?,
            value_index: require_column(&header, &[value_column], path)?,
            cursor,
        })
    }
}

impl RecordStream<NaiveDateTime> for CsvRecordStream {
    fn has_more_records(&self) -> bool {
        !self.cursor.exhausted
    }

    fn next_record(&mut self) -> Option<Record<NaiveDateTime>> {
        loop {
            let fields = self.cursor.next_fields()?;
            let timestamp = parse_field_timestamp(&fields, self.timestamp_index);
            let value = parse_field_f64(&fields, self.value_index);
            match (timestamp, value) {
                (Some(timestamp), Some(value)) => return Some(Record::new(timestamp, value)),
                _ => {
                    warn!(
                        path = %self.cursor.path.display(),
                        line = self.cursor.line_number,
                        "skipping malformed row"
                    );
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.cursor.reopen()
    }
}

/// File-backed [`ScoredStream`] over `timestamp,value,anomaly_score` CSV
/// data, the calibration input written by an upstream scoring run.
pub struct CsvScoreStream {
    cursor: RowCursor,
    timestamp_index: usize,
    value_index: usize,
    score_index: usize,
}

impl CsvScoreStream {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let (header, cursor) = RowCursor::open(path)?;
        Ok(Self {
            timestamp_index: require_column(&header, &TIMESTAMP_COLUMNS, path)?,
            value_index: require_column(&header, &VALUE_COLUMNS, path)?,
            score_index: require_column(&header, &SCORE_COLUMNS, path)?,
            cursor,
        })
    }

    pub fn open_with_columns(
        path: impl AsRef<Path>,
        timestamp_column: &str,
        value_column: &str,
        score_column: &str,
    ) -> Result<Self, Error> {
        let path = path.as_ref();
        let (header, cursor) = RowCursor::open(path)?;
        Ok(Self {
            timestamp_index: require_column(&header, &[timestamp_column], path)?,
            value_index: require_column(&header, &[value_column], path)?,
            score_index: require_column(&header, &[score_column], path)?,
            cursor,
        })
    }
}

impl ScoredStream<NaiveDateTime> for CsvScoreStream {
    fn has_more_records(&self) -> bool {
        !self.cursor.exhausted
    }

    fn next_observation(&mut self) -> Option<Observation<NaiveDateTime>> {
        loop {
            let fields = self.cursor.next_fields()?;
            let timestamp = parse_field_timestamp(&fields, self.timestamp_index);
            let value = parse_field_f64(&fields, self.value_index);
            let score = parse_field_f64(&fields, self.score_index);
            match (timestamp, value, score) {
                (Some(timestamp), Some(value), Some(score)) => {
                    return Some(Observation::new(timestamp, value, score));
                }
                _ => {
                    warn!(
                        path = %self.cursor.path.display(),
                        line = self.cursor.line_number,
                        "skipping malformed row"
                    );
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.cursor.reopen()
    }
}
