use std::fmt::Display;
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

use tracing::info;

use crate::streams::RecordStream;

/// Writes the records of any stream to a `timestamp,value` CSV file: the
/// synthetic-dataset side of the pipeline.
pub struct DatasetExporter {
    max_records: Option<u64>,
}

impl DatasetExporter {
    pub fn new(max_records: Option<u64>) -> Self {
        Self { max_records }
    }

    /// Drains the stream into `path`, returning the number of rows written.
    pub fn export<T: Display>(
        &self,
        stream: &mut dyn RecordStream<T>,
        path: impl AsRef<Path>,
    ) -> Result<u64, Error> {
        let path = path.as_ref();
        let mut out = File::create(path)?;
        writeln!(out, "timestamp,value")?;

        let mut written = 0u64;
        while stream.has_more_records() {
            if let Some(max) = self.max_records {
                if written >= max {
                    break;
                }
            }
            let Some(record) = stream.next_record() else {
                break;
            };
            writeln!(out, "{},{}", record.timestamp, record.value)?;
            written += 1;
        }

        info!(rows = written, path = %path.display(), "dataset exported");
        Ok(written)
    }
}
