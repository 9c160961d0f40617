pub mod generators;
pub mod stream;

mod csv_file;
mod scored;

pub use csv_file::{CsvRecordStream, CsvScoreStream};
pub use scored::ModelScoredStream;
pub use stream::{RecordStream, ScoredStream};
