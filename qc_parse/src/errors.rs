use qc_types::QuartetSample;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unable to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed tab-delimited table {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed JSON in {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected a JSON object of key/value pairs in {path:?}")]
    NotAnObject { path: PathBuf },

    #[error(
        "The input file {path:?} must contain a column named '{column}', but it was not found. \
         Please check the headers in the {filetype} file."
    )]
    MissingColumn {
        filetype: &'static str,
        column: String,
        path: PathBuf,
    },

    #[error("No row of {path:?} refers to Quartet sample {sample} (or its alias {alias})")]
    MissingMetric {
        sample: QuartetSample,
        alias: &'static str,
        path: PathBuf,
    },

    #[error(
        "Error in {filetype} file {path:?}. On line {line} in '{column}' column: \
         {value} is not a ratio between 0 and 1"
    )]
    MetricOutOfRange {
        filetype: &'static str,
        path: PathBuf,
        line: usize,
        column: String,
        value: f64,
    },
}
