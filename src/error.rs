use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures surfaced by the prediction core. Dataset problems are fatal at
/// load time; lookup and parse failures are recoverable and name the
/// offending value so callers can report it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("dataset is missing required column {column:?}")]
    MissingColumn { column: &'static str },

    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cannot parse time {raw:?}: expected HH:MM")]
    BadTime { raw: String },

    #[error("unknown {field} {value:?}")]
    UnknownValue { field: &'static str, value: String },

    #[error("{partition} partition is empty after the split")]
    InsufficientData { partition: &'static str },

    #[error("model has not been trained yet")]
    ModelNotTrained,
}
