use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("No analysis dataset found in {0}")]
    NotFound(PathBuf),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}, column '{column}': cannot coerce '{value}' to a number")]
    Coerce {
        row: u64,
        column: String,
        value: String,
    },

    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset CSV: {0}")]
    Csv(#[from] csv::Error),
}
