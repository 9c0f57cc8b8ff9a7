use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("An unexpected error occurred during aggregation: {0}")]
    Computation(String),
}
