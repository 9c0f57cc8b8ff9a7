//! # Cartlens Dataset Loader
//!
//! This crate locates and parses the exported analysis dataset, turning the
//! raw CSV into the typed `OrderRecord` table the metrics engine consumes.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** This crate encapsulates all file-format knowledge.
//!   String-keyed column access exists only here, at the boundary where raw
//!   input columns are mapped onto the typed schema; everything above works
//!   with named fields.
//! - **Fail Fast:** A dataset missing a required column is rejected up front
//!   with `DatasetError::MissingColumn`, and a cell that cannot be coerced
//!   aborts the load. No partially parsed table is ever returned.
//!
//! ## Public API
//!
//! - `load_latest_dataset`: Discovers the newest dataset file and parses it.
//! - `find_latest_dataset` / `load_dataset`: The two halves, usable apart.
//! - `LoadedDataset`: The parsed table together with its source path.
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod locator;
pub mod reader;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use locator::find_latest_dataset;
pub use reader::{LoadedDataset, load_dataset, load_latest_dataset};
