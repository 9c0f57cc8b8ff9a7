//! # Cartlens Metrics Engine
//!
//! This crate turns a flat order-level table into the aggregate business
//! metrics the rest of the system reports on: a summary of abandonment and
//! revenue, and per-dimension breakdown tables.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   where the table came from or where the results go. It depends only on
//!   `core-types` (Layer 0).
//! - **Stateless Calculation:** The `MetricsEngine` is a stateless
//!   calculator. Every call is an independent, idempotent transformation of
//!   the caller-supplied rows; the engine never mutates its input and holds
//!   no loaded table of its own. Callers load the table once and pass it in
//!   explicitly.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The main struct that contains the aggregation logic.
//! - `SummaryReport`: The flat summary-statistics record.
//! - `BreakdownRow` / `BreakdownPolicy`: One row of a grouped breakdown and
//!   the caller-supplied filter/truncation policy that shaped it.
//! - `MetricsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use error::MetricsError;
pub use report::{BreakdownPolicy, BreakdownRow, SummaryReport};
