use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The flat summary of an order table.
///
/// This struct is the primary output of the `MetricsEngine` and serves as
/// the data transfer object for dashboard headlines throughout the system.
///
/// Revenue fields are asymmetric on purpose: `total_revenue` and
/// `lost_revenue` are restricted to completed and abandoned rows
/// respectively, while `avg_cart_value` is the mean over ALL rows, i.e. the
/// overall average cart size rather than an outcome-specific one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total_orders: u64,
    pub abandoned_orders: u64,
    pub completed_orders: u64,
    /// `abandoned_orders / total_orders`; exactly zero for an empty table.
    pub abandonment_rate: Decimal,
    /// Sum of `cart_value` over completed rows.
    pub total_revenue: Decimal,
    /// Sum of `cart_value` over abandoned rows.
    pub lost_revenue: Decimal,
    /// Mean of `cart_value` over all rows; zero for an empty table.
    pub avg_cart_value: Decimal,
    /// `lost_revenue * 0.10`: revenue recoverable if 10% of abandoned
    /// carts converted.
    pub potential_recovery_10pct: Decimal,
}

impl SummaryReport {
    /// Creates a new, zeroed-out SummaryReport.
    /// This is what an empty or unavailable table summarizes to.
    pub fn new() -> Self {
        Self {
            total_orders: 0,
            abandoned_orders: 0,
            completed_orders: 0,
            abandonment_rate: Decimal::ZERO,
            total_revenue: Decimal::ZERO,
            lost_revenue: Decimal::ZERO,
            avg_cart_value: Decimal::ZERO,
            potential_recovery_10pct: Decimal::ZERO,
        }
    }
}

impl Default for SummaryReport {
    fn default() -> Self {
        Self::new()
    }
}

/// One group of a breakdown table.
///
/// The three `Decimal` fields are rounded to 3 decimal places using
/// round-half-to-even (banker's rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub group_key: String,
    pub total_orders: u64,
    pub abandoned_orders: u64,
    pub abandonment_rate: Decimal,
    pub total_revenue: Decimal,
    pub avg_cart_value: Decimal,
}

/// Caller-supplied shaping policy for a breakdown.
///
/// The engine hardcodes no thresholds: the category view runs with
/// `{min_orders: 50, top_n: 10}`, the geographic view with `{100, 10}` (or
/// 15 in the exploration view), and the payment view with no filtering or
/// truncation at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownPolicy {
    /// Groups with strictly fewer orders than this are dropped.
    pub min_orders: u64,
    /// Keep only the first N groups after sorting; `None` keeps all.
    pub top_n: Option<usize>,
}

impl BreakdownPolicy {
    /// A policy that keeps every group: no minimum size, no truncation.
    pub fn unfiltered() -> Self {
        Self {
            min_orders: 0,
            top_n: None,
        }
    }
}
