use crate::enums::Dimension;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single row of the order-level analysis table.
///
/// The outcome flags and the cart value are `Option` because the upstream
/// export leaves them blank for some rows; consumers that aggregate over the
/// table decide how to treat the gaps (the metrics engine zero-fills them on
/// a working copy). `is_abandoned` and `is_completed` are mutually exclusive
/// in well-formed data, but nothing here enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Whether the cart was abandoned before checkout.
    pub is_abandoned: Option<bool>,
    /// Whether the order completed checkout.
    pub is_completed: Option<bool>,
    /// Monetary value of the cart.
    pub cart_value: Option<Decimal>,
    /// English product category label.
    pub category: String,
    /// Payment method label (e.g., "credit_card", "boleto").
    pub payment_type: String,
    /// Two-letter customer state code.
    pub customer_state: String,
    /// When the order was placed. Used only for range display.
    pub purchased_at: Option<NaiveDateTime>,
}

impl OrderRecord {
    /// Returns the grouping key of this record along the given dimension.
    pub fn dimension_key(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Category => &self.category,
            Dimension::PaymentType => &self.payment_type,
            Dimension::CustomerState => &self.customer_state,
        }
    }
}
