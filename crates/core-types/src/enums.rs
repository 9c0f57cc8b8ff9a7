use serde::{Deserialize, Serialize};
use std::fmt;

/// The categorical dimensions an order table can be broken down by.
///
/// Replaces runtime column lookup by string name: a breakdown can only be
/// requested for a dimension that actually exists on `OrderRecord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Category,
    PaymentType,
    CustomerState,
}

impl Dimension {
    /// The upstream dataset column this dimension was loaded from.
    pub fn column_name(&self) -> &'static str {
        match self {
            Dimension::Category => "product_category_name_english",
            Dimension::PaymentType => "payment_type",
            Dimension::CustomerState => "customer_state",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dimension::Category => "category",
            Dimension::PaymentType => "payment_type",
            Dimension::CustomerState => "customer_state",
        };
        write!(f, "{}", label)
    }
}
