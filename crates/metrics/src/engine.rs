use crate::error::MetricsError;
use crate::report::{BreakdownPolicy, BreakdownRow, SummaryReport};
use core_types::{Dimension, OrderRecord};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Decimal places kept in breakdown rows. Rounding is `Decimal::round_dp`,
/// i.e. round-half-to-even.
const BREAKDOWN_DP: u32 = 3;

/// A row after zero-filling, the only form the aggregations ever see.
///
/// Built on a working copy per call so the caller's table is never touched.
struct CleanRow<'a> {
    abandoned: bool,
    completed: bool,
    cart_value: Decimal,
    record: &'a OrderRecord,
}

/// Applies the null-handling rule: missing outcome flags and cart values
/// count as zero in every subsequent sum and mean.
fn scrub(orders: &[OrderRecord]) -> Vec<CleanRow<'_>> {
    orders
        .iter()
        .map(|record| CleanRow {
            abandoned: record.is_abandoned.unwrap_or(false),
            completed: record.is_completed.unwrap_or(false),
            cart_value: record.cart_value.unwrap_or(Decimal::ZERO),
            record,
        })
        .collect()
}

/// A stateless calculator for deriving abandonment metrics from an order table.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the flat summary over the whole table.
    ///
    /// # Arguments
    ///
    /// * `orders` - A slice of all `OrderRecord`s in the currently loaded table.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SummaryReport` or a `MetricsError`. An
    /// empty table is valid input and yields the zeroed report, with
    /// `abandonment_rate` and `avg_cart_value` both exactly zero rather
    /// than a division error or NaN.
    pub fn summarize(&self, orders: &[OrderRecord]) -> Result<SummaryReport, MetricsError> {
        let mut report = SummaryReport::new();

        if orders.is_empty() {
            return Ok(report);
        }

        let rows = scrub(orders);

        report.total_orders = rows.len() as u64;
        report.abandoned_orders = rows.iter().filter(|r| r.abandoned).count() as u64;
        report.completed_orders = rows.iter().filter(|r| r.completed).count() as u64;

        // total_orders > 0 here, so the division is safe.
        report.abandonment_rate =
            Decimal::from(report.abandoned_orders) / Decimal::from(report.total_orders);

        let mut cart_total = Decimal::ZERO;
        for row in &rows {
            cart_total += row.cart_value;
            if row.completed {
                report.total_revenue += row.cart_value;
            }
            if row.abandoned {
                report.lost_revenue += row.cart_value;
            }
        }

        // Mean over ALL rows, not just completed or abandoned ones.
        report.avg_cart_value = cart_total / Decimal::from(report.total_orders);
        report.potential_recovery_10pct = report.lost_revenue * Decimal::new(10, 2);

        Ok(report)
    }

    /// Computes a grouped breakdown along one dimension.
    ///
    /// Runs the five-stage pipeline: partition, aggregate, filter, sort,
    /// truncate. Group keys keep their first-appearance order through
    /// partitioning, and the sort is stable, so ties on abandonment rate
    /// stay in that order. The output is deterministic for identical input.
    ///
    /// An empty table, or a table where every group falls below
    /// `policy.min_orders`, produces an empty Vec, not an error.
    pub fn breakdown(
        &self,
        orders: &[OrderRecord],
        dimension: Dimension,
        policy: &BreakdownPolicy,
    ) -> Result<Vec<BreakdownRow>, MetricsError> {
        let rows = scrub(orders);

        // 1. Partition, preserving the order in which keys first appear.
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<&CleanRow>)> = Vec::new();
        for row in &rows {
            let key = row.record.dimension_key(dimension);
            match seen.get(key).copied() {
                Some(idx) => groups[idx].1.push(row),
                None => {
                    seen.insert(key, groups.len());
                    groups.push((key, vec![row]));
                }
            }
        }

        // 2. Aggregate each group.
        let mut table: Vec<BreakdownRow> = groups
            .into_iter()
            .map(|(key, members)| {
                let total_orders = members.len() as u64;
                let abandoned_orders = members.iter().filter(|r| r.abandoned).count() as u64;
                let cart_total: Decimal = members.iter().map(|r| r.cart_value).sum();

                // Every group has at least one member, so both divisions are safe.
                let abandonment_rate =
                    Decimal::from(abandoned_orders) / Decimal::from(total_orders);
                let avg_cart_value = cart_total / Decimal::from(total_orders);

                BreakdownRow {
                    group_key: key.to_string(),
                    total_orders,
                    abandoned_orders,
                    abandonment_rate: abandonment_rate.round_dp(BREAKDOWN_DP),
                    total_revenue: cart_total.round_dp(BREAKDOWN_DP),
                    avg_cart_value: avg_cart_value.round_dp(BREAKDOWN_DP),
                }
            })
            .collect();

        // 3. Filter out groups below the caller's minimum size.
        table.retain(|row| row.total_orders >= policy.min_orders);

        // 4. Stable sort, descending by abandonment rate.
        table.sort_by(|a, b| b.abandonment_rate.cmp(&a.abandonment_rate));

        // 5. Truncate to the caller's top-N, if any.
        if let Some(top_n) = policy.top_n {
            table.truncate(top_n);
        }

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(category: &str, abandoned: bool, completed: bool, cart_value: Decimal) -> OrderRecord {
        OrderRecord {
            is_abandoned: Some(abandoned),
            is_completed: Some(completed),
            cart_value: Some(cart_value),
            category: category.to_string(),
            payment_type: "credit_card".to_string(),
            customer_state: "SP".to_string(),
            purchased_at: None,
        }
    }

    fn engine() -> MetricsEngine {
        MetricsEngine::new()
    }

    #[test]
    fn empty_table_summarizes_to_zeroes() {
        let report = engine().summarize(&[]).unwrap();
        assert_eq!(report, SummaryReport::new());
        assert_eq!(report.abandonment_rate, Decimal::ZERO);
        assert_eq!(report.avg_cart_value, Decimal::ZERO);
    }

    #[test]
    fn missing_cart_values_count_as_zero() {
        let mut orders = vec![
            row("toys", false, true, dec!(10)),
            row("toys", false, true, dec!(0)),
            row("toys", false, true, dec!(20)),
        ];
        orders[1].cart_value = None;

        let report = engine().summarize(&orders).unwrap();
        assert_eq!(report.total_revenue, dec!(30));
        assert_eq!(report.avg_cart_value, dec!(10));
    }

    #[test]
    fn missing_flags_count_as_zero() {
        let mut orders = vec![
            row("toys", true, false, dec!(50)),
            row("toys", false, true, dec!(70)),
        ];
        orders[0].is_abandoned = None;
        orders[1].is_completed = None;

        let report = engine().summarize(&orders).unwrap();
        assert_eq!(report.abandoned_orders, 0);
        assert_eq!(report.completed_orders, 0);
        assert_eq!(report.total_revenue, Decimal::ZERO);
        assert_eq!(report.lost_revenue, Decimal::ZERO);
        // The mean still runs over all rows.
        assert_eq!(report.avg_cart_value, dec!(60));
    }

    #[test]
    fn revenue_is_restricted_by_outcome_but_mean_is_not() {
        let orders = vec![
            row("toys", true, false, dec!(100)),
            row("toys", false, true, dec!(40)),
            row("toys", false, false, dec!(10)),
        ];

        let report = engine().summarize(&orders).unwrap();
        assert_eq!(report.total_orders, 3);
        assert_eq!(report.abandoned_orders, 1);
        assert_eq!(report.completed_orders, 1);
        assert_eq!(report.total_revenue, dec!(40));
        assert_eq!(report.lost_revenue, dec!(100));
        assert_eq!(report.avg_cart_value, dec!(50));
        assert_eq!(report.potential_recovery_10pct, dec!(10));
    }

    #[test]
    fn summarize_is_idempotent_and_leaves_input_untouched() {
        let orders = vec![
            row("toys", true, false, dec!(12.5)),
            row("games", false, true, dec!(99.9)),
        ];
        let before = orders.clone();

        let first = engine().summarize(&orders).unwrap();
        let second = engine().summarize(&orders).unwrap();
        assert_eq!(first, second);
        assert_eq!(orders, before);
    }

    #[test]
    fn breakdown_of_empty_table_is_empty() {
        let policy = BreakdownPolicy::unfiltered();
        let table = engine()
            .breakdown(&[], Dimension::Category, &policy)
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn min_group_size_boundary_is_strict() {
        let mut orders = Vec::new();
        for _ in 0..49 {
            orders.push(row("small", false, true, dec!(10)));
        }
        for _ in 0..50 {
            orders.push(row("large", false, true, dec!(10)));
        }

        let policy = BreakdownPolicy {
            min_orders: 50,
            top_n: None,
        };
        let table = engine()
            .breakdown(&orders, Dimension::Category, &policy)
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].group_key, "large");
        assert_eq!(table[0].total_orders, 50);
    }

    #[test]
    fn sort_is_descending_with_stable_ties() {
        // Rates per group: low 0.2 (1/5), tie_a 0.5, tie_b 0.5.
        let mut orders = Vec::new();
        orders.push(row("low", true, false, dec!(10)));
        for _ in 0..4 {
            orders.push(row("low", false, true, dec!(10)));
        }
        orders.push(row("tie_a", true, false, dec!(10)));
        orders.push(row("tie_a", false, true, dec!(10)));
        orders.push(row("tie_b", true, false, dec!(10)));
        orders.push(row("tie_b", false, true, dec!(10)));

        let table = engine()
            .breakdown(&orders, Dimension::Category, &BreakdownPolicy::unfiltered())
            .unwrap();

        let keys: Vec<&str> = table.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(keys, vec!["tie_a", "tie_b", "low"]);
    }

    #[test]
    fn truncation_applies_after_sorting() {
        let mut orders = Vec::new();
        // worst abandons both orders, mid one of two, best none.
        orders.push(row("best", false, true, dec!(10)));
        orders.push(row("best", false, true, dec!(10)));
        orders.push(row("worst", true, false, dec!(10)));
        orders.push(row("worst", true, false, dec!(10)));
        orders.push(row("mid", true, false, dec!(10)));
        orders.push(row("mid", false, true, dec!(10)));

        let policy = BreakdownPolicy {
            min_orders: 0,
            top_n: Some(2),
        };
        let table = engine()
            .breakdown(&orders, Dimension::Category, &policy)
            .unwrap();

        let keys: Vec<&str> = table.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(keys, vec!["worst", "mid"]);
    }

    #[test]
    fn payment_dimension_groups_by_payment_type() {
        let mut orders = vec![
            row("toys", true, false, dec!(30)),
            row("games", false, true, dec!(30)),
            row("toys", false, true, dec!(60)),
        ];
        orders[0].payment_type = "boleto".to_string();
        orders[1].payment_type = "credit_card".to_string();
        orders[2].payment_type = "credit_card".to_string();

        let table = engine()
            .breakdown(&orders, Dimension::PaymentType, &BreakdownPolicy::unfiltered())
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].group_key, "boleto");
        assert_eq!(table[0].abandonment_rate, dec!(1));
        assert_eq!(table[1].group_key, "credit_card");
        assert_eq!(table[1].abandonment_rate, dec!(0));
        assert_eq!(table[1].avg_cart_value, dec!(45));
    }

    #[test]
    fn rates_round_to_three_places_half_to_even() {
        let orders = vec![
            row("thirds", true, false, dec!(10.0005)),
            row("thirds", false, true, dec!(10.0005)),
            row("thirds", false, true, dec!(10.0005)),
        ];

        let table = engine()
            .breakdown(&orders, Dimension::Category, &BreakdownPolicy::unfiltered())
            .unwrap();

        assert_eq!(table[0].abandonment_rate, dec!(0.333));
        // 30.0015 carries a trailing half; banker's rounding keeps the even digit.
        assert_eq!(table[0].total_revenue, dec!(30.002));
        assert_eq!(table[0].avg_cart_value, dec!(10.000));
    }

    #[test]
    fn category_scenario_end_to_end() {
        let mut orders = vec![
            row("a", true, false, dec!(100)),
            row("a", false, true, dec!(50)),
            row("b", true, false, dec!(200)),
            row("b", false, true, dec!(80)),
        ];
        orders[0].is_completed = None;
        orders[2].is_completed = None;

        let table = engine()
            .breakdown(&orders, Dimension::Category, &BreakdownPolicy::unfiltered())
            .unwrap();

        assert_eq!(table.len(), 2);
        // Rates tie at 0.5, so first-appearance order decides: a before b.
        assert_eq!(table[0].group_key, "a");
        assert_eq!(table[0].total_orders, 2);
        assert_eq!(table[0].abandoned_orders, 1);
        assert_eq!(table[0].abandonment_rate, dec!(0.5));
        assert_eq!(table[0].total_revenue, dec!(150));
        assert_eq!(table[0].avg_cart_value, dec!(75));

        assert_eq!(table[1].group_key, "b");
        assert_eq!(table[1].total_orders, 2);
        assert_eq!(table[1].abandoned_orders, 1);
        assert_eq!(table[1].abandonment_rate, dec!(0.5));
        assert_eq!(table[1].total_revenue, dec!(280));
        assert_eq!(table[1].avg_cart_value, dec!(140));
    }

    #[test]
    fn breakdown_is_idempotent() {
        let orders = vec![
            row("a", true, false, dec!(33.33)),
            row("b", false, true, dec!(66.67)),
        ];
        let policy = BreakdownPolicy {
            min_orders: 0,
            top_n: Some(10),
        };

        let first = engine()
            .breakdown(&orders, Dimension::Category, &policy)
            .unwrap();
        let second = engine()
            .breakdown(&orders, Dimension::Category, &policy)
            .unwrap();
        assert_eq!(first, second);
    }
}
