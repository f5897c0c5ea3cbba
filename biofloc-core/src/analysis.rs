use crate::metrics;
use biofloc_schemas::{
    expense::{ExpenseCategory, ExpenseRecord},
    measurement::MeasurementRecord,
    record::Record,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ExpenseTotals {
    pub by_category: BTreeMap<ExpenseCategory, f64>,
    pub total: f64,
}

/// Rows ordered by date. Rows sharing a date keep their file order.
pub fn sorted_by_date<R: Record>(rows: &[R]) -> Vec<R> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|r| r.date());
    sorted
}

/// Average fish weight of every measurement, oldest first.
pub fn weight_history(measurements: &[MeasurementRecord]) -> Vec<f64> {
    sorted_by_date(measurements)
        .iter()
        .map(|m| m.avg_fish_weight)
        .collect()
}

/// SGR between the two latest measurements across the whole history, all tanks included.
pub fn latest_sgr(measurements: &[MeasurementRecord]) -> Option<f64> {
    metrics::specific_growth_rate_pct_per_day(&weight_history(measurements))
}

pub fn expense_totals(expenses: &[ExpenseRecord]) -> ExpenseTotals {
    let mut totals = ExpenseTotals::default();
    for expense in expenses {
        *totals.by_category.entry(expense.category).or_insert(0.0) += expense.cost_amount;
        totals.total += expense.cost_amount;
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn weighed(day: u32, weight: f64) -> MeasurementRecord {
        MeasurementRecord {
            date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            tank_id: "Exp-01".to_string(),
            temperature: 28.0,
            dissolved_oxygen: 5.5,
            ph: 7.5,
            alkalinity: 120.0,
            total_ammonia_nitrogen: 0.1,
            nitrite: 0.01,
            nitrate: 10.0,
            total_nitrogen: 10.11,
            floc_volume: 25.0,
            avg_fish_weight: weight,
            biomass_kg: 0.0,
            feed_kg: 0.0,
            molasses_kg: 0.0,
        }
    }

    #[test]
    fn weights_follow_date_order_not_file_order() {
        let rows = vec![weighed(3, 50.0), weighed(1, 30.0), weighed(2, 40.0)];
        assert_eq!(weight_history(&rows), vec![30.0, 40.0, 50.0]);
        assert_eq!(latest_sgr(&rows), Some(22.31));
    }

    #[test]
    fn same_day_rows_keep_file_order() {
        let rows = vec![weighed(2, 40.0), weighed(1, 10.0), weighed(2, 50.0)];
        assert_eq!(weight_history(&rows), vec![10.0, 40.0, 50.0]);
    }

    #[test]
    fn single_measurement_has_no_sgr() {
        assert_eq!(latest_sgr(&[weighed(1, 50.0)]), None);
        assert_eq!(latest_sgr(&[]), None);
    }

    #[test]
    fn expenses_are_summed_per_category() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let expense = |category, cost_amount| ExpenseRecord {
            date,
            category,
            cost_amount,
        };
        let totals = expense_totals(&[
            expense(ExpenseCategory::Feed, 100.0),
            expense(ExpenseCategory::Power, 20.0),
            expense(ExpenseCategory::Feed, 50.5),
        ]);
        assert_eq!(totals.by_category[&ExpenseCategory::Feed], 150.5);
        assert_eq!(totals.by_category[&ExpenseCategory::Power], 20.0);
        assert!(!totals.by_category.contains_key(&ExpenseCategory::Labor));
        assert_eq!(totals.total, 170.5);
    }
}
