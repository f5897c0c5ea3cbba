use crate::record::{Record, TableKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Feed,
    Power,
    Labor,
    Molasses,
    Seed,
    Misc,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Feed,
        ExpenseCategory::Power,
        ExpenseCategory::Labor,
        ExpenseCategory::Molasses,
        ExpenseCategory::Seed,
        ExpenseCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Feed => "Feed",
            ExpenseCategory::Power => "Power",
            ExpenseCategory::Labor => "Labor",
            ExpenseCategory::Molasses => "Molasses",
            ExpenseCategory::Seed => "Seed",
            ExpenseCategory::Misc => "Misc",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    /// Case-insensitive, so `feed` and `Feed` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown expense category '{}' (expected one of: Feed, Power, Labor, Molasses, Seed, Misc)",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub cost_amount: f64,
}

impl Record for ExpenseRecord {
    const TABLE: TableKind = TableKind::Expenses;
    const COLUMNS: &'static [&'static str] = &["date", "category", "cost_amount"];

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("molasses".parse::<ExpenseCategory>(), Ok(ExpenseCategory::Molasses));
        assert_eq!(" Power ".parse::<ExpenseCategory>(), Ok(ExpenseCategory::Power));
        assert!("Fuel".parse::<ExpenseCategory>().is_err());
    }

    #[test]
    fn category_is_written_by_name() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .serialize(ExpenseRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
                category: ExpenseCategory::Seed,
                cost_amount: 125.5,
            })
            .unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text, "date,category,cost_amount\n2024-03-03,Seed,125.5\n");
    }
}
