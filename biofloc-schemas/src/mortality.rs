use crate::record::{Record, TableKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single mortality report. Reports are never merged by date or tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalityRecord {
    pub date: NaiveDate,
    pub tank_id: String,
    pub dead_count: u64,
}

impl Record for MortalityRecord {
    const TABLE: TableKind = TableKind::Mortality;
    const COLUMNS: &'static [&'static str] = &["date", "tank_id", "dead_count"];

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_declared_columns() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer
            .serialize(MortalityRecord {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                tank_id: "Exp-01".to_string(),
                dead_count: 4,
            })
            .unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(text, "date,tank_id,dead_count\n2024-03-02,Exp-01,4\n");
    }
}
