use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

/// The three logical datasets kept by the research logbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Measurements,
    Mortality,
    Expenses,
}

impl TableKind {
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Measurements => "measurements",
            TableKind::Mortality => "mortality",
            TableKind::Expenses => "expenses",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A row type stored in one flat CSV table.
///
/// `COLUMNS` must list the serialized field names in declaration order; it is
/// written as the header row even when a table holds no rows.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const TABLE: TableKind;
    const COLUMNS: &'static [&'static str];

    fn date(&self) -> NaiveDate;
}
