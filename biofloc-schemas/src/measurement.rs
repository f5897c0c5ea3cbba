use crate::record::{Record, TableKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's water-quality and growth log for a tank.
///
/// `biomass_kg`, `feed_kg` and `molasses_kg` are derived at entry time from the
/// live population and are stored, not recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub date: NaiveDate,
    pub tank_id: String,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    #[serde(rename = "pH")]
    pub ph: f64,
    pub alkalinity: f64,
    pub total_ammonia_nitrogen: f64,
    pub nitrite: f64,
    pub nitrate: f64,
    pub total_nitrogen: f64,
    pub floc_volume: f64,
    pub avg_fish_weight: f64,
    pub biomass_kg: f64,
    pub feed_kg: f64,
    pub molasses_kg: f64,
}

impl Record for MeasurementRecord {
    const TABLE: TableKind = TableKind::Measurements;
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "tank_id",
        "temperature",
        "dissolved_oxygen",
        "pH",
        "alkalinity",
        "total_ammonia_nitrogen",
        "nitrite",
        "nitrate",
        "total_nitrogen",
        "floc_volume",
        "avg_fish_weight",
        "biomass_kg",
        "feed_kg",
        "molasses_kg",
    ];

    fn date(&self) -> NaiveDate {
        self.date
    }
}
