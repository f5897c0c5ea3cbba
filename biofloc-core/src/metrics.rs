//! Daily production metrics. Everything here is a pure function of its inputs.

use biofloc_schemas::measurement::MeasurementRecord;
use chrono::NaiveDate;

/// Nitrogen mass fraction of feed protein.
const PROTEIN_NITROGEN_FRACTION: f64 = 0.16;
/// Target carbon-to-nitrogen ratio for floc nitrogen immobilization.
const TARGET_C_N_RATIO: f64 = 15.0;
/// Carbon mass fraction of molasses.
const MOLASSES_CARBON_FRACTION: f64 = 0.4;

/// Rounds half away from zero to 2 decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn biomass_kg(live_population: i64, avg_weight_g: f64) -> f64 {
    live_population as f64 * avg_weight_g / 1000.0
}

pub fn feed_kg(biomass_kg: f64, feed_rate_pct: f64) -> f64 {
    biomass_kg * feed_rate_pct / 100.0
}

/// Carbon dosing needed to bring the day's feed nitrogen to the target C:N ratio.
pub fn molasses_kg(feed_kg: f64, protein_pct: f64) -> f64 {
    feed_kg * (protein_pct / 100.0) * PROTEIN_NITROGEN_FRACTION * TARGET_C_N_RATIO
        / MOLASSES_CARBON_FRACTION
}

pub fn total_nitrogen_mg_l(tan: f64, nitrite: f64, nitrate: f64) -> f64 {
    tan + nitrite + nitrate
}

/// Growth between the two most recent weights of a date-ordered series, in %/day,
/// rounded to 2 decimals. `None` with fewer than two observations.
pub fn specific_growth_rate_pct_per_day(weights: &[f64]) -> Option<f64> {
    match weights {
        [.., previous, last] => Some(round2((last.ln() - previous.ln()) * 100.0)),
        _ => None,
    }
}

/// Raw values from the daily entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyInputs {
    pub date: NaiveDate,
    pub tank_id: String,
    pub temperature: f64,
    pub dissolved_oxygen: f64,
    pub ph: f64,
    pub alkalinity: f64,
    pub tan: f64,
    pub nitrite: f64,
    pub nitrate: f64,
    pub floc_volume: f64,
    pub avg_fish_weight: f64,
    pub feed_rate_pct: f64,
    pub protein_pct: f64,
}

impl DailyInputs {
    /// Inputs pre-filled with the usual starting values of the entry form.
    pub fn new(date: NaiveDate, tank_id: impl Into<String>) -> Self {
        Self {
            date,
            tank_id: tank_id.into(),
            temperature: 28.0,
            dissolved_oxygen: 5.5,
            ph: 7.5,
            alkalinity: 120.0,
            tan: 0.1,
            nitrite: 0.01,
            nitrate: 10.0,
            floc_volume: 25.0,
            avg_fish_weight: 50.0,
            feed_rate_pct: 2.0,
            protein_pct: 30.0,
        }
    }
}

/// Builds the stored measurement row. Biomass, feed and molasses are kept to
/// 2 decimals; total nitrogen is stored unrounded.
pub fn derive_measurement(inputs: &DailyInputs, live_population: i64) -> MeasurementRecord {
    let biomass = biomass_kg(live_population, inputs.avg_fish_weight);
    let feed = feed_kg(biomass, inputs.feed_rate_pct);
    let molasses = molasses_kg(feed, inputs.protein_pct);

    MeasurementRecord {
        date: inputs.date,
        tank_id: inputs.tank_id.clone(),
        temperature: inputs.temperature,
        dissolved_oxygen: inputs.dissolved_oxygen,
        ph: inputs.ph,
        alkalinity: inputs.alkalinity,
        total_ammonia_nitrogen: inputs.tan,
        nitrite: inputs.nitrite,
        nitrate: inputs.nitrate,
        total_nitrogen: total_nitrogen_mg_l(inputs.tan, inputs.nitrite, inputs.nitrate),
        floc_volume: inputs.floc_volume,
        avg_fish_weight: inputs.avg_fish_weight,
        biomass_kg: round2(biomass),
        feed_kg: round2(feed),
        molasses_kg: round2(molasses),
    }
}
