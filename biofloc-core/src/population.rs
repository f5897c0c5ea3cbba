use crate::{
    error::{BioflocError, Result},
    metrics::round2,
    store::RecordStore,
};
use biofloc_schemas::{mortality::MortalityRecord, tank::TankConfig};
use serde::Serialize;
use tracing::debug;

/// Live stock figures for one tank, as shown next to the entry forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub tank_id: String,
    pub initial_count: i64,
    pub total_mortality: u64,
    pub live_population: i64,
    pub density: f64,
}

/// Derives live population from the stocking configuration and the mortality table.
pub struct PopulationTracker<'a> {
    store: &'a RecordStore,
}

impl<'a> PopulationTracker<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Sum of `dead_count` over every mortality report for `tank_id`.
    pub fn total_mortality(&self, tank_id: &str) -> Result<u64> {
        let rows: Vec<MortalityRecord> = self.store.read_all()?;
        let total = rows
            .iter()
            .filter(|r| r.tank_id == tank_id)
            .try_fold(0u64, |acc, r| acc.checked_add(r.dead_count))
            .ok_or_else(|| {
                BioflocError::PopulationOverflow(format!("mortality total for tank '{}'", tank_id))
            })?;
        debug!(tank_id, total, "summed mortality");
        Ok(total)
    }

    /// Stocked count minus reported mortality. Not clamped at zero.
    pub fn live_population(&self, tank: &TankConfig) -> Result<i64> {
        let dead = self.total_mortality(&tank.tank_id)?;
        subtract_mortality(initial_count(tank.water_volume_m3, tank.stocking_density), dead)
    }

    pub fn summary(&self, tank: &TankConfig) -> Result<PopulationSummary> {
        let initial = initial_count(tank.water_volume_m3, tank.stocking_density);
        let total_mortality = self.total_mortality(&tank.tank_id)?;
        let live_population = subtract_mortality(initial, total_mortality)?;
        Ok(PopulationSummary {
            tank_id: tank.tank_id.clone(),
            initial_count: initial,
            total_mortality,
            live_population,
            density: density(live_population, tank.water_volume_m3)?,
        })
    }
}

/// Number of fish stocked: `floor(volume * density)`.
pub fn initial_count(water_volume_m3: f64, stocking_density: f64) -> i64 {
    (water_volume_m3 * stocking_density).floor() as i64
}

/// `initial - dead`, failing instead of wrapping when the counts are out of range.
fn subtract_mortality(initial: i64, dead: u64) -> Result<i64> {
    i64::try_from(dead)
        .ok()
        .and_then(|dead| initial.checked_sub(dead))
        .ok_or_else(|| {
            BioflocError::PopulationOverflow(format!("{} stocked minus {} dead", initial, dead))
        })
}

/// Fish per m³, rounded to 2 decimals.
pub fn density(live_population: i64, water_volume_m3: f64) -> Result<f64> {
    if water_volume_m3 == 0.0 {
        return Err(BioflocError::ZeroVolume);
    }
    Ok(round2(live_population as f64 / water_volume_m3))
}
