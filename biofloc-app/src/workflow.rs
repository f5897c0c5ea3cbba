use anyhow::{Context, Result};
use biofloc_core::{
    analysis::{self, ExpenseTotals},
    metrics::{self, DailyInputs},
    population::{PopulationSummary, PopulationTracker},
    store::{self, RecordStore},
};
use biofloc_schemas::{
    expense::{ExpenseCategory, ExpenseRecord},
    measurement::MeasurementRecord,
    mortality::MortalityRecord,
    record::Record,
    tank::TankConfig,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::Path,
};
use tracing::info;

/// Everything shown on the status screen.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub population: PopulationSummary,
    pub measurement_count: usize,
    pub latest_sgr_pct_per_day: Option<f64>,
    pub expenses: ExpenseTotals,
}

/// Derives biomass, feed and molasses for today's inputs from the current live
/// population and appends the resulting row.
pub fn record_daily_entry(
    store: &RecordStore,
    tank: &TankConfig,
    inputs: &DailyInputs,
) -> Result<MeasurementRecord> {
    let live_population = PopulationTracker::new(store).live_population(tank)?;
    let record = metrics::derive_measurement(inputs, live_population);
    store
        .append(&record)
        .context("Failed to record daily measurements")?;
    info!(tank_id = %record.tank_id, date = %record.date, "daily entry recorded");
    Ok(record)
}

pub fn record_mortality(
    store: &RecordStore,
    tank: &TankConfig,
    date: NaiveDate,
    dead_count: u64,
) -> Result<MortalityRecord> {
    let record = MortalityRecord {
        date,
        tank_id: tank.tank_id.clone(),
        dead_count,
    };
    store.append(&record).context("Failed to record mortality")?;
    Ok(record)
}

pub fn record_expense(
    store: &RecordStore,
    date: NaiveDate,
    category: ExpenseCategory,
    cost_amount: f64,
) -> Result<ExpenseRecord> {
    let record = ExpenseRecord {
        date,
        category,
        cost_amount,
    };
    store.append(&record).context("Failed to log expense")?;
    Ok(record)
}

pub fn build_status(store: &RecordStore, tank: &TankConfig) -> Result<StatusReport> {
    let population = PopulationTracker::new(store).summary(tank)?;
    let measurements: Vec<MeasurementRecord> = store.read_all()?;
    let expenses: Vec<ExpenseRecord> = store.read_all()?;
    Ok(StatusReport {
        population,
        measurement_count: measurements.len(),
        latest_sgr_pct_per_day: analysis::latest_sgr(&measurements),
        expenses: analysis::expense_totals(&expenses),
    })
}

pub fn print_status(report: &StatusReport) {
    let population = &report.population;
    println!("\n--- [Tank {}] ---", population.tank_id);
    println!("========================================");
    println!("  - Stocked:              {:>10}", population.initial_count);
    println!("  - Reported Mortality:   {:>10}", population.total_mortality);
    println!("  - Live Fish Population: {:>10}", population.live_population);
    println!("  - Current Density:      {:>10.2} Fish/m³", population.density);
    println!("----------------------------------------");
    println!("Growth ({} entries):", report.measurement_count);
    match report.latest_sgr_pct_per_day {
        Some(sgr) => println!("  - SGR (Growth Rate):    {:>10.2} %/day", sgr),
        None => println!("  - SGR (Growth Rate):    needs at least two entries"),
    }
    println!("----------------------------------------");
    println!("Expenses:");
    for (category, cost) in &report.expenses.by_category {
        println!("  - {:<22}{:>10.2}", format!("{}:", category), cost);
    }
    println!("  --------------------------------------");
    println!("  - Total:                {:>10.2}", report.expenses.total);
    println!("========================================");
}

/// Writes the table as CSV to stdout, newest dates first.
pub fn show_table<R: Record>(store: &RecordStore) -> Result<()> {
    let mut rows = analysis::sorted_by_date(&store.read_all::<R>()?);
    rows.reverse();
    if rows.is_empty() {
        println!("No {} recorded yet.", R::TABLE);
        return Ok(());
    }
    let bytes = store::serialize_rows(&rows, false, R::TABLE.name())?;
    io::stdout().write_all(&bytes)?;
    Ok(())
}

pub fn measurement_dates(store: &RecordStore) -> Result<Vec<NaiveDate>> {
    Ok(store.distinct_dates::<MeasurementRecord>()?)
}

/// Deletes measurement rows on any of `dates`, across every tank.
pub fn delete_measurements(store: &RecordStore, dates: &[NaiveDate]) -> Result<usize> {
    let dates: HashSet<NaiveDate> = dates.iter().copied().collect();
    let removed = store
        .delete_by_date::<MeasurementRecord>(&dates)
        .context("Failed to delete measurements")?;
    Ok(removed)
}

pub fn export_table<R: Record>(store: &RecordStore, out: Option<&Path>) -> Result<()> {
    let blob = store.export::<R>()?;
    match out {
        Some(path) => {
            fs::write(path, &blob)
                .with_context(|| format!("Failed to write export to {:?}", path))?;
            info!(table = %R::TABLE, path = %path.display(), "table exported");
        }
        None => io::stdout().write_all(&blob)?,
    }
    Ok(())
}

pub fn import_table<R: Record>(store: &RecordStore, source: &Path) -> Result<usize> {
    let blob =
        fs::read(source).with_context(|| format!("Failed to read import file {:?}", source))?;
    let imported = store
        .import::<R>(&blob)
        .with_context(|| format!("Failed to import {:?} into {}", source, R::TABLE))?;
    Ok(imported)
}
