use anyhow::{Context, Result};
use biofloc_core::{metrics::DailyInputs, store::RecordStore};
use biofloc_schemas::{
    expense::ExpenseRecord, measurement::MeasurementRecord, mortality::MortalityRecord,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Command, EntryArgs, TableArg};
use config::{Settings, TankOverrides};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod plotting;
mod workflow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(
        cli.config.as_deref(),
        TankOverrides {
            tank_id: cli.tank_id,
            water_volume_m3: cli.volume,
            stocking_density: cli.density,
        },
    )?;

    let store = RecordStore::open(settings.store_config())
        .context("Failed to open the research data directory")?;

    run(cli.command, &settings, &store)
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "biofloc=debug,biofloc_core=debug"
    } else {
        "biofloc=info,biofloc_core=info"
    }
}

fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run(command: Command, settings: &Settings, store: &RecordStore) -> Result<()> {
    let tank = &settings.tank;
    match command {
        Command::Entry(args) => {
            let inputs = daily_inputs(args, settings);
            let record = workflow::record_daily_entry(store, tank, &inputs)?;
            println!(
                "Data for {} has been successfully recorded (biomass {:.2} kg, feed {:.2} kg, molasses {:.2} kg, total N {} mg/L).",
                record.date, record.biomass_kg, record.feed_kg, record.molasses_kg, record.total_nitrogen
            );
        }
        Command::Mortality { count, date } => {
            let record =
                workflow::record_mortality(store, tank, date.unwrap_or_else(today), count)?;
            println!(
                "Recorded {} dead in {} on {}.",
                record.dead_count, record.tank_id, record.date
            );
        }
        Command::Expense {
            category,
            amount,
            date,
        } => {
            let record =
                workflow::record_expense(store, date.unwrap_or_else(today), category, amount)?;
            println!(
                "Logged {} expense of {:.2} on {}.",
                record.category, record.cost_amount, record.date
            );
        }
        Command::Status { json } => {
            let report = workflow::build_status(store, tank)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                workflow::print_status(&report);
            }
        }
        Command::Show { table } => match table {
            TableArg::Measurements => workflow::show_table::<MeasurementRecord>(store)?,
            TableArg::Mortality => workflow::show_table::<MortalityRecord>(store)?,
            TableArg::Expenses => workflow::show_table::<ExpenseRecord>(store)?,
        },
        Command::Dates => {
            for date in workflow::measurement_dates(store)? {
                println!("{}", date);
            }
        }
        Command::Delete { dates } => {
            let removed = workflow::delete_measurements(store, &dates)?;
            println!("Deleted {} measurement record(s).", removed);
        }
        Command::Export { table, out } => {
            let out = out.as_deref();
            match table {
                TableArg::Measurements => workflow::export_table::<MeasurementRecord>(store, out)?,
                TableArg::Mortality => workflow::export_table::<MortalityRecord>(store, out)?,
                TableArg::Expenses => workflow::export_table::<ExpenseRecord>(store, out)?,
            }
        }
        Command::Import { table, file } => {
            let imported = match table {
                TableArg::Measurements => workflow::import_table::<MeasurementRecord>(store, &file)?,
                TableArg::Mortality => workflow::import_table::<MortalityRecord>(store, &file)?,
                TableArg::Expenses => workflow::import_table::<ExpenseRecord>(store, &file)?,
            };
            println!("Imported {} row(s) from {:?}.", imported, file);
        }
        Command::Plot { out_dir } => {
            let out_dir = out_dir.unwrap_or_else(|| settings.file.plots_dir.clone());
            let measurements: Vec<MeasurementRecord> = store.read_all()?;
            for path in plotting::generate_all_plots(&out_dir, &measurements)? {
                println!("[Plotting] Saved {}", path);
            }
        }
    }
    Ok(())
}

fn daily_inputs(args: EntryArgs, settings: &Settings) -> DailyInputs {
    let defaults = &settings.file.entry_defaults;
    DailyInputs {
        date: args.date.unwrap_or_else(today),
        tank_id: settings.tank.tank_id.clone(),
        temperature: args.temp,
        dissolved_oxygen: args.dissolved_oxygen,
        ph: args.ph,
        alkalinity: args.alkalinity,
        tan: args.tan,
        nitrite: args.nitrite,
        nitrate: args.nitrate,
        floc_volume: args.floc,
        avg_fish_weight: args.weight,
        feed_rate_pct: args.feed_rate.unwrap_or(defaults.feed_rate_pct),
        protein_pct: args.protein.unwrap_or(defaults.protein_pct),
    }
}
