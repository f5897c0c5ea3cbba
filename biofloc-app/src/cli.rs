use biofloc_core::store;
use biofloc_schemas::expense::ExpenseCategory;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "biofloc", version, about = "Research logbook for biofloc aquaculture tanks")]
pub struct Cli {
    /// Settings file (defaults to ./biofloc.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Tank worked on this session
    #[arg(long, global = true)]
    pub tank_id: Option<String>,

    /// Water volume in m³
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub volume: Option<f64>,

    /// Stocking density in fish per m³
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub density: Option<f64>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log the day's water quality and growth parameters
    Entry(EntryArgs),
    /// Report fish lost in the session's tank
    Mortality {
        /// Number of fish lost
        count: u64,
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Log an expense
    Expense {
        /// Feed, Power, Labor, Molasses, Seed or Misc
        category: ExpenseCategory,
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },
    /// Live population, growth rate and expense totals
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print a table, newest first
    Show { table: TableArg },
    /// List the dates that have measurements
    Dates,
    /// Delete every measurement taken on the given dates (all tanks)
    Delete {
        #[arg(long = "date", required = true, value_parser = parse_date_arg)]
        dates: Vec<NaiveDate>,
    },
    /// Write a table in its on-disk CSV format
    Export {
        table: TableArg,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Append every row of an exported CSV file to a table
    Import { table: TableArg, file: PathBuf },
    /// Render growth, nitrogen and floc charts as PNG files
    Plot {
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TableArg {
    Measurements,
    Mortality,
    Expenses,
}

#[derive(Debug, Args)]
pub struct EntryArgs {
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,
    /// °C
    #[arg(long, default_value_t = 28.0, allow_negative_numbers = true)]
    pub temp: f64,
    /// Dissolved oxygen, mg/L
    #[arg(long = "do", default_value_t = 5.5, allow_negative_numbers = true)]
    pub dissolved_oxygen: f64,
    #[arg(long, default_value_t = 7.5, allow_negative_numbers = true)]
    pub ph: f64,
    /// mg/L
    #[arg(long, default_value_t = 120.0, allow_negative_numbers = true)]
    pub alkalinity: f64,
    /// Total ammonia nitrogen, mg/L
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
    pub tan: f64,
    /// NO2, mg/L
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true)]
    pub nitrite: f64,
    /// NO3, mg/L
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub nitrate: f64,
    /// Floc volume, ml/L
    #[arg(long, default_value_t = 25.0, allow_negative_numbers = true)]
    pub floc: f64,
    /// Average fish weight, g
    #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
    pub weight: f64,
    /// Feed rate, % of biomass (settings default when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub feed_rate: Option<f64>,
    /// Feed protein, % (settings default when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub protein: Option<f64>,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    store::parse_date(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn entry_accepts_negative_readings() {
        let cli = Cli::try_parse_from([
            "biofloc", "entry", "--date", "2024-10-02", "--temp", "-1.5", "--weight", "61",
        ])
        .unwrap();
        match cli.command {
            Command::Entry(args) => {
                assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 10, 2));
                assert_eq!(args.temp, -1.5);
                assert_eq!(args.weight, 61.0);
                assert_eq!(args.ph, 7.5);
                assert_eq!(args.feed_rate, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn delete_takes_repeated_dates_and_rejects_bad_ones() {
        let cli = Cli::try_parse_from([
            "biofloc", "delete", "--date", "2024-10-01", "--date", "2024-10-03",
        ])
        .unwrap();
        match cli.command {
            Command::Delete { dates } => assert_eq!(dates.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["biofloc", "delete", "--date", "01/10/2024"]).is_err());
        assert!(Cli::try_parse_from(["biofloc", "delete"]).is_err());
    }

    #[test]
    fn expense_category_is_parsed() {
        let cli = Cli::try_parse_from(["biofloc", "--tank-id", "Exp-02", "expense", "molasses", "19.9"])
            .unwrap();
        assert_eq!(cli.tank_id.as_deref(), Some("Exp-02"));
        match cli.command {
            Command::Expense { category, amount, date } => {
                assert_eq!(category, ExpenseCategory::Molasses);
                assert_eq!(amount, 19.9);
                assert_eq!(date, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
