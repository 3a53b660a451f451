//! Calbudget CLI
//!
//! Command-line interface for calculating uncertainty budgets and browsing an
//! accreditation scope export without running the server.
//!
//! # Usage
//!
//! ```bash
//! calbudget --help
//! calbudget compute --standard 100 --reading 100.1,99.9,100.0 --resolution 0.1 \
//!     --reference-uncertainty 0.5 --cmc 1.0
//! calbudget units --parameter voltage
//! calbudget scope --file scope.json --measurand "DC Voltage"
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared::models::{
    all_units, CalculationBatch, Parameter, ReferenceMode, ReportSheet, ScopeColumn,
};
use shared::storage::{InMemoryScopeStore, ScopeQuery, ScopeStore};
use std::path::PathBuf;

/// Calbudget CLI - measurement uncertainty budgets for calibration laboratories
#[derive(Parser)]
#[command(name = "calbudget")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate uncertainty budgets for one or more standard values
    Compute(ComputeArgs),
    /// List parameters and their units
    Units {
        /// Only list the units of this parameter
        #[arg(short, long)]
        parameter: Option<Parameter>,
    },
    /// Browse an accreditation scope export
    Scope(ScopeArgs),
}

#[derive(Args)]
struct ComputeArgs {
    /// Standard value(s); one budget row is calculated per value
    #[arg(short, long = "standard", required = true, value_delimiter = ',')]
    standard: Vec<f64>,

    /// Readings indicated by the equipment under calibration
    #[arg(
        short,
        long = "reading",
        required = true,
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    readings: Vec<f64>,

    /// Resolution of the equipment under calibration
    #[arg(long, default_value_t = 0.0)]
    resolution: f64,

    /// Uncertainty of the reference standard
    #[arg(long)]
    reference_uncertainty: f64,

    /// Accuracy specification contribution
    #[arg(long, default_value_t = 0.0)]
    accuracy: f64,

    /// CMC bound in percent
    #[arg(long, default_value_t = 1.0)]
    cmc: f64,

    /// How the reference uncertainty is interpreted
    #[arg(
        short,
        long,
        env = "CALBUDGET_REFERENCE_MODE",
        default_value = "certificate_halved"
    )]
    mode: ReferenceMode,

    /// Quantity being calibrated
    #[arg(short, long, default_value = "voltage")]
    parameter: Parameter,

    /// Range setting of the equipment under calibration
    #[arg(long, default_value_t = 0.0)]
    range: f64,

    /// Unit of the range setting (defaults to --unit)
    #[arg(long)]
    range_unit: Option<String>,

    /// Unit of the standard values
    #[arg(short, long, default_value = "V")]
    unit: String,

    /// Print the rows as JSON
    #[arg(long)]
    json: bool,
}

impl ComputeArgs {
    fn to_batch(&self) -> CalculationBatch {
        CalculationBatch {
            parameter: self.parameter,
            range_unit: self.range_unit.clone().unwrap_or_else(|| self.unit.clone()),
            range_value: self.range,
            standard_unit: self.unit.clone(),
            standard_values: self.standard.clone(),
            indicated_readings: self.readings.iter().copied().map(Some).collect(),
            resolution: self.resolution,
            reference_uncertainty: self.reference_uncertainty,
            accuracy_uncertainty: self.accuracy,
            cmc_percent: self.cmc,
        }
    }
}

#[derive(Args)]
struct ScopeArgs {
    /// Scope export (JSON array of entries)
    #[arg(short, long, env = "CALBUDGET_SCOPE_FILE")]
    file: PathBuf,

    /// Keep entries of this nature (repeatable)
    #[arg(long)]
    nature: Vec<String>,

    /// Keep entries of this measurand (repeatable)
    #[arg(long)]
    measurand: Vec<String>,

    /// Keep entries of this method (repeatable)
    #[arg(long)]
    method: Vec<String>,

    /// Keep entries whose CMC is at most this percentage
    #[arg(long)]
    max_cmc: Option<f64>,

    /// Print the matching entries as JSON
    #[arg(long)]
    json: bool,
}

impl ScopeArgs {
    fn to_query(&self) -> ScopeQuery {
        let mut query = ScopeQuery::new();
        let selections = [
            (ScopeColumn::Nature, &self.nature),
            (ScopeColumn::Measurand, &self.measurand),
            (ScopeColumn::Method, &self.method),
        ];
        for (column, values) in selections {
            for value in values {
                query = query.with_value(column, value.as_str());
            }
        }
        if let Some(max) = self.max_cmc {
            query = query.with_max_cmc_percent(max);
        }
        query
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Compute(args)) => compute(&args),
        Some(Commands::Units { parameter }) => {
            units(parameter);
            Ok(())
        }
        Some(Commands::Scope(args)) => scope(&args),
        None => {
            println!("Calbudget CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            Ok(())
        }
    }
}

fn compute(args: &ComputeArgs) -> Result<()> {
    let mut sheet = ReportSheet::new();
    let added = sheet
        .calculate_and_add(&args.to_batch(), args.mode)
        .context("Calculation rejected")?;
    tracing::debug!(added, mode = %args.mode, "Calculated budget rows");

    if added == 0 {
        anyhow::bail!("No positive standard value to calculate");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(sheet.rows())?);
        return Ok(());
    }

    if let [row] = sheet.rows() {
        let b = &row.budget;
        println!("Standard value        {} {}", row.standard_value, row.standard_unit);
        println!("Readings used         {}", b.reading_count);
        println!("Average indicated     {:.6}", b.average_indicated);
        println!("Error                 {:.4} %", b.percent_error);
        for (name, value) in b.contributions() {
            println!("  {name:<20}{value:.6}");
        }
        println!("Combined uncertainty  {:.6}", b.combined_uncertainty);
        println!("Expanded (k=2)        {:.6}", b.expanded_uncertainty);
        println!("CMC ({:.2} %)          {:.6}", row.cmc_percent, b.cmc_absolute);
        println!(
            "Reported uncertainty  {:.6}{}",
            b.reported_uncertainty,
            if b.is_cmc_limited() { " (CMC)" } else { "" }
        );
        return Ok(());
    }

    println!(
        "{:>5}  {:>12}  {:>14}  {:>14}  {:>12}",
        "Sl.No", "Range", "Standard", "Indicated", "U (k=2)"
    );
    for row in sheet.summary() {
        println!(
            "{:>5}  {:>10} {}  {:>12} {}  {:>12.6} {}  {:>12.6}",
            row.sl_no,
            row.range_value,
            row.range_unit,
            row.standard_value,
            row.standard_unit,
            row.indicated_value,
            row.standard_unit,
            row.expanded_uncertainty,
        );
    }
    Ok(())
}

fn units(parameter: Option<Parameter>) {
    match parameter {
        Some(parameter) => println!("{parameter}: {}", parameter.units().join(", ")),
        None => {
            for parameter in Parameter::ALL {
                println!("{parameter:<12} {}", parameter.units().join(", "));
            }
            println!();
            println!("All units: {}", all_units().join(", "));
        }
    }
}

fn scope(args: &ScopeArgs) -> Result<()> {
    let store = InMemoryScopeStore::from_json_file(&args.file)
        .with_context(|| format!("Failed to load scope file {}", args.file.display()))?;
    let result = store.query(&args.to_query())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.entries)?);
        return Ok(());
    }

    for indexed in &result.entries {
        let e = &indexed.entry;
        println!(
            "[{}] {} | {} | {} | {} | {} %",
            indexed.index, e.nature, e.measurand, e.method, e.range, e.cmc_percent
        );
    }
    println!("{} of {} entries match", result.total_count, store.count()?);
    Ok(())
}
