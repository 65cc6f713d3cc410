use std::fs::File;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use crate::application::{AppliedEvent, CardReport, CardService, ReplaySummary};
use crate::domain::{FareSchedule, format_pence, parse_pence};
use crate::io::{Exporter, ImportError, read_events_csv, read_events_json};

/// Farecard - contactless transit card simulator
#[derive(Parser)]
#[command(name = "farecard")]
#[command(about = "A contactless transit fare card simulator")]
#[command(version)]
pub struct Cli {
    /// Maximum balance the card may hold (e.g., "90.00")
    #[arg(long, default_value = "90.00")]
    pub max_balance: String,

    /// Minimum fare; also the balance required to touch in (e.g., "1.00")
    #[arg(long, default_value = "1.00")]
    pub min_fare: String,

    /// Charge for a journey with a missing touch-in or touch-out
    #[arg(long, default_value = "6.00")]
    pub penalty_fare: String,

    /// Fare added per zone of distance between entry and exit
    #[arg(long, default_value = "1.00")]
    pub zone_increment: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a touch-event file through a fresh card
    Replay {
        /// Input file with the event sequence (CSV or JSON)
        input: PathBuf,

        /// Input format: csv, json (default: inferred from extension)
        #[arg(short, long)]
        format: Option<String>,

        /// Report format: table, json, csv
        #[arg(long, default_value = "table")]
        report: String,

        /// Write the report to a file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the journey history as CSV to this file
        #[arg(long)]
        history: Option<PathBuf>,

        /// Parse and validate the input without replaying it
        #[arg(long)]
        validate: bool,
    },

    /// Show the active fare schedule
    Fares,
}

impl Cli {
    fn fare_schedule(&self) -> Result<FareSchedule> {
        let maximum_balance = parse_pence(&self.max_balance)
            .context("Invalid --max-balance format. Use '90.00' or '90'")?;
        let minimum_fare = parse_pence(&self.min_fare)
            .context("Invalid --min-fare format. Use '1.00' or '1'")?;
        let penalty_fare = parse_pence(&self.penalty_fare)
            .context("Invalid --penalty-fare format. Use '6.00' or '6'")?;
        let zone_increment = parse_pence(&self.zone_increment)
            .context("Invalid --zone-increment format. Use '1.00' or '1'")?;

        Ok(FareSchedule::default()
            .with_maximum_balance(maximum_balance)
            .with_minimum_fare(minimum_fare)
            .with_penalty_fare(penalty_fare)
            .with_zone_increment(zone_increment))
    }

    pub fn run(self) -> Result<()> {
        let fares = self.fare_schedule()?;

        match self.command {
            Commands::Replay {
                ref input,
                ref format,
                ref report,
                ref output,
                ref history,
                validate,
            } => run_replay_command(
                fares,
                self.verbose,
                input,
                format.as_deref(),
                report,
                output.as_deref(),
                history.as_deref(),
                validate,
            ),

            Commands::Fares => {
                println!("Fare schedule:");
                println!("  Maximum balance: {}", format_pence(fares.maximum_balance));
                println!("  Minimum fare:    {}", format_pence(fares.minimum_fare));
                println!("  Penalty fare:    {}", format_pence(fares.penalty_fare));
                println!("  Zone increment:  {}", format_pence(fares.zone_increment));
                Ok(())
            }
        }
    }
}

fn run_replay_command(
    fares: FareSchedule,
    verbose: bool,
    input: &Path,
    format: Option<&str>,
    report_format: &str,
    output: Option<&Path>,
    history: Option<&Path>,
    validate: bool,
) -> Result<()> {
    let format = match format {
        Some(f) => f.to_string(),
        None => match input.extension().and_then(|e| e.to_str()) {
            Some("json") => "json".to_string(),
            _ => "csv".to_string(),
        },
    };

    let file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;

    let events = match format.as_str() {
        "csv" => {
            let result = read_events_csv(file)?;
            print_import_errors(&result.errors);
            if validate {
                println!(
                    "Validated {} events, {} errors",
                    result.events.len(),
                    result.errors.len()
                );
                return Ok(());
            }
            result.events
        }
        "json" => {
            let events = read_events_json(file)
                .with_context(|| format!("Failed to parse JSON events: {}", input.display()))?;
            if validate {
                println!("Validated {} events, 0 errors", events.len());
                return Ok(());
            }
            events
        }
        other => bail!("Unknown input format '{}'. Valid: csv, json", other),
    };

    let mut service = CardService::new(fares);
    let summary = service.replay(&events);

    if verbose {
        narrate_replay(&summary);
    }
    for rejection in &summary.rejected {
        eprintln!("Event {} rejected: {}", rejection.index + 1, rejection.error);
    }

    if let Some(path) = history {
        let file = File::create(path)
            .with_context(|| format!("Failed to create history file: {}", path.display()))?;
        let count = Exporter::new(&service).export_history_csv(file)?;
        eprintln!("Exported {} journeys to {}", count, path.display());
    }

    let report = service.report();
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };
    render_report(&report, report_format, writer)
}

fn print_import_errors(errors: &[ImportError]) {
    for error in errors {
        match &error.field {
            Some(field) => eprintln!("line {} ({}): {}", error.line, field, error.error),
            None => eprintln!("line {}: {}", error.line, error.error),
        }
    }
}

fn narrate_replay(summary: &ReplaySummary) {
    for outcome in &summary.outcomes {
        match outcome {
            AppliedEvent::ToppedUp(result) => {
                eprintln!(
                    "Topped up {}, balance {}",
                    format_pence(result.amount),
                    format_pence(result.balance)
                );
            }
            AppliedEvent::TouchedIn(result) => match result.penalty {
                Some(penalty) => eprintln!(
                    "Touched in at {} after abandoned journey: penalty {}, balance {}",
                    result.station,
                    format_pence(penalty),
                    format_pence(result.balance)
                ),
                None => eprintln!("Touched in at {}", result.station),
            },
            AppliedEvent::TouchedOut(result) => match &result.journey {
                Some(journey) => eprintln!(
                    "Touched out at {}: fare {}, balance {}",
                    result.station,
                    format_pence(journey.fare),
                    format_pence(result.balance)
                ),
                None => eprintln!(
                    "Touched out at {} with no touch-in: penalty {}, balance {}",
                    result.station,
                    format_pence(result.charged),
                    format_pence(result.balance)
                ),
            },
        }
    }
}

fn render_report(report: &CardReport, format: &str, mut writer: Box<dyn Write>) -> Result<()> {
    match format {
        "json" => {
            writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
        }
        "csv" => {
            writeln!(writer, "zone_distance,journeys,total_fares,average_fare")?;
            for group in &report.by_distance {
                writeln!(
                    writer,
                    "{},{},{},{}",
                    group.zone_distance, group.journeys, group.total_fares, group.average_fare
                )?;
            }
        }
        "table" => {
            writeln!(writer, "Card Report")?;
            writeln!(
                writer,
                "Generated: {}",
                report.generated_at.format("%Y-%m-%d %H:%M:%S")
            )?;
            writeln!(writer)?;
            writeln!(writer, "Balance:      {:>12}", format_pence(report.balance))?;
            writeln!(writer, "Journeys:     {:>12}", report.journeys)?;
            writeln!(
                writer,
                "Total fares:  {:>12}",
                format_pence(report.total_fares)
            )?;
            writeln!(
                writer,
                "Penalties:    {:>12} ({})",
                report.penalties,
                format_pence(report.penalty_total)
            )?;

            if !report.by_distance.is_empty() {
                writeln!(writer)?;
                writeln!(
                    writer,
                    "{:>8} {:>10} {:>12} {:>12}",
                    "ZONES", "JOURNEYS", "TOTAL", "AVERAGE"
                )?;
                writeln!(writer, "{}", "-".repeat(46))?;
                for group in &report.by_distance {
                    writeln!(
                        writer,
                        "{:>8} {:>10} {:>12} {:>12}",
                        group.zone_distance,
                        group.journeys,
                        format_pence(group.total_fares),
                        format_pence(group.average_fare)
                    )?;
                }
            }
        }
        other => bail!("Unknown report format '{}'. Valid: table, json, csv", other),
    }

    writer.flush()?;
    Ok(())
}
