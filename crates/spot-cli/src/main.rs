//! `spot` CLI: resolve listing availability, quote rentals, and classify
//! booking history from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Resolve every listing in an /api/cars response (stdin → stdout)
//! curl -s "$API/api/cars?limit=12" | spot resolve
//!
//! # Resolve as of a fixed day in a given timezone
//! spot --today 2024-01-03 --tz Asia/Kolkata resolve -i cars.json --pretty
//!
//! # Price a rental and check it against a listing's bookings
//! spot quote --pickup 2024-06-01 --return 2024-06-04 -i car.json -o quote.json
//!
//! # Show upcoming bookings from /api/bookings/mybooking
//! spot history -i mybookings.json --filter upcoming
//! ```
//!
//! Set `RUST_LOG=debug` to see which rule decided each listing.

mod config;

use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use availability_engine::history::{history_from_json, HistorySummary};
use availability_engine::{
    filter_history, find_conflicts, listings_from_json, quote, report_all, summarize, Conflict,
    HistoryEntry, HistoryFilter, Listing, Quote,
};
use clap::{Parser, Subcommand};
use serde::Serialize;

use config::Settings;

#[derive(Parser)]
#[command(
    name = "spot",
    version,
    about = "Parking-spot availability, quotes and booking history"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Day to resolve against, YYYY-MM-DD (defaults to today in --tz)
    #[arg(long, global = true, env = "SPOT_TODAY")]
    today: Option<String>,

    /// IANA timezone used to turn timestamps into calendar days
    #[arg(long, global = true, env = "SPOT_TZ", default_value = "UTC")]
    tz: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve availability for a listing or a list of listings
    Resolve {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Validate and price a rental, optionally checking a listing's bookings
    Quote {
        /// Pickup day
        #[arg(long)]
        pickup: Option<String>,
        /// Return day
        #[arg(long = "return")]
        return_date: Option<String>,
        /// Daily rate (defaults to the listing's rate, else 0)
        #[arg(long)]
        rate: Option<f64>,
        /// Listing JSON file whose bookings are checked for conflicts
        #[arg(short, long)]
        input: Option<String>,
        /// Listing id to pick when the input holds several listings
        #[arg(long)]
        id: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Classify a user's booking history
    History {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Which bookings to list: all, upcoming, completed, cancelled
        #[arg(long, default_value = "all")]
        filter: HistoryFilter,
    },
}

#[derive(Serialize)]
struct QuoteReport {
    quote: Quote,
    #[serde(skip_serializing_if = "Option::is_none")]
    listing: Option<String>,
    conflicts: Vec<Conflict>,
}

#[derive(Serialize)]
struct HistoryReport<'a> {
    filter: String,
    entries: Vec<&'a HistoryEntry>,
    summary: HistorySummary,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.today.as_deref(), &cli.tz, cli.pretty)?;

    match cli.command {
        Commands::Resolve { input, output } => {
            let json = read_input(input.as_deref())?;
            let listings =
                listings_from_json(&json, &settings.clock).context("Failed to read listings")?;
            log::info!("resolving {} listing(s) for {}", listings.len(), settings.today);

            let reports = report_all(&listings, settings.today);
            write_output(output.as_deref(), &settings.to_json(&reports)?)?;
        }
        Commands::Quote {
            pickup,
            return_date,
            rate,
            input,
            id,
            output,
        } => {
            let listing = match input.as_deref() {
                Some(path) => Some(load_listing(path, id.as_deref(), &settings)?),
                None => None,
            };
            let daily_rate = rate
                .or_else(|| listing.as_ref().map(Listing::rate))
                .unwrap_or(0.0);

            let quote = quote(
                pickup.as_deref(),
                return_date.as_deref(),
                daily_rate,
                &settings.clock,
            )
            .context("Cannot quote this rental")?;
            let conflicts = listing
                .as_ref()
                .map(|l| find_conflicts(&quote.span(), &l.bookings))
                .unwrap_or_default();

            let report = QuoteReport {
                quote,
                listing: listing.as_ref().map(Listing::display_name),
                conflicts,
            };
            write_output(output.as_deref(), &settings.to_json(&report)?)?;

            if !report.conflicts.is_empty() {
                eprintln!(
                    "Requested dates overlap {} existing booking(s)",
                    report.conflicts.len()
                );
                process::exit(2);
            }
        }
        Commands::History {
            input,
            output,
            filter,
        } => {
            let json = read_input(input.as_deref())?;
            let history = history_from_json(&json, settings.today, &settings.clock)
                .context("Failed to read booking history")?;

            let report = HistoryReport {
                filter: filter.to_string(),
                entries: filter_history(&history, filter),
                summary: summarize(&history),
            };
            write_output(output.as_deref(), &settings.to_json(&report)?)?;
        }
    }

    Ok(())
}

/// Load the listing to quote against; `id` picks one out of a list.
fn load_listing(path: &str, id: Option<&str>, settings: &Settings) -> Result<Listing> {
    let json = read_input(Some(path))?;
    let mut listings =
        listings_from_json(&json, &settings.clock).context("Failed to read listing")?;

    match id {
        Some(id) => listings
            .into_iter()
            .find(|l| l.id.as_deref() == Some(id))
            .with_context(|| format!("No listing with id '{}' in {}", id, path)),
        None if listings.len() == 1 => Ok(listings.remove(0)),
        None => anyhow::bail!(
            "{} holds {} listings; pick one with --id",
            path,
            listings.len()
        ),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
