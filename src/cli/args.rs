//! Command-line argument definitions for the NMEA trip loader
//!
//! The CLI is defined with the clap derive API. Storage and logging flags are
//! global so they can follow any subcommand.

use crate::constants::TRIP_DATE_FORMAT;
use crate::models::{InputSource, LoadRequest, TripId};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the NMEA trip loader
///
/// Loads boat instrument logs (NMEA 0183 sentences) into a trip database.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nmea-loader",
    version,
    about = "Load NMEA 0183 instrument logs into a trip database",
    long_about = "Reads a newline-delimited NMEA 0183 log (plain or gzip, from a file or stdin), \
                  stores every GPS fix as a trip position and attaches depth, wind, water speed \
                  and ground speed/course readings to the most recent fix. A load either commits \
                  completely or not at all; reloading a trip replaces all of its positions."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// SQLite database file, overriding configuration and environment
    #[arg(long = "database", value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// JSON configuration file
    ///
    /// Defaults to nmea-loader/config.json in the user config directory when present.
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Enable verbose logging (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the load summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Load an NMEA log into a new trip, or replace an existing trip's data
    Load(LoadArgs),
    /// Create the database and bring its schema up to date
    InitDb,
    /// Register a user so loads can be attributed to them
    AddUser(AddUserArgs),
}

/// Arguments for the load command
#[derive(Debug, Clone, Parser)]
pub struct LoadArgs {
    /// Input file, or "-" for standard input
    #[arg(value_name = "INPUT")]
    pub input: String,

    /// Email of the registered user performing the load
    #[arg(short = 'e', long = "email", value_name = "EMAIL")]
    pub email: String,

    /// Trip date (YYYY-MM-DD); defaults to a date in the file name, else today
    #[arg(short = 't', long = "date", value_name = "DATE", value_parser = parse_trip_date)]
    pub date: Option<NaiveDate>,

    /// Existing trip to reload; all of its positions are replaced
    #[arg(short = 'i', long = "trip-id", value_name = "ID")]
    pub trip_id: Option<TripId>,

    /// Trip name; defaults to the input file name
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Vessel name
    #[arg(short = 's', long = "vessel", value_name = "NAME")]
    pub vessel: Option<String>,
}

/// Arguments for the add-user command
#[derive(Debug, Clone, Parser)]
pub struct AddUserArgs {
    /// Email address of the new user
    #[arg(value_name = "EMAIL")]
    pub email: String,
}

/// Output format options for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

fn parse_trip_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), TRIP_DATE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

impl Args {
    /// Log level forced by -v/-q; `None` leaves the configured level
    pub fn get_log_level(&self) -> Option<&'static str> {
        if self.quiet {
            Some("error")
        } else {
            match self.verbose {
                0 => None,
                1 => Some("debug"),
                _ => Some("trace"),
            }
        }
    }

    /// Check if we should show progress output (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl LoadArgs {
    /// Build the loader request; empty strings count as omitted downstream
    pub fn to_request(&self) -> LoadRequest {
        LoadRequest {
            input: InputSource::from_arg(&self.input),
            user_email: self.email.trim().to_string(),
            trip_name: self.name.clone(),
            trip_date: self.date,
            vessel_name: self.vessel.clone(),
            trip_id: self.trip_id,
        }
    }
}
