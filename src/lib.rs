//! NMEA Trip Loader Library
//!
//! A Rust library for loading marine NMEA 0183 instrument logs into a
//! normalized SQLite trip database.
//!
//! This library provides tools for:
//! - Parsing GPS fix, depth, wind, water speed and ground speed/course sentences
//! - Attaching every measurement to the most recent valid fix
//! - Loading a whole log atomically, or replacing a trip's data on reload
//! - Running configured display range routines after each load
//! - Reading plain or gzip compressed input from files or stdin

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Core application modules
pub mod app {
    pub mod services {
        pub mod sentence_parser;
        pub mod trip_loader;
        pub mod trip_store;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::services::trip_loader::{BufferedContext, LoadContext, LoadSummary, TripLoader};
pub use app::services::trip_store::{SqlRoutines, TripStore};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{InputSource, LoadRequest};
