//! Trip loading orchestration
//!
//! Resolves the acting user and the target trip, streams the input through
//! the sentence dispatcher inside one transaction, and runs the display range
//! routines after the data commit.
//!
//! - [`metadata`] - Default and merged trip metadata
//! - [`source`] - Input opening, gzip sniffing and lossy line reading
//! - [`context`] - Info and error message sinks
//! - [`loader`] - The load state machine

pub mod context;
pub mod loader;
pub mod metadata;
pub mod source;

#[cfg(test)]
pub mod tests;

pub use context::{BufferedContext, ConsoleContext, LoadContext};
pub use loader::{LoadPhase, LoadSummary, TripLoader};
