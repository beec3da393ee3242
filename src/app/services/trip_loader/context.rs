//! Info and error message sinks for a load
//!
//! The loader reports through a [`LoadContext`] rather than printing, so the
//! same load can drive a terminal or collect its messages for a response.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use crate::constants::PROGRESS_UPDATE_INTERVAL;

/// Two-channel message sink used by the trip loader
pub trait LoadContext {
    fn log(&mut self, message: &str);

    fn log_err(&mut self, message: &str);

    /// Called after every input line with the running line count
    fn progress(&mut self, _lines_read: usize) {}

    /// Called once when the load ends, successfully or not
    fn finish(&mut self) {}

    /// Polled between input lines; `true` aborts the load before its data commit
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Writes info to stdout and errors to stderr
pub struct ConsoleContext {
    spinner: Option<ProgressBar>,
    quiet: bool,
    cancellation_token: Option<CancellationToken>,
}

impl ConsoleContext {
    /// Console output, with a line-count spinner when `show_progress` is set
    pub fn new(show_progress: bool) -> Self {
        let spinner = show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
            {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        Self {
            spinner,
            quiet: false,
            cancellation_token: None,
        }
    }

    /// Drop info messages, keep errors
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Abort the load once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    fn print(&self, line: String, to_stderr: bool) {
        let emit = || {
            if to_stderr {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        };
        match &self.spinner {
            Some(pb) => pb.suspend(emit),
            None => emit(),
        }
    }
}

impl LoadContext for ConsoleContext {
    fn log(&mut self, message: &str) {
        if !self.quiet {
            self.print(message.to_string(), false);
        }
    }

    fn log_err(&mut self, message: &str) {
        self.print(message.red().to_string(), true);
    }

    fn progress(&mut self, lines_read: usize) {
        if let Some(pb) = &self.spinner {
            if lines_read % PROGRESS_UPDATE_INTERVAL == 0 {
                pb.set_message(format!("{} lines read", lines_read));
            }
        }
    }

    fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Collects messages for a later response
#[derive(Debug, Clone, Default)]
pub struct BufferedContext {
    log_msgs: Vec<String>,
    error_msgs: Vec<String>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Info messages joined with a space
    pub fn get_log_msgs(&self) -> String {
        self.log_msgs.join(" ")
    }

    /// Error messages joined with a space
    pub fn get_error_msgs(&self) -> String {
        self.error_msgs.join(" ")
    }

    pub fn has_errors(&self) -> bool {
        !self.error_msgs.is_empty()
    }
}

impl LoadContext for BufferedContext {
    fn log(&mut self, message: &str) {
        self.log_msgs.push(message.to_string());
    }

    fn log_err(&mut self, message: &str) {
        self.error_msgs.push(message.to_string());
    }
}
