//! Command implementations for the NMEA trip loader CLI
//!
//! This module contains configuration loading, logging setup, command
//! execution and result reporting. Database work is blocking and runs on the
//! runtime's blocking pool.

use crate::app::services::trip_loader::{ConsoleContext, LoadSummary, TripLoader};
use crate::app::services::trip_store::schema::current_version;
use crate::app::services::trip_store::{SqlRoutines, TripStore};
use crate::cli::args::{AddUserArgs, Args, Commands, LoadArgs, OutputFormat};
use crate::config::Config;
use crate::models::UserId;
use anyhow::Context;
use colored::Colorize;
use indicatif::HumanDuration;
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// What a command produced, for reporting
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum CommandOutcome {
    Load(LoadSummary),
    InitDb {
        database: PathBuf,
        schema_version: i64,
    },
    AddUser {
        email: String,
        user_id: UserId,
    },
}

/// A load failure whose message the load context has already printed
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReportedFailure(#[from] crate::Error);

/// Main command runner
///
/// 1. Load layered configuration and apply CLI overrides
/// 2. Set up logging
/// 3. Run the selected command on the blocking pool
/// 4. Report the outcome
///
/// A load checks `cancellation_token` between input lines and rolls back once
/// it is cancelled.
pub async fn run(
    args: Args,
    cancellation_token: CancellationToken,
) -> anyhow::Result<CommandOutcome> {
    let config = load_configuration(&args)?;
    setup_logging(&args, &config);

    info!("Starting NMEA trip loader");
    debug!("Command line arguments: {:?}", args);
    debug!("Loaded configuration: {:?}", config);

    let outcome = match &args.command {
        Some(Commands::Load(load_args)) => {
            run_load(&args, &config, load_args, cancellation_token).await?
        }
        Some(Commands::InitDb) => run_init_db(&config).await?,
        Some(Commands::AddUser(add_args)) => run_add_user(&config, add_args).await?,
        None => anyhow::bail!("No command given"),
    };

    generate_report(&args, &outcome)?;
    Ok(outcome)
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &Args) -> anyhow::Result<Config> {
    let config_file = match &args.config_file {
        Some(path) => Some(path.clone()),
        None => Config::default_config_path()
            .ok()
            .filter(|path| path.exists()),
    };

    let mut config = Config::load_layered(config_file.as_deref()).with_context(|| {
        match &config_file {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        }
    })?;

    apply_cli_overrides(&mut config, args);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(database) = &args.database {
        config.database.path = database.clone();
    }
    if let Some(level) = args.get_log_level() {
        config.logging.level = level.to_string();
    }
}

/// Set up structured logging on stderr; RUST_LOG takes precedence
fn setup_logging(args: &Args, config: &Config) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("nmea_trip_loader={}", config.logging.level))
    });

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };

    // A subscriber is already installed when commands run more than once in a process
    if result.is_ok() {
        debug!("Logging initialized at level: {}", config.logging.level);
    }
}

async fn run_load(
    args: &Args,
    config: &Config,
    load_args: &LoadArgs,
    cancellation_token: CancellationToken,
) -> anyhow::Result<CommandOutcome> {
    let request = load_args.to_request();
    let database = config.database.clone();
    let routines = SqlRoutines::from_config(&config.display_ranges);
    if routines.is_empty() {
        debug!("No display range routines configured");
    } else {
        debug!(
            "{} display range routines configured: {:?}",
            routines.statements().len(),
            routines.statements()
        );
    }
    let show_progress = args.show_progress() && std::io::stdout().is_terminal();
    let quiet = args.quiet;

    info!(
        "Loading {} into {}",
        request.input.printable_name(),
        database.path.display()
    );

    let summary = tokio::task::spawn_blocking(move || -> anyhow::Result<LoadSummary> {
        let mut store = TripStore::open(&database).with_context(|| {
            format!("Failed to open database {}", database.path.display())
        })?;
        let mut ctx = ConsoleContext::new(show_progress).with_cancellation(cancellation_token);
        if quiet {
            ctx = ctx.quiet();
        }
        let mut loader = TripLoader::new(&mut store, routines);
        let summary = loader
            .load(&request, &mut ctx)
            .map_err(ReportedFailure::from)?;
        Ok(summary)
    })
    .await
    .context("Load task failed")??;

    Ok(CommandOutcome::Load(summary))
}

async fn run_init_db(config: &Config) -> anyhow::Result<CommandOutcome> {
    let database = config.database.clone();

    tokio::task::spawn_blocking(move || -> anyhow::Result<CommandOutcome> {
        let store = TripStore::open(&database).with_context(|| {
            format!("Failed to initialize database {}", database.path.display())
        })?;
        let schema_version = current_version(store.connection())?;
        Ok(CommandOutcome::InitDb {
            database: database.path,
            schema_version,
        })
    })
    .await
    .context("Database task failed")?
}

async fn run_add_user(config: &Config, add_args: &AddUserArgs) -> anyhow::Result<CommandOutcome> {
    let database = config.database.clone();
    let email = add_args.email.trim().to_string();
    if email.is_empty() {
        anyhow::bail!("User email must not be empty");
    }

    tokio::task::spawn_blocking(move || -> anyhow::Result<CommandOutcome> {
        let mut store = TripStore::open(&database).with_context(|| {
            format!("Failed to open database {}", database.path.display())
        })?;
        let user_id = store
            .add_user(&email)
            .with_context(|| format!("Failed to add user {}", email))?;
        Ok(CommandOutcome::AddUser { email, user_id })
    })
    .await
    .context("Database task failed")?
}

/// Generate the final report in the requested format
fn generate_report(args: &Args, outcome: &CommandOutcome) -> anyhow::Result<()> {
    match args.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Human if args.quiet => {}
        OutputFormat::Human => generate_human_report(outcome),
    }
    Ok(())
}

fn generate_human_report(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Load(summary) => {
            let stats = &summary.stats;
            let verb = if summary.reloaded { "reloaded" } else { "created" };
            println!();
            println!(
                "{} Trip {} {} from {}",
                "✔".green(),
                summary.trip_id.to_string().bold(),
                verb,
                summary.source_name
            );
            println!("   • Lines read: {}", stats.lines_read);
            println!("   • Positions: {}", stats.positions);
            println!(
                "   • Depth / wind / water speed / ground speed: {} / {} / {} / {}",
                stats.depths, stats.winds, stats.water_speeds, stats.ground_speed_courses
            );
            if stats.skipped() > 0 {
                println!(
                    "   • Skipped: {} fix dropouts, {} before first fix, {} incomplete, {} unsupported unit",
                    stats.fix_dropouts,
                    stats.measurements_before_fix,
                    stats.incomplete_measurements,
                    stats.unsupported_units
                );
            }
            println!("   • Time: {}", HumanDuration(summary.elapsed));
        }
        CommandOutcome::InitDb {
            database,
            schema_version,
        } => {
            println!(
                "{} Database {} at schema version {}",
                "✔".green(),
                database.display(),
                schema_version
            );
        }
        CommandOutcome::AddUser { email, user_id } => {
            println!("{} User {} has id {}", "✔".green(), email, user_id);
        }
    }
}
