use clap::Parser;
use nmea_trip_loader::cli::{
    args::Args,
    commands::{self, ReportedFailure},
};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Cancellation is checked by the load between input lines
        let cancellation_token = CancellationToken::new();

        let shutdown_signal = async {
            wait_for_ctrl_c().await;
            eprintln!("\nReceived CTRL+C, aborting load...");
            cancellation_token.cancel();

            // A second interrupt stops waiting for the rollback
            wait_for_ctrl_c().await;
        };

        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => result,
            _ = shutdown_signal => Err(anyhow::anyhow!("Interrupted by user")),
        }
    });

    match result {
        Ok(_outcome) => process::exit(0),
        Err(error) => {
            if error.downcast_ref::<ReportedFailure>().is_none() {
                eprintln!("Error: {:#}", error);
            }
            process::exit(1);
        }
    }
}

async fn wait_for_ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; never resolve
        std::future::pending::<()>().await;
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("NMEA Trip Loader - boat instrument logs into a trip database");
    println!("============================================================");
    println!();
    println!("Load NMEA 0183 logs (GPS fixes, depth, wind, water speed and");
    println!("ground speed/course) into SQLite, one trip per load.");
    println!();
    println!("USAGE:");
    println!("    nmea-loader <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    load        Load an NMEA log into a new or existing trip");
    println!("    init-db     Create the database and apply schema migrations");
    println!("    add-user    Register a user email");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    --database <PATH>    SQLite database file");
    println!("    --config <FILE>      JSON configuration file");
    println!("    -v, --verbose        More logging (-vv for trace)");
    println!("    -q, --quiet          Only print errors");
    println!("    -h, --help           Show help information");
    println!("    -V, --version        Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Prepare a database and a user:");
    println!("    nmea-loader init-db");
    println!("    nmea-loader add-user skipper@example.com");
    println!();
    println!("    # Load a log; the trip date is taken from the file name:");
    println!("    nmea-loader load log-2016-07-02.nmea -e skipper@example.com -s Aurora");
    println!();
    println!("    # Replace trip 12 with a compressed log from stdin:");
    println!("    zcat trip.nmea.gz | nmea-loader load - -e skipper@example.com -i 12");
    println!();
    println!("For detailed help on any command, use:");
    println!("    nmea-loader <COMMAND> --help");
}
