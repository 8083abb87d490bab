use clap::Parser;
use std::process;
use watch_history::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // The engine runs on the blocking pool, so CTRL+C is noticed at once
        tokio::select! {
            result = commands::run(args) => {
                result
            }
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => {
                        eprintln!("\nReceived CTRL+C, shutting down...");
                        Err(watch_history::Error::processing_interrupted(
                            "Processing interrupted by user",
                        ))
                    }
                    Err(e) => Err(watch_history::Error::io(
                        "Failed to install CTRL+C signal handler",
                        e,
                    )),
                }
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - stats have already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Watch History - YouTube Takeout Converter");
    println!("=========================================");
    println!();
    println!("Turn a Google Takeout YouTube watch history (zip, HTML or JSON) into");
    println!("views, videos, channels and monthly activity tables.");
    println!();
    println!("USAGE:");
    println!("    watch_history <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Parse an export and write the tables (main command)");
    println!("    inspect     Parse an export and print a summary without writing");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process a Takeout archive into Parquet files in the download folder:");
    println!("    watch_history process ~/Downloads/takeout-20240101T000000Z-001.zip");
    println!();
    println!("    # Write CSV files elsewhere, reading HTML times as US Eastern:");
    println!("    watch_history process watch-history.html -o ./tables --format csv \\");
    println!("                          --timezone America/New_York");
    println!();
    println!("    # Show the ten most watched channels and videos:");
    println!("    watch_history inspect watch-history.json --top 10");
    println!();
    println!("For detailed help on any command, use:");
    println!("    watch_history <COMMAND> --help");
}
