//! marcfix - Validate, repair and roll back catalog records in bulk.
//!
//! Records are fetched from the record API, run through the rule chain,
//! and written back when a rule changed them. Every change is kept in a
//! local backup store so single records or whole runs can be undone.

mod cli;
mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let globals = cli.globals;
    match cli.command {
        Commands::Show(args) => commands::show::run(args, &globals).await,
        Commands::Validate(args) => commands::validate::run(args, &globals).await,
        Commands::Fix(args) => commands::fix::run(args, &globals).await,
        Commands::FixFile(args) => commands::fix_file::run(args).await,
        Commands::FixMultiple(args) => commands::fix_multiple::run(args, &globals).await,
        Commands::Undo(args) => commands::undo::run(args, &globals).await,
        Commands::UndoBatch(args) => commands::undo_batch::run(args, &globals).await,
        Commands::Reset(args) => commands::reset::run(args, &globals).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so command output stays pipeable.
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
