// SPDX-FileCopyrightText: 2026 Threadline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Threadline - SMS conversation correlation.
//!
//! This is the binary entry point for the operator CLI.

mod app;
mod commands;
mod hooks;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use threadline_config::ThreadlineConfig;
use threadline_core::ThreadlineError;

use crate::app::App;

/// Threadline - correlates inbound SMS with ongoing conversations.
#[derive(Parser, Debug)]
#[command(name = "threadline", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Correlate one inbound message and record the result.
    Route {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        body: String,
        /// Print the result without recording it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Allocate response tokens without recording them.
    Allocate {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Show the conversation a response token belongs to.
    Lookup {
        /// Token, with or without the leading `@`.
        token: String,
    },
    /// Register a known person and the numbers they text from.
    Person {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long = "number", required = true)]
        numbers: Vec<String>,
    },
    /// Validate and print the effective configuration.
    Config,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("threadline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> ThreadlineConfig {
    let loaded = match path {
        Some(path) => threadline_config::load_and_validate_path(path),
        None => threadline_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            threadline_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli, config: ThreadlineConfig) -> Result<(), ThreadlineError> {
    if let Commands::Config = cli.command {
        return commands::run_config(&config);
    }

    threadline_router::recording::register_metrics();
    let app = App::open(&config).await?;
    let outcome = match cli.command {
        Commands::Route {
            from,
            to,
            body,
            dry_run,
        } => commands::run_route(&app, &from, &to, &body, dry_run)
            .await
            .map(|_| ()),
        Commands::Allocate { count } => commands::run_allocate(&app, count).await.map(|_| ()),
        Commands::Lookup { token } => commands::run_lookup(&app, &config, &token)
            .await
            .map(|_| ()),
        Commands::Person { id, name, numbers } => {
            commands::run_person(&app, &id, &name, &numbers).await
        }
        Commands::Config => Ok(()),
    };
    app.close().await?;
    outcome
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.engine.log_level);

    if let Err(e) = run(cli, config).await {
        eprintln!("threadline: {e}");
        std::process::exit(1);
    }
}
