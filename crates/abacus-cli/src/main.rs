//! abacus - command-line client for the calculator service.
//!
//! A thin wrapper over `abacus-http`. Credentials persist between runs in a
//! file store, so `login` once and then call the service.

mod app;
mod cli;
mod commands;
mod host;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::App;
use cli::Cli;

/// Exit status when the session expired during the command.
const EXIT_SESSION_EXPIRED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let app = match App::from_cli(&cli) {
        Ok(app) => app,
        Err(err) => {
            output::error(&format!("{err:#}"));
            return ExitCode::FAILURE;
        }
    };

    match commands::handle(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) if app.host().session_expired() => ExitCode::from(EXIT_SESSION_EXPIRED),
        Err(err) => {
            output::error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
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
