//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{calc, credits, login, logout, operations, records, signup, whoami};

/// Command-line client for the abacus calculator service.
#[derive(Parser, Debug)]
#[command(name = "abacus")]
#[command(author, version = env!("ABACUS_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Base URL of the calculator API
    #[arg(long, global = true, env = "ABACUS_API_URL")]
    pub api_url: Option<String>,

    /// Credential file (defaults to the platform data directory)
    #[arg(long, global = true, env = "ABACUS_STORE")]
    pub store: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Share one token refresh between concurrent failing calls
    #[arg(long, global = true)]
    pub single_flight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Create an account and store the session
    Signup(signup::SignupArgs),

    /// End the session and forget stored credentials
    Logout(logout::LogoutArgs),

    /// Display the active session
    Whoami(whoami::WhoamiArgs),

    /// Show or change the credit balance
    Credits(credits::CreditsCommand),

    /// Run a calculator operation
    Calc(calc::CalcArgs),

    /// Browse or delete operation history
    Records(records::RecordsCommand),

    /// List the operations the service offers
    Operations(operations::OperationsArgs),
}
