//! Subcommand implementations.

pub mod calc;
pub mod credits;
pub mod login;
pub mod logout;
pub mod operations;
pub mod records;
pub mod signup;
pub mod whoami;

use anyhow::Result;

use crate::app::App;
use crate::cli::Commands;

pub async fn handle(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(app, args).await,
        Commands::Signup(args) => signup::run(app, args).await,
        Commands::Logout(args) => logout::run(app, args).await,
        Commands::Whoami(args) => whoami::run(app, args).await,
        Commands::Credits(cmd) => credits::handle(app, cmd).await,
        Commands::Calc(args) => calc::run(app, args).await,
        Commands::Records(cmd) => records::handle(app, cmd).await,
        Commands::Operations(args) => operations::run(app, args).await,
    }
}
