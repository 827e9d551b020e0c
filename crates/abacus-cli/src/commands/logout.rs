//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(app: &App, _args: LogoutArgs) -> Result<()> {
    let was_signed_in = app.client().state().is_authenticated();

    app.auth()
        .logout()
        .await
        .context("Failed to clear stored credentials")?;

    if was_signed_in {
        output::success("Logged out");
    } else {
        output::status("No active session.");
    }

    Ok(())
}
