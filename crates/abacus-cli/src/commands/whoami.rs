//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub async fn run(app: &App, _args: WhoamiArgs) -> Result<()> {
    let username = app.require_session()?;

    output::session(Some(&username), app.client().http().base().as_str());
    output::field("Store", &app.store_path().display().to_string());

    Ok(())
}
