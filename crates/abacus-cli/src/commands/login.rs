//! Login command implementation.

use anyhow::Result;
use clap::Args;

use abacus_core::Credentials;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "ABACUS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(app: &App, args: LoginArgs) -> Result<()> {
    let credentials = Credentials::new(&args.username, &args.password);

    output::status("Logging in...");
    app.auth().login(&credentials).await?;

    output::success("Logged in successfully");
    println!();
    let username = app.client().state().username();
    output::session(username.as_deref(), app.client().http().base().as_str());

    Ok(())
}
