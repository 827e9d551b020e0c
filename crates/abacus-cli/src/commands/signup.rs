//! Signup command implementation.

use anyhow::Result;
use clap::Args;

use abacus_core::Credentials;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct SignupArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Password for the new account
    #[arg(long, env = "ABACUS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(app: &App, args: SignupArgs) -> Result<()> {
    let credentials = Credentials::new(&args.username, &args.password);

    output::status("Creating account...");
    app.auth().signup(&credentials).await?;

    output::success("Account created");
    println!();
    if let Some(username) = app.client().state().username() {
        output::field("Username", &username);
    }

    Ok(())
}
