//! Credit balance commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct CreditsCommand {
    #[command(subcommand)]
    pub command: CreditsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CreditsSubcommand {
    /// Show the current balance
    Show,

    /// Add credits to the balance
    Add {
        /// Number of credits
        amount: u64,
    },

    /// Remove credits from the balance
    Remove {
        /// Number of credits
        amount: u64,
    },
}

pub async fn handle(app: &App, cmd: CreditsCommand) -> Result<()> {
    app.require_session()?;
    let calculator = app.calculator();

    match cmd.command {
        CreditsSubcommand::Show => {}
        CreditsSubcommand::Add { amount } => {
            calculator
                .add_credits(amount)
                .await
                .context("Failed to add credits")?;
            output::success(&format!("Added {} credits", amount));
        }
        CreditsSubcommand::Remove { amount } => {
            calculator
                .remove_credits(amount)
                .await
                .context("Failed to remove credits")?;
            output::success(&format!("Removed {} credits", amount));
        }
    }

    let balance = calculator
        .credits()
        .await
        .context("Failed to fetch credits")?;
    output::balance(balance);

    Ok(())
}
