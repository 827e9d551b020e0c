//! List available operations.

use anyhow::{Context, Result};
use clap::Args;

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct OperationsArgs {
    /// Print the raw JSON list
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: &App, args: OperationsArgs) -> Result<()> {
    let operations = app
        .calculator()
        .operations()
        .await
        .context("Failed to list operations")?;

    if args.json {
        return output::json_line(&operations);
    }

    if operations.is_empty() {
        output::status("No operations available.");
        return Ok(());
    }

    for operation in &operations {
        println!("{}", operation.kind);
    }

    Ok(())
}
