//! Calculator operation command.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use abacus_http::{Operation, OperationKind};

use crate::app::App;

#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Operation name (addition, subtraction, multiplication, division,
    /// square_root, random_string)
    pub operation: String,

    /// Numeric operands
    #[arg(allow_negative_numbers = true, num_args = 0..=2)]
    pub operands: Vec<f64>,
}

pub async fn run(app: &App, args: CalcArgs) -> Result<()> {
    let kind: OperationKind = args.operation.parse()?;
    let operation = Operation::new(kind, &args.operands)?;

    app.require_session()?;

    let result = app
        .calculator()
        .perform_operation(operation)
        .await
        .with_context(|| format!("Failed to run {}", kind))?;

    println!("{}", render(&result));

    Ok(())
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
