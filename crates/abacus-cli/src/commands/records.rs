//! Operation history commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use abacus_http::{RecordsQuery, SortDirection};

use crate::app::App;
use crate::output;

#[derive(Args, Debug)]
pub struct RecordsCommand {
    #[command(subcommand)]
    pub command: RecordsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RecordsSubcommand {
    /// List past operations
    List(ListArgs),

    /// Delete a record from the history
    Delete {
        /// Record id
        id: u64,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show this operation
    #[arg(long)]
    pub operation: Option<String>,

    /// Earliest date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Maximum number of records to return
    #[arg(long, default_value_t = 10)]
    pub limit: u32,

    /// Number of records to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Field to sort by
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    pub order_dir: Option<SortDirection>,

    /// Print records as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    fn query(&self) -> RecordsQuery {
        RecordsQuery {
            operation_name: self.operation.clone(),
            start_date: self.from.clone(),
            end_date: self.to.clone(),
            limit: self.limit,
            offset: self.offset,
            order_by: self.order_by.clone(),
            order_dir: self.order_dir,
        }
    }
}

pub async fn handle(app: &App, cmd: RecordsCommand) -> Result<()> {
    app.require_session()?;

    match cmd.command {
        RecordsSubcommand::List(args) => list(app, args).await,
        RecordsSubcommand::Delete { id } => {
            app.calculator()
                .delete_record(id)
                .await
                .with_context(|| format!("Failed to delete record {}", id))?;
            output::success(&format!("Deleted record {}", id));
            Ok(())
        }
    }
}

async fn list(app: &App, args: ListArgs) -> Result<()> {
    let page = app
        .calculator()
        .records(&args.query())
        .await
        .context("Failed to list records")?;

    if page.records.is_empty() {
        output::status("No records found.");
        return Ok(());
    }

    for record in &page.records {
        if args.json {
            output::json_line(record)?;
        } else {
            output::record_line(record);
        }
    }

    output::page_footer(args.offset, page.records.len(), page.total_records);

    Ok(())
}
