//! Terminal rendering for abacus commands.
//!
//! Command results go to stdout so they can be piped. Status lines and
//! the records footer go to stderr.

use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use serde::Serialize;

use abacus_http::OperationRecord;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Status or progress line on stderr.
pub fn status(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print the signed-in account and where it talks to.
pub fn session(username: Option<&str>, api: &str) {
    if let Some(username) = username {
        field("Username", username);
    }
    field("API", api);
}

pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

pub fn balance(credits: f64) {
    field("Credits", &credits.to_string());
}

/// One record per line, compact JSON for `--json` consumers.
pub fn json_line<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

pub fn record_line(record: &OperationRecord) {
    println!(
        "{:>6}  {}  {:<15} cost {:<6} balance {:<8} => {}",
        record.id,
        local_date(&record.date),
        record.operation_name,
        record.amount,
        record.user_balance,
        record.operation_response
    );
}

/// "Showing a-b of n" under a records listing.
pub fn page_footer(offset: u32, shown: usize, total: u64) {
    let (first, last) = page_range(offset, shown);
    eprintln!();
    eprintln!(
        "{}",
        format!("Showing {}-{} of {}", first, last, total).dimmed()
    );
}

/// One-based inclusive range covered by a page. Widened so the largest
/// `--offset` does not overflow.
fn page_range(offset: u32, shown: usize) -> (u64, u64) {
    let offset = u64::from(offset);
    (offset + 1, offset + shown as u64)
}

/// Render an RFC 3339 timestamp in local time, or pass it through unchanged.
fn local_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => date.to_string(),
    }
}
