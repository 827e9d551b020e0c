//! Core validated types.
//!
//! These types enforce their invariants at construction time,
//! so an invalid value cannot reach the network layer.

mod api_url;

pub use api_url::{ApiUrl, DEFAULT_API_URL};
