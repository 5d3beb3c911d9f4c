//! CLI command implementations
//!
//! Each command receives an already-built [`ApiClient`], so a single process
//! shares one session (and one refresh coordinator) across all of its calls.

pub mod account;
pub mod analysis;

pub use account::{login, users};
pub use analysis::{analyze, batch, history, stats};

use anyhow::Result;
use serde::Serialize;

/// Print a value as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
