//! Command handlers
//!
//! Each handler works against an opened `Storefront` and prints its result.
//! Structured results go to stdout as JSON; logs go to stderr.

pub mod catalog;
pub mod images;
pub mod session;
pub mod settings;

use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
