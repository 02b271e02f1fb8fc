//! Reporting utilities: run summaries and month tables for the terminal.

pub mod format;

pub use format::{format_month_table, format_run_summary};
