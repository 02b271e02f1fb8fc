//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the coloring selector (`Statistic`) and year window (`YearRange`)
//! - raw daily observations (`DailyRecord`) and their bucket key (`MonthKey`)
//! - the resolved run configuration (`GridConfig`)

pub mod types;

pub use types::*;
