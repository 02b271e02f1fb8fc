//! Shared domain types.
//!
//! These types are intentionally small and plain so they can be:
//!
//! - built by the loader and consumed by the aggregator
//! - borrowed read-only by figure composition
//! - serialized into the optional JSON summary export

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Short month labels, indexed by `month - 1`.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Which monthly statistic drives cell coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    /// Color by the highest daily maximum of the month.
    Max,
    /// Color by the lowest daily minimum of the month.
    Min,
}

impl Statistic {
    pub const ALL: [Statistic; 2] = [Statistic::Max, Statistic::Min];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Max => "max",
            Statistic::Min => "min",
        }
    }

    /// Human-readable label for titles and reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Statistic::Max => "Monthly max",
            Statistic::Min => "Monthly min",
        }
    }
}

/// Inclusive calendar-year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const DEFAULT: YearRange = YearRange {
        start: 2008,
        end: 2017,
    };

    /// Widest window the grid will lay out.
    pub const MAX_YEARS: usize = 200;

    /// Build a range, rejecting `start > end` and spans over `MAX_YEARS`.
    pub fn new(start: i32, end: i32) -> Option<Self> {
        let span = end.checked_sub(start)?;
        (0..Self::MAX_YEARS as i32).contains(&span).then_some(Self { start, end })
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Number of years covered; 0 for an inverted range.
    pub fn len(&self) -> usize {
        let span = i64::from(self.end) - i64::from(self.start) + 1;
        usize::try_from(span).unwrap_or(0)
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A (year, month) bucket key. Ordered by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// Calendar month, 1..=12.
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month_label(&self) -> &'static str {
        MONTH_LABELS
            .get(self.month.wrapping_sub(1) as usize)
            .copied()
            .unwrap_or("???")
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_label(), self.year)
    }
}

/// One raw input row.
///
/// Temperatures are optional: an empty or non-numeric CSV field becomes `None`
/// and must never be replaced by a sentinel value.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
}

impl DailyRecord {
    pub fn key(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags and environment (plus defaults).
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub csv_path: PathBuf,
    pub output_path: PathBuf,
    pub statistic: Statistic,
    pub years: YearRange,
    /// Location name used in the figure title.
    pub location: String,
    /// Launch the default viewer after a successful write.
    pub open_viewer: bool,
    pub export_json: Option<PathBuf>,

    /// Cell size in pixels.
    pub cell_width: u32,
    pub cell_height: u32,
}
