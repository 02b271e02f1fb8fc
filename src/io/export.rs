//! Output writers.
//!
//! - the HTML document, written atomically (temp sibling + rename)
//! - an optional JSON summary of the monthly buckets, for downstream scripts

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::aggregate::Grid;
use crate::domain::{GridConfig, Statistic, YearRange};
use crate::error::AppError;

/// Write `contents` to `path` so that readers see either the old file or the
/// complete new one, never a partial write.
pub fn write_document_atomic(path: &Path, contents: &str) -> Result<(), AppError> {
    let tmp_path = temp_sibling(path);

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(AppError::output(format!(
            "Failed to write '{}': {e}",
            path.display()
        )));
    }

    info!(bytes = contents.len(), "wrote {}", path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Serializable monthly summary (one entry per populated bucket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSummary {
    pub tool: String,
    pub location: String,
    pub statistic: Statistic,
    pub years: YearRange,
    /// Global `[min, max]` of the selected statistic; `null` when absent.
    pub color_range: Option<[f64; 2]>,
    pub months: Vec<MonthSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub days: usize,
    pub monthly_max: Option<f64>,
    pub monthly_min: Option<f64>,
}

impl GridSummary {
    pub fn from_grid(grid: &Grid, config: &GridConfig) -> Self {
        Self {
            tool: "heatgrid".to_string(),
            location: config.location.clone(),
            statistic: config.statistic,
            years: grid.years(),
            color_range: grid
                .statistic_range(config.statistic)
                .map(|(lo, hi)| [lo, hi]),
            months: grid
                .buckets()
                .map(|b| MonthSummary {
                    year: b.key.year,
                    month: b.key.month,
                    days: b.days.len(),
                    monthly_max: b.monthly_max,
                    monthly_min: b.monthly_min,
                })
                .collect(),
        }
    }
}

/// Write the monthly summary JSON.
pub fn write_summary_json(path: &Path, grid: &Grid, config: &GridConfig) -> Result<(), AppError> {
    let summary = GridSummary::from_grid(grid, config);
    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| AppError::output(format!("Failed to serialize summary JSON: {e}")))?;
    write_document_atomic(path, &json)
}

/// Read a summary JSON written by `write_summary_json`.
pub fn read_summary_json(path: &Path) -> Result<GridSummary, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open summary JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid summary JSON: {e}")))
}
