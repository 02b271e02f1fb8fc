//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - aggregation and figure code stay free of presentation details
//! - output changes are localized (the table tests below are golden strings)

use crate::aggregate::Grid;
use crate::domain::{GridConfig, MONTH_LABELS, MonthKey, Statistic};
use crate::io::ingest::IngestedData;

/// Format the run summary (ingest counts + grid coverage + color range).
pub fn format_run_summary(ingest: &IngestedData, grid: &Grid, config: &GridConfig) -> String {
    let mut out = String::new();
    let years = grid.years();

    out.push_str("=== heatgrid - daily temperature grid ===\n");
    out.push_str(&format!("Location: {}\n", config.location));
    out.push_str(&format!("Input: {}\n", config.csv_path.display()));
    out.push_str(&format!("Years: {}..={}\n", years.start, years.end));
    out.push_str(&format!(
        "Rows: read={} | used={} | out_of_range={} | dropped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.rows_out_of_range,
        ingest.row_errors.len()
    ));

    match &ingest.stats {
        Some(stats) => out.push_str(&format!(
            "Dates: {} .. {} | absent max={} | absent min={}\n",
            stats.first_date, stats.last_date, stats.absent_max, stats.absent_min
        )),
        None => out.push_str("Dates: none in range\n"),
    }

    out.push_str(&format!(
        "Months: {} of {} populated\n",
        grid.len(),
        grid.position_count()
    ));

    out.push_str(&format!("Coloring: {}", config.statistic.display_name()));
    match grid.statistic_range(config.statistic) {
        Some((lo, hi)) => out.push_str(&format!(" | range=[{lo:.1}, {hi:.1}] °C\n")),
        None => out.push_str(" | range=n/a\n"),
    }

    out
}

/// Format the selected statistic as a month × year table. Absent cells show `-`.
pub fn format_month_table(grid: &Grid, stat: Statistic) -> String {
    let mut out = String::new();
    let years = grid.years();

    out.push_str(&format!("{} (°C):\n", stat.display_name()));

    let mut header = format!("{:<5}", "");
    for year in years.years() {
        header.push_str(&format!(" {year:>6}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for (idx, label) in MONTH_LABELS.iter().enumerate() {
        let month = idx as u32 + 1;
        let mut line = format!("{label:<5}");
        for year in years.years() {
            let cell = grid
                .get(MonthKey::new(year, month))
                .and_then(|b| b.statistic(stat))
                .map(|v| format!("{v:.1}"))
                .unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>6}"));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
