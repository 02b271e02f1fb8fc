//! CSV ingest and normalization.
//!
//! This module is responsible for turning a daily temperature CSV into a
//! clean, in-range list of `DailyRecord`s ready for aggregation.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level recovery** (drop rows with bad dates, keep rows with bad temperatures)
//! - **Deterministic behavior** (same file in, same records out)
//! - **Separation of concerns**: no grouping or statistics here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{DailyRecord, YearRange};
use crate::error::AppError;

pub const COL_DATE: &str = "date";
pub const COL_MAX: &str = "max_temperature";
pub const COL_MIN: &str = "min_temperature";

const REQUIRED_COLUMNS: [&str; 3] = [COL_DATE, COL_MAX, COL_MIN];
const MAX_LOGGED_ROW_ERRORS: usize = 5;

/// Summary stats about the records that survived ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_records: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    /// Rows kept with an absent daily max.
    pub absent_max: usize,
    /// Rows kept with an absent daily min.
    pub absent_min: usize,
}

/// A row-level error encountered during ingest. The row was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: in-range records + stats + dropped-row diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<DailyRecord>,
    /// `None` when no row fell inside the year range.
    pub stats: Option<DatasetStats>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_out_of_range: usize,
}

/// Load daily records from `path`, keeping only rows whose year is in `years`.
pub fn load_daily_records(path: &Path, years: YearRange) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::no_data(format!(
            "Input CSV '{}' is empty.",
            path.display()
        )));
    }

    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_out_of_range = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok(row) if years.contains(row.date.year()) => records.push(row),
            Ok(_) => rows_out_of_range += 1,
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if rows_read == 0 {
        return Err(AppError::no_data(format!(
            "Input CSV '{}' has a header but no data rows.",
            path.display()
        )));
    }

    let rows_used = records.len();
    let stats = compute_stats(&records);

    info!(
        rows_read,
        rows_used,
        rows_out_of_range,
        rows_dropped = row_errors.len(),
        "loaded daily records from {}",
        path.display()
    );
    for err in row_errors.iter().take(MAX_LOGGED_ROW_ERRORS) {
        warn!(line = err.line, "dropped row: {}", err.message);
    }
    if row_errors.len() > MAX_LOGGED_ROW_ERRORS {
        debug!("{} more dropped rows not shown", row_errors.len() - MAX_LOGGED_ROW_ERRORS);
    }

    Ok(IngestedData {
        records,
        stats,
        row_errors,
        rows_read,
        rows_used,
        rows_out_of_range,
    })
}

/// Column indices for the required fields.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    max: usize,
    min: usize,
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        let list = missing
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AppError::input(format!("Missing required column(s): {list}")));
    }

    Ok(Columns {
        date: header_map[COL_DATE],
        max: header_map[COL_MAX],
        min: header_map[COL_MIN],
    })
}

fn parse_row(record: &StringRecord, columns: &Columns) -> Result<DailyRecord, String> {
    let raw_date = get_field(record, columns.date).ok_or_else(|| "Missing `date` value.".to_string())?;
    let date = parse_date(raw_date)?;

    Ok(DailyRecord {
        date,
        temp_max: parse_opt_f64(get_field(record, columns.max)),
        temp_min: parse_opt_f64(get_field(record, columns.min)),
    })
}

fn get_field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO dates are the norm, but daily exports also show up with slashes,
    // day-first ordering, or a trailing time of day.
    const DATE_FMTS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    const DATETIME_FMTS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY, DD-MM-YYYY."
    ))
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

fn compute_stats(records: &[DailyRecord]) -> Option<DatasetStats> {
    let first_date = records.iter().map(|r| r.date).min()?;
    let last_date = records.iter().map(|r| r.date).max()?;

    Some(DatasetStats {
        n_records: records.len(),
        first_date,
        last_date,
        absent_max: records.iter().filter(|r| r.temp_max.is_none()).count(),
        absent_min: records.iter().filter(|r| r.temp_min.is_none()).count(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_max_field_keeps_row_with_absent_value() {
        let file = csv_file("date,max_temperature,min_temperature\n2010-01-15,,18.0\n");
        let data = load_daily_records(file.path(), YearRange::DEFAULT).unwrap();

        assert_eq!(data.rows_used, 1);
        assert_eq!(
            data.records[0],
            DailyRecord {
                date: ymd(2010, 1, 15),
                temp_max: None,
                temp_min: Some(18.0),
            }
        );
        assert_eq!(data.stats.unwrap().absent_max, 1);
    }

    #[test]
    fn bad_dates_are_dropped_and_reported() {
        let file = csv_file(
            "date,max_temperature,min_temperature\n\
             2015-07-04,33.2,27.1\n\
             not-a-date,30.0,25.0\n\
             ,30.0,25.0\n\
             2015-07-05,n/a,26.0\n",
        );
        let data = load_daily_records(file.path(), YearRange::DEFAULT).unwrap();

        assert_eq!(data.rows_read, 4);
        assert_eq!(data.rows_used, 2);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 3);
        assert_eq!(data.row_errors[1].line, 4);
        assert_eq!(data.records[1].temp_max, None);
        assert_eq!(data.records[1].temp_min, Some(26.0));
    }

    #[test]
    fn rows_outside_year_range_are_excluded_silently() {
        let file = csv_file(
            "date,max_temperature,min_temperature\n\
             2007-12-31,20.0,15.0\n\
             2008-01-01,19.0,14.0\n\
             2017-12-31,21.0,16.0\n\
             2018-01-01,22.0,17.0\n",
        );
        let data = load_daily_records(file.path(), YearRange::DEFAULT).unwrap();

        assert_eq!(data.rows_used, 2);
        assert_eq!(data.rows_out_of_range, 2);
        assert!(data.row_errors.is_empty());
        let stats = data.stats.unwrap();
        assert_eq!(stats.first_date, ymd(2008, 1, 1));
        assert_eq!(stats.last_date, ymd(2017, 12, 31));
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let file = csv_file(
            "\u{feff}Date, Station ,MAX_TEMPERATURE,Min_Temperature\n2012-03-01,HKO,22.5,17.25\n",
        );
        let data = load_daily_records(file.path(), YearRange::DEFAULT).unwrap();
        assert_eq!(data.records[0].temp_max, Some(22.5));
        assert_eq!(data.records[0].temp_min, Some(17.25));
    }

    #[test]
    fn alternative_date_formats_parse() {
        assert_eq!(parse_date("2015/07/04").unwrap(), ymd(2015, 7, 4));
        assert_eq!(parse_date("04/07/2015").unwrap(), ymd(2015, 7, 4));
        assert_eq!(parse_date("2015-07-04 00:00:00").unwrap(), ymd(2015, 7, 4));
        assert!(parse_date("2015-13-01").is_err());
    }

    #[test]
    fn non_finite_temperatures_are_absent() {
        assert_eq!(parse_opt_f64(Some("NaN")), None);
        assert_eq!(parse_opt_f64(Some("inf")), None);
        assert_eq!(parse_opt_f64(Some("-3.5")), Some(-3.5));
        assert_eq!(parse_opt_f64(None), None);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let file = csv_file("date,max_temperature\n2015-07-04,33.2\n");
        let err = load_daily_records(file.path(), YearRange::DEFAULT).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("`min_temperature`"));
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_daily_records(&dir.path().join("nope.csv"), YearRange::DEFAULT).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_sources_are_fatal() {
        let empty = csv_file("");
        assert_eq!(
            load_daily_records(empty.path(), YearRange::DEFAULT)
                .unwrap_err()
                .exit_code(),
            3
        );

        let header_only = csv_file("date,max_temperature,min_temperature\n");
        assert_eq!(
            load_daily_records(header_only.path(), YearRange::DEFAULT)
                .unwrap_err()
                .exit_code(),
            3
        );
    }

    #[test]
    fn loading_is_idempotent() {
        let file = csv_file(
            "date,max_temperature,min_temperature\n2009-05-02,28.0,22.0\n2009-05-01,27.0,21.0\n",
        );
        let a = load_daily_records(file.path(), YearRange::DEFAULT).unwrap();
        let b = load_daily_records(file.path(), YearRange::DEFAULT).unwrap();
        assert_eq!(a.records, b.records);
    }
}
