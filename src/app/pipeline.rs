//! Shared pipeline logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> monthly aggregation -> figure composition -> HTML document
//!
//! Nothing here touches the output path or the viewer; `app` decides what to
//! do with the results.

use tracing::{info, warn};

use crate::aggregate::{Grid, aggregate};
use crate::domain::{GridConfig, Statistic};
use crate::error::AppError;
use crate::figure::{FigureOptions, FigureSet, compose_figure_set};
use crate::io::ingest::{IngestedData, load_daily_records};

/// Ingest diagnostics + the aggregated grid.
#[derive(Debug, Clone)]
pub struct GridRun {
    pub ingest: IngestedData,
    pub grid: Grid,
}

/// All computed outputs of a `heatgrid render` run.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub run: GridRun,
    pub figures: FigureSet,
    pub document: String,
}

/// Load the CSV and aggregate it into the monthly grid.
pub fn build_grid(config: &GridConfig) -> Result<GridRun, AppError> {
    let mut ingest = load_daily_records(&config.csv_path, config.years)?;
    // The grid takes ownership of the records; ingest keeps only counts and stats.
    let grid = aggregate(std::mem::take(&mut ingest.records), config.years);
    info!(
        populated = grid.len(),
        positions = grid.position_count(),
        "built monthly grid"
    );
    if grid.is_empty() {
        warn!(
            "no rows fall inside {}..={}; every cell will be blank",
            config.years.start, config.years.end
        );
    }
    Ok(GridRun { ingest, grid })
}

/// Execute the full pipeline and return the rendered document.
pub fn run_render(config: &GridConfig) -> Result<RenderOutput, AppError> {
    let run = build_grid(config)?;

    let figures = compose_figure_set(&run.grid, config.statistic, |statistic| FigureOptions {
        title: figure_title(config, statistic),
        cell_width: config.cell_width,
        cell_height: config.cell_height,
    });
    let document = crate::render::render_document(&figures)?;

    Ok(RenderOutput {
        run,
        figures,
        document,
    })
}

pub fn figure_title(config: &GridConfig, statistic: Statistic) -> String {
    format!(
        "{} temperatures {}–{} · monthly {}",
        config.location,
        config.years.start,
        config.years.end,
        statistic.label()
    )
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::domain::{MonthKey, YearRange};
    use crate::figure::color::NEUTRAL;

    fn config(dir: &Path, stat: Statistic) -> GridConfig {
        GridConfig {
            csv_path: dir.join("temperature_daily.csv"),
            output_path: dir.join("grid.html"),
            statistic: stat,
            years: YearRange::DEFAULT,
            location: "Hong Kong".to_string(),
            open_viewer: false,
            export_json: None,
            cell_width: 84,
            cell_height: 52,
        }
    }

    const CSV: &str = "date,max_temperature,min_temperature\n\
        2007-06-30,31.0,26.0\n\
        2015-07-04,33.2,27.1\n\
        2010-01-15,,18.0\n\
        2010-01-16,20.5,17.0\n\
        garbage,1,2\n\
        2018-01-01,15.0,10.0\n";

    #[test]
    fn end_to_end_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), Statistic::Max);
        fs::write(&cfg.csv_path, CSV).unwrap();

        let out = run_render(&cfg).unwrap();

        assert_eq!(out.run.ingest.rows_read, 6);
        assert_eq!(out.run.ingest.rows_used, 3);
        assert_eq!(out.run.ingest.row_errors.len(), 1);
        assert_eq!(out.run.grid.len(), 2);
        let figure = out.figures.selected_figure();
        assert_eq!(figure.statistic, Statistic::Max);
        assert_eq!(figure.cells.len(), 120);

        let july = figure.cell(MonthKey::new(2015, 7)).unwrap();
        assert_eq!(july.value, Some(33.2));
        assert_eq!(july.max_trace.points.len(), 1);
        assert_eq!(july.min_trace.points.len(), 1);

        let feb = figure.cell(MonthKey::new(2012, 2)).unwrap();
        assert_eq!(feb.fill, NEUTRAL);
        assert!(feb.max_trace.is_empty() && feb.min_trace.is_empty());

        let jan = out.run.grid.get(MonthKey::new(2010, 1)).unwrap();
        assert_eq!(jan.monthly_max, Some(20.5));
        assert_eq!(jan.monthly_min, Some(17.0));

        // Nothing outside 2008..=2017 made it into a bucket.
        assert!(out.run.grid.buckets().all(|b| (2008..=2017).contains(&b.key.year)));

        assert!(out.document.contains("<title>Hong Kong temperatures 2008–2017 · monthly max</title>"));
        assert_eq!(
            out.figures.min.title,
            "Hong Kong temperatures 2008–2017 · monthly min"
        );
    }

    #[test]
    fn reruns_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), Statistic::Min);
        fs::write(&cfg.csv_path, CSV).unwrap();

        let a = run_render(&cfg).unwrap().document;
        let b = run_render(&cfg).unwrap().document;
        assert_eq!(a, b);
    }

    #[test]
    fn missing_input_fails_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), Statistic::Max);
        let err = run_render(&cfg).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
