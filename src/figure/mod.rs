//! Figure composition: from a sparse `Grid` to a fully laid-out `Figure`.
//!
//! Composition is pure data. It decides *what* goes where (cell rectangles,
//! fill colors, trace points, per-cell y-ranges); `crate::render` decides *how*
//! it is drawn. Keeping the two apart lets us test layout and coloring without
//! parsing SVG.
//!
//! Two passes:
//! 1. fit the color scale over the whole grid
//! 2. walk every `(year, month)` position, substituting an empty bucket where
//!    the grid has none
//!
//! `compose_figure_set` repeats this once per statistic so the document can
//! switch between a max-colored and a min-colored grid.

pub mod color;
pub mod layout;

pub use color::{ColorScale, Rgb};
pub use layout::{GridLayout, Rect};

use crate::aggregate::{Grid, MonthBucket};
use crate::domain::{DailyRecord, MONTH_LABELS, MonthKey, Statistic, YearRange};

/// Which daily series a trace shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    DailyMax,
    DailyMin,
}

impl TraceKind {
    /// Max is drawn warm, min is drawn cool.
    pub fn color(self) -> Rgb {
        match self {
            TraceKind::DailyMax => Rgb(178, 24, 43),
            TraceKind::DailyMin => Rgb(33, 102, 172),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TraceKind::DailyMax => "Daily max",
            TraceKind::DailyMin => "Daily min",
        }
    }
}

/// One plotted value: day of month on x, temperature on y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub day: u32,
    pub value: f64,
}

/// A daily line trace inside a cell. Only days with a present value appear.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub kind: TraceKind,
    pub points: Vec<TracePoint>,
}

impl Trace {
    fn from_bucket(bucket: &MonthBucket, kind: TraceKind) -> Self {
        let points = bucket
            .days
            .iter()
            .filter_map(|d| {
                let value = match kind {
                    TraceKind::DailyMax => d.temp_max,
                    TraceKind::DailyMin => d.temp_min,
                }?;
                Some(TracePoint { day: d.day(), value })
            })
            .collect();
        Self { kind, points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Runs of consecutive days. A missing day starts a new run so the line
    /// never bridges a gap.
    pub fn segments(&self) -> Vec<&[TracePoint]> {
        self.points
            .chunk_by(|a, b| b.day == a.day + 1)
            .collect()
    }

    fn extent(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|p| p.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// One subplot of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureCell {
    pub key: MonthKey,
    pub column: u32,
    pub row: u32,
    pub rect: Rect,
    /// The selected statistic for this month (drives `fill`).
    pub value: Option<f64>,
    pub fill: Rgb,
    pub monthly_max: Option<f64>,
    pub monthly_min: Option<f64>,
    /// The month's daily records, date ascending (hover detail per day).
    pub days: Vec<DailyRecord>,
    pub max_trace: Trace,
    pub min_trace: Trace,
    /// Shared y-range for both traces; `None` when neither has points.
    pub y_range: Option<(f64, f64)>,
}

impl FigureCell {
    pub fn traces(&self) -> [&Trace; 2] {
        [&self.max_trace, &self.min_trace]
    }
}

/// Presentation knobs for composition.
#[derive(Debug, Clone)]
pub struct FigureOptions {
    pub title: String,
    pub cell_width: u32,
    pub cell_height: u32,
}

/// The composed, write-once figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub statistic: Statistic,
    pub years: YearRange,
    pub layout: GridLayout,
    /// `None` when no month has a value for the statistic.
    pub scale: Option<ColorScale>,
    /// Row-major: January's cells first, years ascending within a row.
    pub cells: Vec<FigureCell>,
}

impl Figure {
    pub fn cell(&self, key: MonthKey) -> Option<&FigureCell> {
        let column = self.layout.column_of(key.year)?;
        let row = self.layout.row_of(key.month)?;
        self.cells.get((row * self.layout.columns() + column) as usize)
    }

    /// Year labels, left to right.
    pub fn column_labels(&self) -> Vec<String> {
        self.years.years().map(|y| y.to_string()).collect()
    }

    /// Month labels, top to bottom.
    pub fn row_labels(&self) -> [&'static str; 12] {
        MONTH_LABELS
    }
}

/// One figure per statistic over the same grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureSet {
    /// Shown when the document opens.
    pub selected: Statistic,
    pub max: Figure,
    pub min: Figure,
}

impl FigureSet {
    pub fn get(&self, statistic: Statistic) -> &Figure {
        match statistic {
            Statistic::Max => &self.max,
            Statistic::Min => &self.min,
        }
    }

    pub fn selected_figure(&self) -> &Figure {
        self.get(self.selected)
    }

    /// Figures in `Statistic::ALL` order.
    pub fn figures(&self) -> [&Figure; 2] {
        Statistic::ALL.map(|stat| self.get(stat))
    }
}

/// Compose both the max- and min-colored figures; `options` supplies the
/// per-statistic title and cell size.
pub fn compose_figure_set(
    grid: &Grid,
    selected: Statistic,
    options: impl Fn(Statistic) -> FigureOptions,
) -> FigureSet {
    FigureSet {
        selected,
        max: compose_figure(grid, Statistic::Max, &options(Statistic::Max)),
        min: compose_figure(grid, Statistic::Min, &options(Statistic::Min)),
    }
}

/// Compose the figure for `grid`, coloring cells by `statistic`.
pub fn compose_figure(grid: &Grid, statistic: Statistic, options: &FigureOptions) -> Figure {
    let years = grid.years();
    let layout = GridLayout::new(years, options.cell_width, options.cell_height);

    // Pass 1: global scale.
    let scale = ColorScale::from_grid(grid, statistic);

    // Pass 2: every position, populated or not.
    let cells = grid
        .positions()
        .map(|key| {
            let bucket = grid.bucket_or_empty(key);
            compose_cell(&layout, &bucket, statistic, scale.as_ref())
        })
        .collect();

    Figure {
        title: options.title.clone(),
        statistic,
        years,
        layout,
        scale,
        cells,
    }
}

fn compose_cell(
    layout: &GridLayout,
    bucket: &MonthBucket,
    statistic: Statistic,
    scale: Option<&ColorScale>,
) -> FigureCell {
    let key = bucket.key;
    // Positions come from the grid's own year window, so both lookups succeed.
    let column = layout.column_of(key.year).unwrap_or(0);
    let row = layout.row_of(key.month).unwrap_or(0);
    let value = bucket.statistic(statistic);

    let max_trace = Trace::from_bucket(bucket, TraceKind::DailyMax);
    let min_trace = Trace::from_bucket(bucket, TraceKind::DailyMin);
    let y_range = merge_extents(max_trace.extent(), min_trace.extent()).map(pad_range);

    FigureCell {
        key,
        column,
        row,
        rect: layout.cell_rect(column, row),
        value,
        fill: color::cell_fill(scale, value),
        monthly_max: bucket.monthly_max,
        monthly_min: bucket.monthly_min,
        days: bucket.days.clone(),
        max_trace,
        min_trace,
        y_range,
    }
}

fn merge_extents(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
        (one, None) | (None, one) => one,
    }
}

fn pad_range((min, max): (f64, f64)) -> (f64, f64) {
    let pad = ((max - min).abs() * 0.08).max(0.5);
    (min - pad, max + pad)
}
