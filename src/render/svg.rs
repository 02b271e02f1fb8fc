//! Draw a composed `Figure` with Plotters.
//!
//! The figure is rendered into an in-memory SVG string via Plotters' SVG
//! backend. Drawing code is generic over `DrawingBackend` so the same routines
//! could target a bitmap later; only `render_svg` picks the backend.
//!
//! Draw order per cell: background fill, then the daily min/max traces on a
//! small cartesian chart (x = day of month, y = the cell's own range).

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::AppError;
use crate::figure::color::ramp;
use crate::figure::layout::{DAY_AXIS, GridLayout, PLOT_MARGIN};
use crate::figure::{ColorScale, Figure, FigureCell, Rgb};

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

const FONT: &str = "sans-serif";
const COLORBAR_BANDS: u32 = 64;

/// Render the full figure as an SVG document string.
pub fn render_svg(figure: &Figure) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.layout.canvas_size()).into_drawing_area();
        draw_figure(&root, figure).map_err(|e| AppError::output(format!("Failed to draw figure: {e}")))?;
        root.present()
            .map_err(|e| AppError::output(format!("Failed to finish SVG output: {e}")))?;
    }
    Ok(svg)
}

/// Draw title, axis labels, every cell, and the color bar onto `root`.
pub fn draw_figure<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> DrawResult<DB> {
    root.fill(&WHITE)?;

    let layout = &figure.layout;
    root.draw_text(&figure.title, &centered(18), layout.title_anchor())?;

    for (col, label) in figure.column_labels().iter().enumerate() {
        root.draw_text(label, &centered(12), layout.column_label_anchor(col as u32))?;
    }
    for (row, label) in figure.row_labels().iter().enumerate() {
        root.draw_text(label, &centered(12), layout.row_label_anchor(row as u32))?;
    }

    for cell in &figure.cells {
        draw_cell(root, cell)?;
    }

    if let Some(scale) = &figure.scale {
        draw_colorbar(root, layout, scale)?;
    }

    Ok(())
}

fn draw_cell<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, cell: &FigureCell) -> DrawResult<DB> {
    let r = cell.rect;
    root.draw(&Rectangle::new(
        [(r.x, r.y), (r.right(), r.bottom())],
        plotters_color(cell.fill).filled(),
    ))?;

    let Some((y0, y1)) = cell.y_range else {
        return Ok(());
    };

    let area = root
        .clone()
        .shrink((r.x, r.y), (r.width as i32, r.height as i32));
    let mut chart = ChartBuilder::on(&area)
        .margin(PLOT_MARGIN)
        .build_cartesian_2d(DAY_AXIS, y0..y1)?;

    for trace in cell.traces().into_iter().filter(|t| !t.is_empty()) {
        let color = plotters_color(trace.kind.color());
        for segment in trace.segments() {
            match segment {
                // A lone day has no line to draw; mark it instead.
                [only] => {
                    chart.draw_series(std::iter::once(Circle::new(
                        (only.day as f64, only.value),
                        2,
                        color.filled(),
                    )))?;
                }
                _ => {
                    chart.draw_series(LineSeries::new(
                        segment.iter().map(|p| (p.day as f64, p.value)),
                        color.stroke_width(1),
                    ))?;
                }
            }
        }
    }

    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &GridLayout,
    scale: &ColorScale,
) -> DrawResult<DB> {
    let bar = layout.colorbar_rect();
    let h = bar.height as i32;
    let n = COLORBAR_BANDS as i32;

    // Highest value on top.
    for i in 0..n {
        let top = bar.y + i * h / n;
        let bottom = bar.y + (i + 1) * h / n;
        let t = 1.0 - (i as f64 + 0.5) / n as f64;
        root.draw(&Rectangle::new(
            [(bar.x, top), (bar.right(), bottom)],
            plotters_color(ramp(t)).filled(),
        ))?;
    }
    root.draw(&Rectangle::new(
        [(bar.x, bar.y), (bar.right(), bar.bottom())],
        BLACK.stroke_width(1),
    ))?;

    let label_x = bar.right() + 6;
    let ticks = [
        (scale.max, bar.y),
        ((scale.min + scale.max) / 2.0, bar.center().1),
        (scale.min, bar.bottom()),
    ];
    let tick_style = TextStyle::from((FONT, 11).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (value, y) in ticks {
        root.draw_text(&format!("{value:.1}"), &tick_style, (label_x, y))?;
    }

    root.draw_text("°C", &centered(12), (bar.center().0, bar.y - 12))?;

    Ok(())
}

fn centered(size: u32) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

fn plotters_color(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}
