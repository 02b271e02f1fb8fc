//! Standalone HTML document around the rendered SVGs.
//!
//! The document has no scripts and no external assets. It holds:
//!
//! - one inline SVG per statistic, switched by hidden radio inputs and the
//!   CSS `:checked` selector (the selected statistic starts checked)
//! - one transparent overlay `<div>` per cell whose `title` attribute gives the
//!   browser's native hover tooltip for the month
//! - inside each cell overlay, one narrow strip per recorded day with that
//!   day's date and daily max/min

use crate::domain::{DailyRecord, Statistic};
use crate::error::AppError;
use crate::figure::layout::GridLayout;
use crate::figure::{FigureCell, FigureSet, TraceKind};
use crate::render::svg::render_svg;

/// Render every figure of `set` into one self-contained HTML document.
pub fn render_document(set: &FigureSet) -> Result<String, AppError> {
    let mut svgs = Vec::with_capacity(Statistic::ALL.len());
    for figure in set.figures() {
        svgs.push((figure.statistic, render_svg(figure)?));
    }
    Ok(wrap_document(set, &svgs))
}

fn wrap_document(set: &FigureSet, svgs: &[(Statistic, String)]) -> String {
    let figure = set.selected_figure();
    let (width, height) = figure.layout.canvas_size();
    let svg_len: usize = svgs.iter().map(|(_, svg)| svg.len()).sum();

    let mut html = String::with_capacity(svg_len + 256 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&figure.title)));
    html.push_str("<style>\n");
    html.push_str("body { font-family: system-ui, sans-serif; margin: 24px; color: #2c3e50; }\n");
    html.push_str(".toggle { display: none; }\n");
    html.push_str(".switch label { display: inline-block; padding: 4px 12px; margin-right: 6px; border: 1px solid #2c3e50; border-radius: 4px; cursor: pointer; }\n");
    html.push_str(".figure { position: relative; margin-top: 12px; }\n");
    html.push_str(".view { display: none; }\n");
    html.push_str(".view svg { display: block; }\n");
    for stat in Statistic::ALL {
        let id = stat.label();
        html.push_str(&format!(
            "#stat-{id}:checked ~ .figure .view-{id} {{ display: block; }}\n"
        ));
        html.push_str(&format!(
            "#stat-{id}:checked ~ .switch label[for=\"stat-{id}\"] {{ background: #2c3e50; color: #fff; }}\n"
        ));
    }
    html.push_str(".cell { position: absolute; }\n");
    html.push_str(".cell:hover { outline: 2px solid #2c3e50; }\n");
    html.push_str(".day { position: absolute; top: 0; bottom: 0; }\n");
    html.push_str(".day:hover { background: rgba(44, 62, 80, 0.18); }\n");
    html.push_str(".legend { font-size: 0.9em; }\n");
    html.push_str(".swatch { display: inline-block; width: 18px; height: 3px; vertical-align: middle; margin: 0 4px 0 12px; }\n");
    html.push_str("</style>\n</head>\n<body>\n");

    // Inputs must precede `.switch` and `.figure` for the sibling selectors.
    for stat in Statistic::ALL {
        let checked = if stat == set.selected { " checked" } else { "" };
        html.push_str(&format!(
            "<input class=\"toggle\" type=\"radio\" name=\"statistic\" id=\"stat-{}\"{checked}>\n",
            stat.label()
        ));
    }
    html.push_str("<div class=\"switch\">");
    for stat in Statistic::ALL {
        html.push_str(&format!(
            "<label for=\"stat-{}\">{}</label>",
            stat.label(),
            stat.display_name()
        ));
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div class=\"figure\" style=\"width: {width}px; height: {height}px;\">\n"
    ));
    for (stat, svg) in svgs {
        // Inline SVG must start at the root element.
        let svg = svg.find("<svg").map_or(svg.as_str(), |idx| &svg[idx..]);
        html.push_str(&format!("<div class=\"view view-{}\">\n", stat.label()));
        html.push_str(svg);
        html.push_str("\n</div>\n");
    }

    // Cell geometry is identical across views, so one overlay layer serves both.
    for cell in &figure.cells {
        push_cell_overlay(&mut html, &figure.layout, cell);
    }
    html.push_str("</div>\n");

    html.push_str("<p class=\"legend\">Cell color: the selected monthly statistic (°C).");
    for kind in [TraceKind::DailyMax, TraceKind::DailyMin] {
        html.push_str(&format!(
            "<span class=\"swatch\" style=\"background: {};\"></span>{}",
            kind.color().to_hex(),
            kind.label()
        ));
    }
    html.push_str("</p>\n");

    html.push_str("</body>\n</html>\n");
    html
}

fn push_cell_overlay(html: &mut String, layout: &GridLayout, cell: &FigureCell) {
    let r = cell.rect;
    html.push_str(&format!(
        "<div class=\"cell\" style=\"left: {}px; top: {}px; width: {}px; height: {}px;\" title=\"{}\">",
        r.x,
        r.y,
        r.width,
        r.height,
        tooltip_attr(&cell_tooltip(cell)),
    ));
    for day in &cell.days {
        let (left, width) = layout.day_slot(day.day());
        html.push_str(&format!(
            "<div class=\"day\" style=\"left: {left:.1}px; width: {width:.1}px;\" title=\"{}\"></div>",
            tooltip_attr(&day_tooltip(day)),
        ));
    }
    html.push_str("</div>\n");
}

/// Hover text for one cell.
pub fn cell_tooltip(cell: &FigureCell) -> String {
    if cell.days.is_empty() {
        return format!("{}\nNo data", cell.key);
    }
    format!(
        "{}\nMonthly max: {}\nMonthly min: {}\nDays: {}",
        cell.key,
        fmt_temp(cell.monthly_max),
        fmt_temp(cell.monthly_min),
        cell.days.len()
    )
}

/// Hover text for one day inside a cell.
pub fn day_tooltip(day: &DailyRecord) -> String {
    format!(
        "{}\nMax: {}\nMin: {}",
        day.date.format("%Y-%m-%d"),
        fmt_temp(day.temp_max),
        fmt_temp(day.temp_min)
    )
}

fn fmt_temp(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1} °C"))
}

fn tooltip_attr(text: &str) -> String {
    escape_html(text).replace('\n', "&#10;")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
