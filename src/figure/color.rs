//! Color scale for cell backgrounds.
//!
//! The scale is fitted once over the whole grid (global min/max of the
//! selected statistic) before any cell is colored, so colors are comparable
//! across cells. Values map onto a sequential turbo-style ramp; the cell fill is
//! that ramp color washed toward white so the daily traces stay readable.

use crate::aggregate::Grid;
use crate::domain::Statistic;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation, `t` in `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Composite this color at `alpha` over a white background.
    pub fn over_white(self, alpha: f64) -> Rgb {
        Rgb(255, 255, 255).lerp(self, alpha)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Background for cells whose statistic is absent.
pub const NEUTRAL: Rgb = Rgb(232, 232, 232);

/// Opacity of the ramp color over the white canvas.
pub const CELL_FILL_OPACITY: f64 = 0.8;

/// Turbo-style ramp stops at `t = 0.0, 0.1, ..., 1.0`.
const RAMP: [Rgb; 11] = [
    Rgb(48, 18, 59),
    Rgb(69, 91, 205),
    Rgb(62, 156, 254),
    Rgb(24, 214, 203),
    Rgb(70, 247, 131),
    Rgb(164, 252, 60),
    Rgb(225, 221, 55),
    Rgb(254, 164, 49),
    Rgb(239, 90, 17),
    Rgb(194, 36, 3),
    Rgb(122, 4, 3),
];

/// Sample the ramp at `t` in `[0, 1]`.
pub fn ramp(t: f64) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let scaled = t * (RAMP.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(RAMP.len() - 2);
    RAMP[lo].lerp(RAMP[lo + 1], scaled - lo as f64)
}

/// Value range the ramp is stretched over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    /// Fit the scale over every bucket's `stat`; `None` if no bucket has one.
    pub fn from_grid(grid: &Grid, stat: Statistic) -> Option<Self> {
        grid.statistic_range(stat).map(|(min, max)| Self { min, max })
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`.
    ///
    /// A degenerate scale (single distinct value) maps to the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < 1e-12 {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Unwashed ramp color for `value` (used by the color bar).
    pub fn color(&self, value: f64) -> Rgb {
        ramp(self.normalize(value))
    }
}

/// Background color for a cell.
pub fn cell_fill(scale: Option<&ColorScale>, value: Option<f64>) -> Rgb {
    match (scale, value) {
        (Some(scale), Some(v)) => scale.color(v).over_white(CELL_FILL_OPACITY),
        _ => NEUTRAL,
    }
}
