//! Pixel geometry for the year × month grid.
//!
//! Years run left to right as columns, months run top to bottom as rows
//! (January on top). Around the cell block the canvas reserves:
//!
//! - a top band for the title and the year header row
//! - a left gutter for month labels
//! - a right band for the color bar and its tick labels

use crate::domain::YearRange;

/// Months are always laid out as twelve rows.
pub const ROWS: u32 = 12;

const TITLE_HEIGHT: u32 = 44;
const HEADER_HEIGHT: u32 = 24;
const LEFT_GUTTER: u32 = 48;
const RIGHT_BAND: u32 = 104;
const BOTTOM_MARGIN: u32 = 16;
const COLORBAR_OFFSET: u32 = 24;
const COLORBAR_WIDTH: u32 = 18;

/// Cell sizes are clamped to these bounds (pixels).
pub const MIN_CELL_WIDTH: u32 = 24;
pub const MIN_CELL_HEIGHT: u32 = 16;
pub const MAX_CELL_SIZE: u32 = 2000;

/// Inset between a cell's edge and its daily chart.
pub const PLOT_MARGIN: u32 = 3;
/// Day-of-month axis shared by every cell chart, one unit per day.
pub const DAY_AXIS: std::ops::Range<f64> = 0.5..31.5;
const DAYS_ON_AXIS: u32 = 31;

/// An axis-aligned pixel rectangle (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width as i32 / 2, self.y + self.height as i32 / 2)
    }
}

/// Maps `(column, row)` grid indices onto canvas rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub years: YearRange,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Gap between neighbouring cells.
    pub gap: u32,
}

impl GridLayout {
    pub fn new(years: YearRange, cell_width: u32, cell_height: u32) -> Self {
        Self {
            years,
            // Below the minimum the per-cell charts have no room left to draw.
            cell_width: cell_width.clamp(MIN_CELL_WIDTH, MAX_CELL_SIZE),
            cell_height: cell_height.clamp(MIN_CELL_HEIGHT, MAX_CELL_SIZE),
            gap: 2,
        }
    }

    pub fn columns(&self) -> u32 {
        self.years.len().min(YearRange::MAX_YEARS) as u32
    }

    pub fn rows(&self) -> u32 {
        ROWS
    }

    pub fn column_of(&self, year: i32) -> Option<u32> {
        self.years
            .contains(year)
            .then(|| (year - self.years.start) as u32)
    }

    pub fn row_of(&self, month: u32) -> Option<u32> {
        (1..=ROWS).contains(&month).then(|| month - 1)
    }

    /// Rectangle holding every cell.
    pub fn grid_rect(&self) -> Rect {
        let cols = self.columns();
        Rect {
            x: LEFT_GUTTER as i32,
            y: (TITLE_HEIGHT + HEADER_HEIGHT) as i32,
            width: cols * self.cell_width + cols.saturating_sub(1) * self.gap,
            height: ROWS * self.cell_height + (ROWS - 1) * self.gap,
        }
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let grid = self.grid_rect();
        (
            LEFT_GUTTER + grid.width + RIGHT_BAND,
            TITLE_HEIGHT + HEADER_HEIGHT + grid.height + BOTTOM_MARGIN,
        )
    }

    pub fn cell_rect(&self, column: u32, row: u32) -> Rect {
        let grid = self.grid_rect();
        Rect {
            x: grid.x + (column * (self.cell_width + self.gap)) as i32,
            y: grid.y + (row * (self.cell_height + self.gap)) as i32,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Horizontal slot of `day` on a cell's day axis, as `(left, width)` in
    /// pixels from the cell's left edge.
    pub fn day_slot(&self, day: u32) -> (f64, f64) {
        let inner = f64::from(self.cell_width.saturating_sub(2 * PLOT_MARGIN));
        let per_day = inner / f64::from(DAYS_ON_AXIS);
        (
            f64::from(PLOT_MARGIN) + f64::from(day.saturating_sub(1)) * per_day,
            per_day,
        )
    }

    /// Where the title is centered.
    pub fn title_anchor(&self) -> (i32, i32) {
        let (width, _) = self.canvas_size();
        (width as i32 / 2, TITLE_HEIGHT as i32 / 2)
    }

    /// Center of the year label above `column`.
    pub fn column_label_anchor(&self, column: u32) -> (i32, i32) {
        let cell = self.cell_rect(column, 0);
        (cell.center().0, (TITLE_HEIGHT + HEADER_HEIGHT / 2) as i32)
    }

    /// Center of the month label left of `row`.
    pub fn row_label_anchor(&self, row: u32) -> (i32, i32) {
        let cell = self.cell_rect(0, row);
        (LEFT_GUTTER as i32 / 2, cell.center().1)
    }

    pub fn colorbar_rect(&self) -> Rect {
        let grid = self.grid_rect();
        Rect {
            x: grid.right() + COLORBAR_OFFSET as i32,
            y: grid.y,
            width: COLORBAR_WIDTH,
            height: grid.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::MonthKey;

    fn layout() -> GridLayout {
        GridLayout::new(YearRange::DEFAULT, 84, 52)
    }

    fn intersects(a: &Rect, b: &Rect) -> bool {
        a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
    }

    fn rect_for(l: &GridLayout, key: MonthKey) -> Option<Rect> {
        Some(l.cell_rect(l.column_of(key.year)?, l.row_of(key.month)?))
    }

    #[test]
    fn maps_years_to_columns_and_months_to_rows() {
        let l = layout();
        assert_eq!(l.columns(), 10);
        assert_eq!(l.column_of(2008), Some(0));
        assert_eq!(l.column_of(2017), Some(9));
        assert_eq!(l.column_of(2018), None);
        assert_eq!(l.row_of(1), Some(0));
        assert_eq!(l.row_of(12), Some(11));
        assert_eq!(l.row_of(0), None);
        assert_eq!(l.row_of(13), None);
    }

    #[test]
    fn cells_do_not_overlap_and_stay_on_canvas() {
        let l = layout();
        let (w, h) = l.canvas_size();
        let mut rects = Vec::new();
        for row in 0..l.rows() {
            for col in 0..l.columns() {
                let r = l.cell_rect(col, row);
                assert!(r.x >= 0 && r.y >= 0);
                assert!(r.right() <= w as i32 && r.bottom() <= h as i32);
                rects.push(r);
            }
        }
        assert_eq!(rects.len(), 120);
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!intersects(a, b), "{a:?} overlaps {b:?}");
            }
        }
        assert!(!intersects(&l.colorbar_rect(), &l.grid_rect()));
    }

    #[test]
    fn later_years_are_right_and_later_months_are_lower() {
        let l = layout();
        let jul_2015 = rect_for(&l, MonthKey::new(2015, 7)).unwrap();
        let jul_2016 = rect_for(&l, MonthKey::new(2016, 7)).unwrap();
        let aug_2015 = rect_for(&l, MonthKey::new(2015, 8)).unwrap();
        assert!(jul_2016.x > jul_2015.x && jul_2016.y == jul_2015.y);
        assert!(aug_2015.y > jul_2015.y && aug_2015.x == jul_2015.x);
        assert!(rect_for(&l, MonthKey::new(2007, 7)).is_none());
    }

    #[test]
    fn canvas_size_accounts_for_gaps_and_bands() {
        let l = layout();
        // 10 cells of 84 plus 9 gaps of 2, 12 cells of 52 plus 11 gaps of 2.
        assert_eq!(l.grid_rect().width, 858);
        assert_eq!(l.grid_rect().height, 646);
        assert_eq!(l.canvas_size(), (48 + 858 + 104, 68 + 646 + 16));
    }

    #[test]
    fn cell_sizes_are_clamped_both_ways() {
        let l = GridLayout::new(YearRange::DEFAULT, 1, 1);
        assert_eq!((l.cell_width, l.cell_height), (24, 16));

        let l = GridLayout::new(YearRange::DEFAULT, u32::MAX / 4, u32::MAX);
        assert_eq!((l.cell_width, l.cell_height), (MAX_CELL_SIZE, MAX_CELL_SIZE));
        let (w, h) = l.canvas_size();
        assert!(w > 10 * MAX_CELL_SIZE && h > 12 * MAX_CELL_SIZE);
    }

    #[test]
    fn widest_allowed_grid_fits_in_pixel_coordinates() {
        let years = YearRange::new(1800, 1799 + YearRange::MAX_YEARS as i32).unwrap();
        let l = GridLayout::new(years, MAX_CELL_SIZE, MAX_CELL_SIZE);
        let last = l.cell_rect(l.columns() - 1, ROWS - 1);
        assert!(last.right() > 0 && last.bottom() > 0);
        assert!(l.colorbar_rect().right() > last.right());
    }

    #[test]
    fn day_slots_tile_the_plot_area() {
        let l = layout();
        let (first_left, width) = l.day_slot(1);
        let (last_left, _) = l.day_slot(31);
        assert_eq!(first_left, f64::from(PLOT_MARGIN));
        assert!((last_left + width - f64::from(84 - PLOT_MARGIN)).abs() < 1e-9);
        assert!(l.day_slot(15).0 > l.day_slot(14).0);
        assert_eq!(DAY_AXIS.end - DAY_AXIS.start, 31.0);
    }
}
