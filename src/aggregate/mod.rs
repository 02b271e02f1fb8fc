//! Monthly aggregation of daily records.
//!
//! The aggregator is a single linear pass that groups records by
//! `(year, month)` into a hash map, followed by a stable date sort inside each
//! group. Buckets never interact with each other.
//!
//! Months without any input records are *not* synthesized here. The grid is
//! sparse; callers that need every position use `Grid::positions` together with
//! `Grid::bucket_or_empty`.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::domain::{DailyRecord, MonthKey, Statistic, YearRange};

/// Daily records and derived statistics for one `(year, month)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    pub key: MonthKey,
    /// Sorted by date ascending; equal dates keep input order.
    pub days: Vec<DailyRecord>,
    /// Highest non-absent daily max, if any.
    pub monthly_max: Option<f64>,
    /// Lowest non-absent daily min, if any.
    pub monthly_min: Option<f64>,
}

impl MonthBucket {
    /// Build a bucket from records that all belong to `key`.
    pub fn from_days(key: MonthKey, mut days: Vec<DailyRecord>) -> Self {
        debug_assert!(days.iter().all(|d| d.key() == key));
        days.sort_by_key(|d| d.date);

        let monthly_max = fold_extreme(days.iter().filter_map(|d| d.temp_max), f64::max);
        let monthly_min = fold_extreme(days.iter().filter_map(|d| d.temp_min), f64::min);

        Self {
            key,
            days,
            monthly_max,
            monthly_min,
        }
    }

    /// Placeholder for a position with no input records.
    pub fn empty(key: MonthKey) -> Self {
        Self {
            key,
            days: Vec::new(),
            monthly_max: None,
            monthly_min: None,
        }
    }

    pub fn statistic(&self, stat: Statistic) -> Option<f64> {
        match stat {
            Statistic::Max => self.monthly_max,
            Statistic::Min => self.monthly_min,
        }
    }
}

fn fold_extreme(values: impl Iterator<Item = f64>, pick: fn(f64, f64) -> f64) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.map_or(v, |a| pick(a, v))))
}

/// Sparse `(year, month) -> bucket` mapping over a fixed year window.
///
/// The logical shape is always `years.len() × 12` positions, whether or not a
/// position is backed by data.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    years: YearRange,
    buckets: BTreeMap<MonthKey, MonthBucket>,
}

impl Grid {
    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn get(&self, key: MonthKey) -> Option<&MonthBucket> {
        self.buckets.get(&key)
    }

    /// The bucket at `key`, or a synthetic empty bucket when absent.
    pub fn bucket_or_empty(&self, key: MonthKey) -> Cow<'_, MonthBucket> {
        match self.buckets.get(&key) {
            Some(bucket) => Cow::Borrowed(bucket),
            None => Cow::Owned(MonthBucket::empty(key)),
        }
    }

    /// Every renderable position: months January..December as the outer loop,
    /// years ascending as the inner loop (row-major for a year-column layout).
    pub fn positions(&self) -> impl Iterator<Item = MonthKey> + '_ {
        (1..=12u32).flat_map(move |month| self.years.years().map(move |year| MonthKey::new(year, month)))
    }

    /// Total number of positions (`years × 12`).
    pub fn position_count(&self) -> usize {
        self.years.len() * 12
    }

    /// Populated buckets in key order.
    pub fn buckets(&self) -> impl Iterator<Item = &MonthBucket> {
        self.buckets.values()
    }

    /// Number of populated buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Global `(min, max)` of the selected statistic across all buckets.
    ///
    /// `None` when no bucket has a value for the statistic.
    pub fn statistic_range(&self, stat: Statistic) -> Option<(f64, f64)> {
        self.buckets
            .values()
            .filter_map(|b| b.statistic(stat))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Group `records` into monthly buckets, keeping only years inside `years`.
pub fn aggregate(records: Vec<DailyRecord>, years: YearRange) -> Grid {
    let mut groups: HashMap<MonthKey, Vec<DailyRecord>> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        let key = record.key();
        if !years.contains(key.year) {
            skipped += 1;
            continue;
        }
        groups.entry(key).or_default().push(record);
    }

    let buckets: BTreeMap<MonthKey, MonthBucket> = groups
        .into_iter()
        .map(|(key, days)| (key, MonthBucket::from_days(key, days)))
        .collect();

    debug!(
        buckets = buckets.len(),
        skipped, "aggregated daily records into monthly buckets"
    );

    Grid { years, buckets }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn rec(y: i32, m: u32, d: u32, max: Option<f64>, min: Option<f64>) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            temp_max: max,
            temp_min: min,
        }
    }

    #[test]
    fn single_row_produces_single_bucket() {
        let grid = aggregate(vec![rec(2015, 7, 4, Some(33.2), Some(27.1))], YearRange::DEFAULT);

        assert_eq!(grid.len(), 1);
        let bucket = grid.get(MonthKey::new(2015, 7)).unwrap();
        assert_eq!(bucket.days.len(), 1);
        assert_eq!(bucket.monthly_max, Some(33.2));
        assert_eq!(bucket.monthly_min, Some(27.1));
    }

    #[test]
    fn absent_fields_are_excluded_from_their_statistic_only() {
        let grid = aggregate(
            vec![
                rec(2010, 1, 15, None, Some(18.0)),
                rec(2010, 1, 16, Some(21.0), Some(19.5)),
            ],
            YearRange::DEFAULT,
        );
        let bucket = grid.get(MonthKey::new(2010, 1)).unwrap();
        assert_eq!(bucket.days.len(), 2);
        assert_eq!(bucket.monthly_max, Some(21.0));
        assert_eq!(bucket.monthly_min, Some(18.0));
    }

    #[test]
    fn all_absent_values_yield_absent_statistic() {
        let grid = aggregate(
            vec![rec(2011, 3, 1, None, Some(-2.0)), rec(2011, 3, 2, None, None)],
            YearRange::DEFAULT,
        );
        let bucket = grid.get(MonthKey::new(2011, 3)).unwrap();
        assert_eq!(bucket.monthly_max, None);
        assert_eq!(bucket.monthly_min, Some(-2.0));
        assert_eq!(grid.statistic_range(Statistic::Max), None);
    }

    #[test]
    fn zero_and_negative_values_are_real_values() {
        let grid = aggregate(
            vec![rec(2013, 1, 1, Some(0.0), Some(-5.0)), rec(2013, 1, 2, Some(-1.0), Some(0.0))],
            YearRange::DEFAULT,
        );
        let bucket = grid.get(MonthKey::new(2013, 1)).unwrap();
        assert_eq!(bucket.monthly_max, Some(0.0));
        assert_eq!(bucket.monthly_min, Some(-5.0));
    }

    #[test]
    fn days_are_sorted_and_stable_for_equal_dates() {
        let grid = aggregate(
            vec![
                rec(2009, 6, 3, Some(30.0), None),
                rec(2009, 6, 1, Some(28.0), None),
                rec(2009, 6, 3, Some(31.0), None),
                rec(2009, 6, 2, Some(29.0), None),
            ],
            YearRange::DEFAULT,
        );
        let bucket = grid.get(MonthKey::new(2009, 6)).unwrap();
        let maxes: Vec<Option<f64>> = bucket.days.iter().map(|d| d.temp_max).collect();
        assert_eq!(maxes, vec![Some(28.0), Some(29.0), Some(30.0), Some(31.0)]);
    }

    #[test]
    fn every_in_range_record_lands_in_exactly_one_matching_bucket() {
        let mut records = Vec::new();
        for year in [2007, 2008, 2012, 2017, 2018] {
            for month in [1, 2, 12] {
                for day in [1, 15, 28] {
                    records.push(rec(year, month, day, Some(20.0), Some(10.0)));
                }
            }
        }
        let in_range = records.iter().filter(|r| YearRange::DEFAULT.contains(r.key().year)).count();

        let grid = aggregate(records, YearRange::DEFAULT);

        let total: usize = grid.buckets().map(|b| b.days.len()).sum();
        assert_eq!(total, in_range);
        for bucket in grid.buckets() {
            assert!(YearRange::DEFAULT.contains(bucket.key.year));
            assert!(bucket.days.iter().all(|d| d.key() == bucket.key));
        }
    }

    #[test]
    fn missing_months_are_not_synthesized_but_positions_cover_everything() {
        let grid = aggregate(vec![rec(2008, 1, 1, Some(15.0), Some(10.0))], YearRange::DEFAULT);

        assert_eq!(grid.len(), 1);
        assert!(grid.get(MonthKey::new(2012, 2)).is_none());

        let positions: Vec<MonthKey> = grid.positions().collect();
        assert_eq!(positions.len(), 120);
        assert_eq!(grid.position_count(), 120);
        assert_eq!(positions[0], MonthKey::new(2008, 1));
        assert_eq!(positions[9], MonthKey::new(2017, 1));
        assert_eq!(positions[10], MonthKey::new(2008, 2));
        assert_eq!(positions[119], MonthKey::new(2017, 12));

        let placeholder = grid.bucket_or_empty(MonthKey::new(2012, 2));
        assert!(placeholder.days.is_empty());
        assert_eq!(placeholder.monthly_max, None);
        assert!(matches!(grid.bucket_or_empty(MonthKey::new(2008, 1)), Cow::Borrowed(_)));
    }

    #[test]
    fn statistic_range_spans_whole_grid() {
        let grid = aggregate(
            vec![
                rec(2008, 1, 1, Some(18.0), Some(9.0)),
                rec(2012, 8, 1, Some(35.1), Some(28.0)),
                rec(2016, 1, 24, Some(8.5), Some(3.1)),
            ],
            YearRange::DEFAULT,
        );
        assert_eq!(grid.statistic_range(Statistic::Max), Some((8.5, 35.1)));
        assert_eq!(grid.statistic_range(Statistic::Min), Some((3.1, 28.0)));
    }
}
