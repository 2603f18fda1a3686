//! Month grid: one bucket of tasks per calendar day.
//!
//! Months are zero based (`0` = January) to match the calendar screen's
//! navigation state.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{Task, TaskDate};

/// A month of a year. `month` is zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    pub fn is_valid(&self) -> bool {
        self.month < 12 && self.first_day().is_some()
    }

    pub fn prev(self) -> Self {
        match self.month {
            0 => Self::new(self.year - 1, 11),
            m => Self::new(self.year, m.min(12) - 1),
        }
    }

    pub fn next(self) -> Self {
        match self.month {
            m if m >= 11 => Self::new(self.year + 1, 0),
            m => Self::new(self.year, m + 1),
        }
    }

    fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.checked_add(1)?, 1)
    }

    /// Canonical date string of `day` in this month, `None` when the month
    /// index is out of range.
    pub(crate) fn date_of(&self, day: u32) -> Option<TaskDate> {
        if !self.is_valid() {
            return None;
        }
        let month = self.month.checked_add(1)?;
        Some(TaskDate::raw(format!("{:04}-{:02}-{:02}", self.year, month, day)))
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a zero-based month; `0` for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        1 if is_leap_year(year) => 29,
        1 => 28,
        _ => 0,
    }
}

/// Weekday of the 1st (0 = Sunday), or `None` when the month is unrepresentable.
pub fn first_weekday(year: i32, month: u32) -> Option<u32> {
    let ym = YearMonth::new(year, month);
    if !ym.is_valid() {
        return None;
    }
    ym.first_day().map(|d| d.weekday().num_days_from_sunday())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket<'a> {
    pub day: u32,
    pub date: TaskDate,
    pub tasks: Vec<&'a Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid<'a> {
    pub month: YearMonth,
    /// Weekday index of day 1 (0 = Sunday): the number of blank leading cells.
    pub first_weekday: u32,
    pub buckets: Vec<DayBucket<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub fn bucket(&self, day: u32) -> Option<&DayBucket<'a>> {
        day.checked_sub(1)
            .and_then(|i| self.buckets.get(i as usize))
    }

    pub fn days(&self) -> usize {
        self.buckets.len()
    }
}

/// Bucket tasks by day for one month.
///
/// A task lands in day `d` iff its date string equals that day's canonical
/// form. Order inside a bucket is source order. An out-of-range month yields
/// a grid with no buckets.
pub fn bucket_by_date(tasks: &[Task], year: i32, month: u32) -> MonthGrid<'_> {
    let ym = YearMonth::new(year, month);
    let Some(first_weekday) = first_weekday(year, month) else {
        return MonthGrid {
            month: ym,
            first_weekday: 0,
            buckets: Vec::new(),
        };
    };

    let mut buckets: Vec<DayBucket<'_>> = (1..=days_in_month(year, month))
        .filter_map(|day| {
            Some(DayBucket {
                day,
                date: ym.date_of(day)?,
                tasks: Vec::new(),
            })
        })
        .collect();

    // "YYYY-MM-" prefix, then the two-digit day
    let prefix = format!("{:04}-{:02}-", year, month + 1);
    for task in tasks {
        let Some(date) = &task.date else { continue };
        let Some(day) = date
            .as_str()
            .strip_prefix(prefix.as_str())
            .filter(|rest| rest.len() == 2 && rest.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|rest| rest.parse::<usize>().ok())
        else {
            continue;
        };
        if let Some(bucket) = day.checked_sub(1).and_then(|i| buckets.get_mut(i)) {
            bucket.tasks.push(task);
        }
    }

    MonthGrid {
        month: ym,
        first_weekday,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::task;
    use rstest::rstest;

    #[rstest]
    #[case(2024, 1, 29)]
    #[case(2023, 1, 28)]
    #[case(2000, 1, 29)]
    #[case(1900, 1, 28)]
    #[case(2024, 0, 31)]
    #[case(2024, 3, 30)]
    #[case(2024, 11, 31)]
    #[case(2024, 12, 0)]
    fn days_in_month_follows_the_gregorian_rules(
        #[case] year: i32,
        #[case] month: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(days_in_month(year, month), expected);
    }

    #[test]
    fn february_grids_have_one_bucket_per_day() {
        let tasks: Vec<Task> = Vec::new();
        assert_eq!(bucket_by_date(&tasks, 2024, 1).days(), 29);
        assert_eq!(bucket_by_date(&tasks, 2023, 1).days(), 28);
    }

    #[rstest]
    #[case(2024, 2, 5)] // 2024-03-01 was a Friday
    #[case(2023, 9, 0)] // 2023-10-01 was a Sunday
    #[case(2024, 8, 0)] // 2024-09-01 was a Sunday
    #[case(2025, 8, 1)] // 2025-09-01 was a Monday
    fn first_weekday_counts_from_sunday(
        #[case] year: i32,
        #[case] month: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(first_weekday(year, month), Some(expected));
        assert_eq!(bucket_by_date(&[], year, month).first_weekday, expected);
    }

    #[test]
    fn tasks_land_in_their_day_in_source_order() {
        let tasks = vec![
            task("a", "2024-03-05"),
            task("b", "2024-03-01"),
            task("c", "2024-03-05"),
            task("d", "2024-04-05"),
            task("e", "2023-03-05"),
            task("f", "2024-03-31"),
        ];
        let grid = bucket_by_date(&tasks, 2024, 2);
        assert_eq!(grid.days(), 31);

        let ids = |day: u32| -> Vec<String> {
            grid.bucket(day)
                .unwrap()
                .tasks
                .iter()
                .map(|t| t.id.to_string())
                .collect()
        };
        assert_eq!(ids(5), vec!["a", "c"]);
        assert_eq!(ids(1), vec!["b"]);
        assert_eq!(ids(31), vec!["f"]);
        assert!(ids(2).is_empty());
        assert_eq!(grid.bucket(5).unwrap().date.as_str(), "2024-03-05");
    }

    #[test]
    fn malformed_and_absent_dates_are_skipped() {
        let mut undated = task("u", "2024-03-05");
        undated.date = None;
        let tasks = vec![
            undated,
            task("x", "2024-3-5"),
            task("y", "2024-03-5x"),
            task("z", "2024-03-00"),
            task("w", "2024-03-99"),
        ];
        let grid = bucket_by_date(&tasks, 2024, 2);
        assert!(grid.buckets.iter().all(|b| b.tasks.is_empty()));
    }

    #[test]
    fn out_of_range_month_gives_an_empty_grid() {
        let tasks = vec![task("a", "2024-13-01")];
        let grid = bucket_by_date(&tasks, 2024, 12);
        assert!(grid.buckets.is_empty());
        assert_eq!(first_weekday(2024, 12), None);
        assert_eq!(first_weekday(i32::MAX, 0), None);
        assert!(bucket_by_date(&tasks, i32::MAX, 0).buckets.is_empty());
    }

    #[test]
    fn date_of_rejects_months_outside_the_year() {
        assert_eq!(
            YearMonth::new(2024, 1).date_of(29),
            Some(TaskDate::raw("2024-02-29"))
        );
        assert_eq!(YearMonth::new(2024, 12).date_of(1), None);
        assert_eq!(YearMonth::new(2024, u32::MAX).date_of(1), None);
        assert!(bucket_by_date(&[], 2024, u32::MAX).buckets.is_empty());
    }

    #[test]
    fn navigation_wraps_across_years() {
        assert_eq!(YearMonth::new(2024, 0).prev(), YearMonth::new(2023, 11));
        assert_eq!(YearMonth::new(2024, 11).next(), YearMonth::new(2025, 0));
        assert_eq!(YearMonth::new(2024, 5).next().prev(), YearMonth::new(2024, 5));
        let d = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(YearMonth::containing(d), YearMonth::new(2024, 2));
    }
}
