//! Client-side re-sorting by date.

use std::borrow::Borrow;
use std::cmp::Ordering;

use crate::domain::Task;

/// Stable ascending sort on the date string; undated tasks go last.
///
/// Works on owned tasks as well as on borrowed subsets (`Vec<&Task>`).
pub fn sort_by_date<T: Borrow<Task>>(tasks: &mut [T]) {
    tasks.sort_by(|a, b| compare_dates(a.borrow(), b.borrow()));
}

fn compare_dates(a: &Task, b: &Task) -> Ordering {
    match (&a.date, &b.date) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
