//! Aggregation engine.
//!
//! Pure functions of a task list and a reference day: no I/O, no clock, no
//! store. Everything the screens show is recomputed from the full in-memory
//! list through this module.

pub mod calendar;
pub mod classify;
pub mod focus;
pub mod ordering;
pub mod progress;
pub mod views;

pub use calendar::{DayBucket, MonthGrid, YearMonth, bucket_by_date, days_in_month, first_weekday};
pub use classify::{Temporal, classify, due_today, overdue};
pub use focus::select_focus_task;
pub use ordering::sort_by_date;
pub use progress::{CategoryProgress, ProgressReport, completion_ratio};
pub use views::{CategoryFilter, Dashboard, Schedule};
