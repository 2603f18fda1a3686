//! Temporal classification of tasks against a reference day.

use serde::Serialize;

use crate::domain::{Task, TaskDate};

/// Where a task sits relative to the reference day.
///
/// Completion is reported separately by `Task::completed`: a finished task
/// from last week is `Upcoming` here (not actionable), not `Overdue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Temporal {
    Overdue,
    DueToday,
    Upcoming,
}

/// Classify one task.
///
/// - `DueToday` when the date equals the reference (completed or not)
/// - `Overdue` when the date is earlier and the task is still open
/// - `Upcoming` otherwise, including tasks without a date
pub fn classify(task: &Task, reference: &TaskDate) -> Temporal {
    match &task.date {
        Some(date) if date == reference => Temporal::DueToday,
        Some(date) if date < reference && !task.completed => Temporal::Overdue,
        _ => Temporal::Upcoming,
    }
}

/// Tasks dated exactly on the reference day, in source order.
pub fn due_today<'a, I>(tasks: I, reference: &TaskDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|t| t.is_on(reference)).collect()
}

/// Open tasks dated before the reference day, in source order.
pub fn overdue<'a, I>(tasks: I, reference: &TaskDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|t| classify(t, reference) == Temporal::Overdue)
        .collect()
}
