//! Screen-level view models built from a task list and a reference day.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::classify::{due_today, overdue};
use super::focus::select_focus_task;
use super::ordering::sort_by_date;
use super::progress::completion_ratio;
use crate::domain::{Category, Task, TaskDate};

/// Home screen summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard<'a> {
    pub reference: TaskDate,
    pub today: Vec<&'a Task>,
    pub today_ratio: u8,
    pub overall_ratio: u8,
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub focus: Option<&'a Task>,
}

impl<'a> Dashboard<'a> {
    pub fn compute(tasks: &'a [Task], reference: &TaskDate) -> Self {
        let today = due_today(tasks, reference);
        let focus = select_focus_task(today.iter().copied());
        Self {
            reference: reference.clone(),
            today_ratio: completion_ratio(today.iter().copied()),
            overall_ratio: completion_ratio(tasks),
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.completed).count(),
            overdue: overdue(tasks, reference).len(),
            focus,
            today,
        }
    }

    /// Everything scheduled for today is done (and there was something).
    pub fn day_complete(&self) -> bool {
        !self.today.is_empty() && self.today.iter().all(|t| t.completed)
    }
}

/// Listing filter of the schedule screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn admits(self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => task.category == c,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(c) => c.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "todos" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

/// Schedule listing grouped by category, each group sorted by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule<'a> {
    pub filter: CategoryFilter,
    pub theory: Vec<&'a Task>,
    pub exercise: Vec<&'a Task>,
}

impl<'a> Schedule<'a> {
    pub fn compute(tasks: &'a [Task], filter: CategoryFilter) -> Self {
        let group = |category: Category| {
            let mut group: Vec<&Task> = tasks
                .iter()
                .filter(|t| filter.admits(t) && t.category == category)
                .collect();
            sort_by_date(&mut group);
            group
        };
        Self {
            filter,
            theory: group(Category::Theory),
            exercise: group(Category::Exercise),
        }
    }

    pub fn group(&self, category: Category) -> &[&'a Task] {
        match category {
            Category::Theory => &self.theory,
            Category::Exercise => &self.exercise,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.theory.is_empty() && self.exercise.is_empty()
    }
}
