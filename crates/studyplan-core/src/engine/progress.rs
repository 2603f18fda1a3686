//! Completion ratios: overall, per category, and for the reference day.

use serde::Serialize;

use crate::domain::{Category, Task, TaskDate};

/// Integer percent of completed tasks, rounded half up. `0` for no tasks.
///
/// 199 of 200 rounds up to `100` like any other half.
///
/// Always computed from the given subset; per-category ratios are never
/// derived by averaging other ratios.
pub fn completion_ratio<'a, I>(tasks: I) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    let (total, done) = tasks.into_iter().fold((0u64, 0u64), |(total, done), t| {
        (total + 1, done + u64::from(t.completed))
    });
    percent(done, total)
}

/// round(100 * done / total) with halves rounded up, in integer arithmetic.
fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((200 * done + total) / (2 * total)) as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub total: usize,
    pub completed: usize,
    pub ratio: u8,
}

impl CategoryProgress {
    pub fn of<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let (total, completed) = tasks.into_iter().fold((0usize, 0usize), |(n, c), t| {
            (n + 1, c + usize::from(t.completed))
        });
        Self {
            total,
            completed,
            ratio: percent(completed as u64, total as u64),
        }
    }

    pub fn pending(&self) -> usize {
        self.total - self.completed
    }
}

/// Aggregate statistics for the progress screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub reference: TaskDate,
    pub overall: CategoryProgress,
    pub theory: CategoryProgress,
    pub exercise: CategoryProgress,
    pub today: CategoryProgress,
}

impl ProgressReport {
    pub fn compute(tasks: &[Task], reference: &TaskDate) -> Self {
        Self {
            reference: reference.clone(),
            overall: CategoryProgress::of(tasks),
            theory: CategoryProgress::of(in_category(tasks, Category::Theory)),
            exercise: CategoryProgress::of(in_category(tasks, Category::Exercise)),
            today: CategoryProgress::of(tasks.iter().filter(|t| t.is_on(reference))),
        }
    }

    pub fn category(&self, category: Category) -> &CategoryProgress {
        match category {
            Category::Theory => &self.theory,
            Category::Exercise => &self.exercise,
        }
    }
}

fn in_category(tasks: &[Task], category: Category) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |t| t.category == category)
}
