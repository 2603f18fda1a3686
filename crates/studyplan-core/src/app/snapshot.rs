//! TaskSnapshot - ある時点のタスク一覧と基準日
//!
//! Planner のロックを保持せずに画面用のビューモデルを組み立てるための
//! 所有型のコピーです。ビューモデルはすべてこのスナップショットを借用します。

use chrono::NaiveDate;

use crate::domain::{Task, TaskDate, TaskId};
use crate::engine::{
    CategoryFilter, Dashboard, MonthGrid, ProgressReport, Schedule, YearMonth, bucket_by_date,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    tasks: Vec<Task>,
    today: NaiveDate,
    reference: TaskDate,
}

impl TaskSnapshot {
    pub fn new(tasks: Vec<Task>, today: NaiveDate) -> Self {
        Self {
            tasks,
            today,
            reference: TaskDate::from_naive(today),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn reference(&self) -> &TaskDate {
        &self.reference
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::compute(&self.tasks, &self.reference)
    }

    pub fn progress(&self) -> ProgressReport {
        ProgressReport::compute(&self.tasks, &self.reference)
    }

    pub fn schedule(&self, filter: CategoryFilter) -> Schedule<'_> {
        Schedule::compute(&self.tasks, filter)
    }

    /// The month the calendar opens on.
    pub fn current_month(&self) -> YearMonth {
        YearMonth::containing(self.today)
    }

    pub fn calendar(&self, month: YearMonth) -> MonthGrid<'_> {
        bucket_by_date(&self.tasks, month.year, month.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::engine::testing::{task, task_in};

    fn snapshot() -> TaskSnapshot {
        let mut done = task("2", "2024-03-05");
        done.completed = true;
        TaskSnapshot::new(
            vec![
                task("1", "2024-03-05"),
                done,
                task_in("3", "2024-03-20", Category::Exercise),
                task("4", "2024-02-28"),
            ],
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
    }

    #[test]
    fn reference_is_canonical_today() {
        assert_eq!(snapshot().reference().as_str(), "2024-03-05");
        assert_eq!(snapshot().current_month(), YearMonth::new(2024, 2));
    }

    #[test]
    fn dashboard_and_progress_agree() {
        let snap = snapshot();
        let dashboard = snap.dashboard();
        assert_eq!(dashboard.today.len(), 2);
        assert_eq!(dashboard.today_ratio, 50);
        assert_eq!(dashboard.overdue, 1);

        let progress = snap.progress();
        assert_eq!(progress.overall.total, 4);
        assert_eq!(progress.overall.completed, 1);
        assert_eq!(progress.overall.ratio, dashboard.overall_ratio);
    }

    #[test]
    fn calendar_buckets_the_requested_month() {
        let snap = snapshot();
        let grid = snap.calendar(snap.current_month());
        assert_eq!(grid.days(), 31);
        assert_eq!(grid.bucket(5).unwrap().tasks.len(), 2);
        assert_eq!(grid.bucket(20).unwrap().tasks.len(), 1);

        let feb = snap.calendar(snap.current_month().prev());
        assert_eq!(feb.bucket(28).unwrap().tasks.len(), 1);
    }

    #[test]
    fn schedule_and_find() {
        let snap = snapshot();
        let only_exercise = snap.schedule(CategoryFilter::Only(Category::Exercise));
        assert_eq!(only_exercise.group(Category::Exercise).len(), 1);
        assert!(only_exercise.group(Category::Theory).is_empty());

        assert!(snap.find(&TaskId::new("3")).is_some());
        assert!(snap.find(&TaskId::new("99")).is_none());
    }
}
