//! Plain-text rendering of the view models.

use chrono::Month;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use studyplan_core::app::ImportReport;
use studyplan_core::domain::{Category, Task, TaskDate};
use studyplan_core::engine::{
    CategoryProgress, Dashboard, MonthGrid, ProgressReport, Schedule, Temporal, classify,
};

pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

fn check(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

fn when(task: &Task, reference: &TaskDate) -> &'static str {
    if task.completed {
        return "";
    }
    match classify(task, reference) {
        Temporal::Overdue => "overdue",
        Temporal::DueToday => "today",
        Temporal::Upcoming => "",
    }
}

pub fn task_line(task: &Task, reference: &TaskDate) -> String {
    let date = task.date.as_ref().map(TaskDate::as_str).unwrap_or("----------");
    let subject = task
        .subject
        .label()
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    format!(
        "{} {}  {:<8} {:<6} {}{}  #{} {}",
        check(task),
        date,
        task.category,
        task.priority,
        task.title,
        subject,
        task.id,
        when(task, reference),
    )
    .trim_end()
    .to_string()
}

fn bar(ratio: u8) -> String {
    let filled = usize::from(ratio) / 5;
    format!("[{}{}] {:>3}%", "#".repeat(filled), ".".repeat(20 - filled), ratio)
}

pub fn dashboard(view: &Dashboard<'_>) {
    println!("Today {}", view.reference);
    println!("  today   {}", bar(view.today_ratio));
    println!("  overall {}", bar(view.overall_ratio));
    println!(
        "  {} tasks, {} completed, {} overdue",
        view.total, view.completed, view.overdue
    );
    match view.focus {
        Some(task) => println!("Focus: {} ({})", task.title, task.priority),
        None if view.day_complete() => println!("Focus: all done for today"),
        None => println!("Focus: nothing scheduled today"),
    }
    if !view.today.is_empty() {
        println!();
        for task in &view.today {
            println!("  {}", task_line(task, &view.reference));
        }
    }
}

pub fn schedule(view: &Schedule<'_>, reference: &TaskDate) {
    if view.is_empty() {
        println!("No tasks ({}).", view.filter);
        return;
    }
    for category in Category::ALL {
        let group = view.group(category);
        if group.is_empty() {
            continue;
        }
        println!("{category} ({})", group.len());
        for task in group {
            println!("  {}", task_line(task, reference));
        }
    }
}

fn progress_row(label: &str, p: &CategoryProgress) {
    println!(
        "  {:<9} {}  {}/{} done, {} pending",
        label,
        bar(p.ratio),
        p.completed,
        p.total,
        p.pending()
    );
}

pub fn progress(report: &ProgressReport) {
    println!("Progress on {}", report.reference);
    progress_row("overall", &report.overall);
    for category in Category::ALL {
        progress_row(category.as_str(), report.category(category));
    }
    progress_row("today", &report.today);
}

fn month_name(month0: u32) -> &'static str {
    u8::try_from(month0 + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("?")
}

/// Grid with one cell per day: `*` marks open work, `+` a finished day.
pub fn calendar(grid: &MonthGrid<'_>, reference: &TaskDate) {
    println!("{} {}", month_name(grid.month.month), grid.month.year);
    if grid.buckets.is_empty() {
        println!("  (no such month)");
        return;
    }
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");

    let mut line = "    ".repeat(grid.first_weekday as usize);
    let mut column = grid.first_weekday;
    for bucket in &grid.buckets {
        let mark = match bucket.tasks.iter().any(|t| !t.completed) {
            true => '*',
            false if !bucket.tasks.is_empty() => '+',
            false => ' ',
        };
        line.push_str(&format!(" {:>2}{}", bucket.day, mark));
        column += 1;
        if column == 7 {
            println!("{}", line.trim_end());
            line.clear();
            column = 0;
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }

    let busy: Vec<_> = grid.buckets.iter().filter(|b| !b.tasks.is_empty()).collect();
    if !busy.is_empty() {
        println!();
    }
    for bucket in busy {
        for task in &bucket.tasks {
            println!("  {}", task_line(task, reference));
        }
    }
}

pub fn import_report(report: &ImportReport) {
    println!(
        "Imported {} tasks ({} marked completed), skipped {}, failed {}",
        report.created, report.completed, report.skipped, report.failed
    );
}
