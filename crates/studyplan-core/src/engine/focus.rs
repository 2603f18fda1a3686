//! "What should I work on now" selection.

use crate::domain::{Priority, Task};

/// Pick the focus task from today's tasks.
///
/// First open `High` task in iteration order, else the first open task of any
/// priority, else `None`. Ties are broken by position only.
pub fn select_focus_task<'a, I>(tasks: I) -> Option<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut first_open = None;
    for task in tasks.into_iter().filter(|t| !t.completed) {
        if task.priority == Priority::High {
            return Some(task);
        }
        first_open.get_or_insert(task);
    }
    first_open
}
