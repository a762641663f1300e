//! Filtering and summary counts, derived from the task collection.

use crate::types::{Filter, Task};

/// Tasks passing `filter`, lazily, in collection order
pub fn visible<'a, I>(tasks: I, filter: Filter) -> impl Iterator<Item = &'a Task> + 'a
where
    I: IntoIterator<Item = &'a Task>,
    I::IntoIter: 'a,
{
    tasks.into_iter().filter(move |task| filter.matches(task))
}

/// Total/active/done counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Every task
    pub total: usize,
    /// Tasks not yet done
    pub active: usize,
    /// Completed tasks
    pub done: usize,
}

/// Counts the tasks; `active` is always `total - done`
pub fn summary<'a, I>(tasks: I) -> Summary
where
    I: IntoIterator<Item = &'a Task>,
{
    let (total, done) = tasks
        .into_iter()
        .fold((0, 0), |(total, done), task| (total + 1, done + usize::from(task.done)));
    Summary {
        total,
        active: total - done,
        done,
    }
}
