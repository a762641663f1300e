//! Domain types for the task list widget.
//!
//! A task list is an ordered, newest-first collection of short text items
//! that can be added, toggled and deleted, plus the filter selecting which of
//! them are on screen and the transient text of the input field.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a task
///
/// Milliseconds since the Unix epoch at creation, made strictly increasing
/// by the id generator, so ordering by id is ordering by recency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Wraps a raw identifier
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// What needs to be done (trimmed, never empty when created here)
    pub text: String,
    /// Whether the task is completed
    pub done: bool,
}

impl Task {
    /// Creates an open task
    #[must_use]
    pub const fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            done: false,
        }
    }

    /// Copy of this task with `done` inverted
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            done: !self.done,
            ..self.clone()
        }
    }
}

/// The ordered task collection, newest first
///
/// Serializes as a bare JSON array of tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    /// Creates an empty list
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Number of tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates tasks newest first
    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.0.iter()
    }

    /// Tasks as a slice, newest first
    #[must_use]
    pub fn as_slice(&self) -> &[Task] {
        &self.0
    }

    /// Returns a task by ID
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.0.iter().find(|task| task.id == id)
    }

    /// Largest identifier in the list
    #[must_use]
    pub fn max_id(&self) -> Option<TaskId> {
        self.0.iter().map(|task| task.id).max()
    }

    /// Puts `task` at the front
    pub fn prepend(&mut self, task: Task) {
        self.0.insert(0, task);
    }

    /// Replaces every task matching `id` with its toggled copy
    ///
    /// Returns false (and changes nothing) if no task has that id.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let mut found = false;
        for task in self.0.iter_mut().filter(|task| task.id == id) {
            *task = task.toggled();
            found = true;
        }
        found
    }

    /// Removes every task matching `id`
    ///
    /// Returns false (and changes nothing) if no task has that id.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.0.len();
        self.0.retain(|task| task.id != id);
        before != self.0.len()
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self(tasks)
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which tasks are on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet done
    Active,
    /// Completed tasks
    Done,
}

impl Filter {
    /// Every filter, in the order the filter control shows them
    pub const OPTIONS: [Self; 3] = [Self::All, Self::Active, Self::Done];

    /// Whether `task` passes this filter
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.done,
            Self::Done => task.done,
        }
    }

    /// Stored name (`all`, `active`, `done`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Done => "done",
        }
    }

    /// Label shown on the filter control
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Done => "Completed",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that names no filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown filter {0:?} (expected all, active or done)")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "done" | "completed" => Ok(Self::Done),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}

/// Transient contents of the input field (never persisted)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    /// Text typed so far
    pub draft: String,
}

/// Whole-page state owned by the root composition
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    /// Canonical task collection (persisted in the `todos` slot)
    pub todos: TaskList,
    /// Active filter (persisted in the `filter` slot)
    pub filter: Filter,
    /// Input field
    pub input: InputState,
}

/// Every intent the widget reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    // ========== Input component ==========
    /// The input field's text changed
    EditInput {
        /// New field contents
        text: String,
    },

    /// The input form was submitted
    SubmitInput,

    /// Text typed into the input field and submitted at once
    EnterInput {
        /// Field contents at submission
        text: String,
    },

    // ========== Task list ==========
    /// Add a task with the given text
    AddTask {
        /// Task text (trimmed by the reducer)
        text: String,
    },

    /// Flip a task's completion flag
    ToggleTask {
        /// Task to toggle
        id: TaskId,
    },

    /// Remove a task
    DeleteTask {
        /// Task to delete
        id: TaskId,
    },

    // ========== Filter control ==========
    /// Select which tasks are shown
    SelectFilter {
        /// Filter to apply
        filter: Filter,
    },
}
