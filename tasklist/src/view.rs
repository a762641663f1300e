//! Page projection.
//!
//! [`PageView::project`] turns the root state into everything the page shows:
//! header, summary cards, input field, filter row and the visible rows. The
//! view is plain data; its [`Display`](std::fmt::Display) impl renders it as
//! text for a terminal.

use crate::projection::{Summary, summary, visible};
use crate::types::{AppState, Filter, TaskId};
use std::fmt;

/// Page title
pub const TITLE: &str = "To Do App";
/// Line under the title
pub const SUBTITLE: &str = "Stay organized, stay productive";
/// Input field placeholder
pub const INPUT_PLACEHOLDER: &str = "What needs to be done?";
/// Submit button label
pub const SUBMIT_LABEL: &str = "+ Add";
/// Label in front of the filter options
pub const FILTER_LABEL: &str = "Filter by:";
/// Heading shown when no row is visible
pub const EMPTY_HEADING: &str = "No todos yet";
/// Hint shown under [`EMPTY_HEADING`]
pub const EMPTY_HINT: &str = "Add your first todo above!";
/// Label of the per-row delete action
pub const DELETE_LABEL: &str = "Delete";

/// Everything the page shows for one state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageView {
    /// Summary cards
    pub summary: Summary,
    /// Input field
    pub input: InputView,
    /// Filter row, in display order
    pub filters: [FilterOption; 3],
    /// Visible rows or the placeholder
    pub list: ListView,
}

/// The input field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputView {
    /// Current text
    pub draft: String,
}

/// One option of the filter row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterOption {
    /// Filter this option selects
    pub filter: Filter,
    /// Whether it is the current filter
    pub selected: bool,
}

/// The task list area
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListView {
    /// Nothing passes the filter (or there are no tasks)
    Empty,
    /// Visible tasks, in collection order
    Rows(Vec<ItemRow>),
}

/// A visible task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemRow {
    /// Identifier the toggle and delete actions address
    pub id: TaskId,
    /// Task text
    pub text: String,
    /// Checkbox state
    pub done: bool,
}

impl ListView {
    /// Row at a 1-based position, as numbered on screen
    #[must_use]
    pub fn row(&self, position: usize) -> Option<&ItemRow> {
        match self {
            Self::Empty => None,
            Self::Rows(rows) => position.checked_sub(1).and_then(|i| rows.get(i)),
        }
    }

    /// Number of visible rows
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Rows(rows) => rows.len(),
        }
    }

    /// Returns true when the placeholder is shown
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl PageView {
    /// Projects the page from the root state
    #[must_use]
    pub fn project(state: &AppState) -> Self {
        let rows: Vec<ItemRow> = visible(&state.todos, state.filter)
            .map(|task| ItemRow {
                id: task.id,
                text: task.text.clone(),
                done: task.done,
            })
            .collect();

        Self {
            summary: summary(&state.todos),
            input: InputView {
                draft: state.input.draft.clone(),
            },
            filters: Filter::OPTIONS.map(|filter| FilterOption {
                filter,
                selected: filter == state.filter,
            }),
            list: if rows.is_empty() {
                ListView::Empty
            } else {
                ListView::Rows(rows)
            },
        }
    }
}

impl fmt::Display for PageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{SUBTITLE}")?;
        writeln!(f)?;

        let Summary {
            total,
            active,
            done,
        } = self.summary;
        writeln!(f, "Total: {total}  Active: {active}  Done: {done}")?;
        writeln!(f)?;

        if self.input.draft.is_empty() {
            writeln!(f, "[ {INPUT_PLACEHOLDER} ] {SUBMIT_LABEL}")?;
        } else {
            writeln!(f, "[ {} ] {SUBMIT_LABEL}", self.input.draft)?;
        }

        write!(f, "{FILTER_LABEL}")?;
        for option in &self.filters {
            if option.selected {
                write!(f, " ({})", option.filter.label())?;
            } else {
                write!(f, " {}", option.filter.label())?;
            }
        }
        writeln!(f)?;
        writeln!(f)?;

        match &self.list {
            ListView::Empty => {
                writeln!(f, "{EMPTY_HEADING}")?;
                write!(f, "{EMPTY_HINT}")
            },
            ListView::Rows(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    let mark = if row.done { 'x' } else { ' ' };
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{:>2}. [{mark}] {}  <{DELETE_LABEL}>", i + 1, row.text)?;
                }
                Ok(())
            },
        }
    }
}
