//! Root composition.
//!
//! [`TaskApp`] owns the canonical page state inside a [`Store`] running the
//! page reducer. Every intent goes through [`Store::send`]; views are
//! re-projected from the new state after each one.

use crate::persist;
use crate::projection::{self, Summary};
use crate::reducer::{AppEnvironment, AppReducer, app_reducer};
use crate::types::{AppAction, AppState, Filter, TaskId, TaskList};
use crate::view::PageView;
use tasklist_runtime::{Store, StoreError, SubscriptionId};

/// Store type driving the page
pub type AppStore = Store<AppState, AppAction, AppEnvironment, AppReducer>;

/// The task list page
pub struct TaskApp {
    store: AppStore,
}

impl TaskApp {
    /// Loads persisted state and builds the page
    ///
    /// Unreadable slots fall back to an empty list and the `all` filter. The
    /// id generator is moved past every loaded id.
    #[must_use]
    pub fn open(env: AppEnvironment) -> Self {
        let state = persist::restore(env.storage.as_ref());
        if let Some(max) = state.todos.max_id() {
            env.ids.advance_past(max.get());
        }
        tracing::info!(
            tasks = state.todos.len(),
            filter = %state.filter,
            "Task list loaded"
        );

        Self {
            store: Store::new(state, app_reducer(), env),
        }
    }

    /// Replaces the input field's text
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn edit_input(&self, text: impl Into<String>) -> Result<(), StoreError> {
        self.store.send(AppAction::EditInput { text: text.into() })
    }

    /// Submits the input field
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn submit_input(&self) -> Result<(), StoreError> {
        self.store.send(AppAction::SubmitInput)
    }

    /// Types `text` into the input field and submits it, as one change
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn enter_input(&self, text: impl Into<String>) -> Result<(), StoreError> {
        self.store.send(AppAction::EnterInput { text: text.into() })
    }

    /// Adds a task directly, bypassing the input field
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn add(&self, text: impl Into<String>) -> Result<(), StoreError> {
        self.store.send(AppAction::AddTask { text: text.into() })
    }

    /// Flips a task's completion flag
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn toggle(&self, id: TaskId) -> Result<(), StoreError> {
        self.store.send(AppAction::ToggleTask { id })
    }

    /// Removes a task
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.store.send(AppAction::DeleteTask { id })
    }

    /// Selects the filter
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store rejects the action.
    pub fn select_filter(&self, filter: Filter) -> Result<(), StoreError> {
        self.store.send(AppAction::SelectFilter { filter })
    }

    /// Projects the current page
    #[must_use]
    pub fn view(&self) -> PageView {
        self.store.state(PageView::project)
    }

    /// Snapshot of the task collection
    #[must_use]
    pub fn todos(&self) -> TaskList {
        self.store.state(|s| s.todos.clone())
    }

    /// Current filter
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.store.state(|s| s.filter)
    }

    /// Current summary counts
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.store.state(|s| projection::summary(&s.todos))
    }

    /// Current input field text
    #[must_use]
    pub fn draft(&self) -> String {
        self.store.state(|s| s.input.draft.clone())
    }

    /// Calls `render` with a fresh projection after every change
    pub fn on_render<F>(&self, render: F) -> SubscriptionId
    where
        F: Fn(&PageView) + 'static,
    {
        self.store
            .subscribe(move |state| render(&PageView::project(state)))
    }

    /// Stops a callback registered with [`on_render`](Self::on_render)
    pub fn remove_render(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }
}

impl std::fmt::Debug for TaskApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.store.state(|state| {
            f.debug_struct("TaskApp")
                .field("tasks", &state.todos.len())
                .field("filter", &state.filter)
                .finish_non_exhaustive()
        })
    }
}
