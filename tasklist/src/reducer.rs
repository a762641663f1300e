//! Reducers for the task list page.
//!
//! The page is three components, each owning one slice of [`AppState`]:
//!
//! - [`TaskListReducer`]: the task collection, persisted on every change
//! - [`FilterReducer`]: the selected filter, persisted on every change
//! - [`InputReducer`]: the input field, which hands submitted text to the
//!   task list as an [`AppAction::AddTask`]
//!
//! [`app_reducer`] scopes and combines them into the page reducer.

use crate::ids::ClockIds;
use crate::persist::{self, FILTER_KEY, TODOS_KEY};
use crate::types::{AppAction, AppState, Filter, InputState, Task, TaskId, TaskList};
use std::sync::Arc;
use tasklist_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use tasklist_core::environment::{IdGenerator, KeyValueStore, SystemClock};
use tasklist_core::{Effect, Reducer, SmallVec, smallvec};

/// Environment dependencies for the page reducers
#[derive(Clone)]
pub struct AppEnvironment {
    /// Source of task identifiers
    pub ids: Arc<dyn IdGenerator>,
    /// Where the `todos` and `filter` slots live
    pub storage: Arc<dyn KeyValueStore>,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { ids, storage }
    }

    /// Environment with clock-based ids over the given storage
    #[must_use]
    pub fn production(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::new(Arc::new(ClockIds::new(Arc::new(SystemClock))), storage)
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment").finish_non_exhaustive()
    }
}

/// Owns the task collection
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    fn persist(todos: &TaskList, env: &AppEnvironment) -> SmallVec<[Effect<AppAction>; 4]> {
        smallvec![persist::save_effect(&env.storage, TODOS_KEY, todos.clone())]
    }
}

impl Reducer for TaskListReducer {
    type State = TaskList;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        todos: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::AddTask { text } => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::debug!("Ignoring blank task");
                    return SmallVec::new();
                }

                let id = TaskId::new(env.ids.next_id());
                todos.prepend(Task::new(id, text.to_string()));
                tracing::debug!(%id, total = todos.len(), "Task added");
                Self::persist(todos, env)
            },

            AppAction::ToggleTask { id } => {
                if !todos.toggle(id) {
                    tracing::debug!(%id, "Toggle for unknown task ignored");
                    return SmallVec::new();
                }
                Self::persist(todos, env)
            },

            AppAction::DeleteTask { id } => {
                if !todos.remove(id) {
                    tracing::debug!(%id, "Delete for unknown task ignored");
                    return SmallVec::new();
                }
                tracing::debug!(%id, total = todos.len(), "Task deleted");
                Self::persist(todos, env)
            },

            AppAction::EditInput { .. }
            | AppAction::SubmitInput
            | AppAction::EnterInput { .. }
            | AppAction::SelectFilter { .. } => SmallVec::new(),
        }
    }
}

/// Owns the selected filter
#[derive(Clone, Copy, Debug, Default)]
pub struct FilterReducer;

impl Reducer for FilterReducer {
    type State = Filter;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        current: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::SelectFilter { filter } if filter != *current => {
                *current = filter;
                tracing::debug!(%filter, "Filter selected");
                smallvec![persist::save_effect(&env.storage, FILTER_KEY, filter)]
            },
            _ => SmallVec::new(),
        }
    }
}

/// Owns the input field
///
/// Never touches storage; a submission is handed on as a feedback action.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputReducer;

impl InputReducer {
    fn submit(input: &mut InputState) -> SmallVec<[Effect<AppAction>; 4]> {
        let text = input.draft.trim();
        if text.is_empty() {
            // Whitespace stays in the field, as typed
            return SmallVec::new();
        }
        let text = text.to_string();
        input.draft.clear();
        smallvec![Effect::send(AppAction::AddTask { text })]
    }
}

impl Reducer for InputReducer {
    type State = InputState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        input: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AppAction::EditInput { text } => {
                input.draft = text;
                SmallVec::new()
            },

            AppAction::SubmitInput => Self::submit(input),

            AppAction::EnterInput { text } => {
                input.draft = text;
                Self::submit(input)
            },

            _ => SmallVec::new(),
        }
    }
}

/// The whole-page reducer
pub type AppReducer = CombinedReducer<AppState, AppAction, AppEnvironment>;

/// Builds the page reducer from its components
#[must_use]
pub fn app_reducer() -> AppReducer {
    combine_reducers(vec![
        Box::new(scope_reducer(
            TaskListReducer,
            |s: &AppState| &s.todos,
            |s: &mut AppState, todos| s.todos = todos,
        )),
        Box::new(scope_reducer(
            FilterReducer,
            |s: &AppState| &s.filter,
            |s: &mut AppState, filter| s.filter = filter,
        )),
        Box::new(scope_reducer(
            InputReducer,
            |s: &AppState| &s.input,
            |s: &mut AppState, input| s.input = input,
        )),
    ])
}
