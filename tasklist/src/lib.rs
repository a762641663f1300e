//! Single-page task list.
//!
//! Users add short text items, mark them complete, delete them and filter the
//! visible list by completion state. The task collection and the selected
//! filter survive restarts through a [`KeyValueStore`](tasklist_core::environment::KeyValueStore).
//!
//! The page is built from three components (task list, filter control and
//! input field), each a reducer over its own slice of [`AppState`]. The
//! [`TaskApp`] root composition owns the state in a store, and views are
//! re-projected into a [`PageView`] after every change.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasklist::{AppEnvironment, FileStore, TaskApp};
//!
//! # fn example() -> Result<(), tasklist_runtime::StoreError> {
//! let env = AppEnvironment::production(Arc::new(FileStore::new(".tasklist")));
//! let app = TaskApp::open(env);
//!
//! app.on_render(|page| println!("{page}"));
//!
//! app.edit_input("Buy milk")?;
//! app.submit_input()?;
//!
//! let summary = app.summary();
//! assert_eq!(summary.total, summary.active + summary.done);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod ids;
pub mod persist;
pub mod projection;
pub mod reducer;
pub mod storage;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::TaskApp;
pub use config::Config;
pub use ids::ClockIds;
pub use projection::Summary;
pub use reducer::{AppEnvironment, AppReducer, app_reducer};
pub use storage::FileStore;
pub use types::{AppAction, AppState, Filter, InputState, Task, TaskId, TaskList};
pub use view::{ListView, PageView};
