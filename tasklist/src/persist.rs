//! Persistent store adapter.
//!
//! Reads and writes whole values in named slots of a [`KeyValueStore`],
//! serialized as JSON. Every failure degrades to "use the default" on load
//! and "do nothing" on save; the error is logged and never returned.

use crate::types::{AppState, Filter, InputState, TaskList};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tasklist_core::effect::Effect;
use tasklist_core::environment::KeyValueStore;

/// Slot holding the task collection
pub const TODOS_KEY: &str = "todos";

/// Slot holding the selected filter
pub const FILTER_KEY: &str = "filter";

/// Reads the value stored at `key`, or `default` if that is not possible
///
/// Absent, empty, unreadable and undecodable slots all yield `default`.
pub fn load<S, T>(storage: &S, key: &str, default: T) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match storage.get(key) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => {
            tracing::debug!(key, "Slot empty, using default");
            return default;
        },
        Err(error) => {
            tracing::warn!(key, %error, "Failed to read slot, using default");
            return default;
        },
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, %error, "Slot holds undecodable data, using default");
            default
        },
    }
}

/// Serializes `value` and writes it to `key`; failures are logged and dropped
pub fn save<S, T>(storage: &S, key: &str, value: &T)
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(key, %error, "Failed to serialize slot, skipping write");
            return;
        },
    };

    match storage.set(key, &raw) {
        Ok(()) => tracing::trace!(key, bytes = raw.len(), "Slot written"),
        Err(error) => tracing::warn!(key, %error, "Failed to write slot, change kept in memory only"),
    }
}

/// Describes a [`save`] of `value` to run once the reducer has returned
pub fn save_effect<A, T>(storage: &Arc<dyn KeyValueStore>, key: &'static str, value: T) -> Effect<A>
where
    T: Serialize + 'static,
{
    let storage = Arc::clone(storage);
    Effect::run(move || {
        save(storage.as_ref(), key, &value);
        None
    })
}

/// Loads the persisted parts of the page state
///
/// The input field always starts empty.
pub fn restore<S>(storage: &S) -> AppState
where
    S: KeyValueStore + ?Sized,
{
    AppState {
        todos: load(storage, TODOS_KEY, TaskList::new()),
        filter: load(storage, FILTER_KEY, Filter::All),
        input: InputState::default(),
    }
}
