//! # Tasklist Testing
//!
//! Testing utilities and helpers for the tasklist widget.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - The [`ReducerTest`] Given/When/Then builder
//! - Assertion helpers and a synchronous effect executor
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(TaskListReducer)
//!     .with_env(test_environment())
//!     .given_state(TaskList::default())
//!     .when_action(AppAction::AddTask { text: "Buy milk".into() })
//!     .then_state(|todos| assert_eq!(todos.len(), 1))
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use tasklist_core::environment::{Clock, IdGenerator, KeyValueStore, StorageError};


/// Mock implementations of Environment traits
///
/// - `FixedClock`: Deterministic time
/// - `SequentialIds`: Predictable identifiers
/// - `MemoryStorage`: In-memory key/value store that records writes
/// - `FailingStorage`: Key/value store whose every access fails
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, KeyValueStore, StorageError, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::FixedClock;
    /// use tasklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Identifier generator counting up from a known start
    #[derive(Debug)]
    pub struct SequentialIds {
        next: AtomicU64,
    }

    impl SequentialIds {
        /// Ids start at `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }
    }

    impl Default for SequentialIds {
        fn default() -> Self {
            Self::starting_at(1)
        }
    }

    impl IdGenerator for SequentialIds {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::SeqCst)
        }

        fn advance_past(&self, id: u64) {
            self.next.fetch_max(id.saturating_add(1), Ordering::SeqCst);
        }
    }

    /// In-memory key/value store
    ///
    /// Counts writes so tests can assert that no-ops skip persistence.
    #[derive(Debug, Default)]
    pub struct MemoryStorage {
        slots: Mutex<HashMap<String, String>>,
        writes: AtomicUsize,
    }

    impl MemoryStorage {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-populated with raw slot contents
        #[must_use]
        pub fn with_slots<I, K, V>(slots: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<String>,
            V: Into<String>,
        {
            let storage = Self::new();
            for (key, value) in slots {
                storage.put_raw(key, value);
            }
            storage
        }

        /// Write raw text without counting it as a write
        pub fn put_raw(&self, key: impl Into<String>, value: impl Into<String>) {
            self.lock().insert(key.into(), value.into());
        }

        /// Read raw text
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.lock().get(key).cloned()
        }

        /// Number of successful `set` calls so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
            // A poisoned map is still a valid map
            self.slots
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    impl KeyValueStore for MemoryStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.lock().insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Key/value store that rejects every read and write
    ///
    /// Stands in for disabled storage or an exhausted quota.
    #[derive(Debug, Default)]
    pub struct FailingStorage {
        attempts: AtomicUsize,
    }

    impl FailingStorage {
        /// Create a failing store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of reads and writes attempted
        #[must_use]
        pub fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use tasklist_core::effect::Effect;

    /// Execute effects the way the runtime would, collecting fed-back actions
    ///
    /// Lets reducer tests check what a `Run` effect actually does (for
    /// example, what it wrote to a [`MemoryStorage`](crate::mocks::MemoryStorage))
    /// without a full store.
    pub fn execute_effects<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut produced = Vec::new();
        for effect in effects {
            execute_into(effect, &mut produced);
        }
        produced
    }

    fn execute_into<A>(effect: Effect<A>, produced: &mut Vec<A>) {
        match effect {
            Effect::None => {},
            Effect::Sequential(effects) => {
                for effect in effects {
                    execute_into(effect, produced);
                }
            },
            Effect::Send(action) => produced.push(*action),
            Effect::Run(run) => produced.extend(run()),
        }
    }
}

// Re-export commonly used items
pub use helpers::execute_effects;
pub use mocks::{FailingStorage, FixedClock, MemoryStorage, SequentialIds, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::effect::Effect;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_sequential_ids_skip_past_seen_ids() {
        let ids = SequentialIds::default();
        assert_eq!(ids.next_id(), 1);
        ids.advance_past(10);
        assert_eq!(ids.next_id(), 11);
        ids.advance_past(3);
        assert_eq!(ids.next_id(), 12);
    }

    #[test]
    fn test_memory_storage_counts_writes_only() {
        let storage = MemoryStorage::with_slots([("filter", "\"done\"")]);
        assert_eq!(storage.write_count(), 0);
        assert!(matches!(storage.get("filter"), Ok(Some(raw)) if raw == "\"done\""));

        assert!(storage.set("todos", "[]").is_ok());
        assert_eq!(storage.write_count(), 1);
        assert_eq!(storage.raw("todos").as_deref(), Some("[]"));
        assert!(matches!(storage.get("missing"), Ok(None)));
    }

    #[test]
    fn test_failing_storage_fails_everything() {
        let storage = FailingStorage::new();
        assert!(storage.get("todos").is_err());
        assert!(storage.set("todos", "[]").is_err());
        assert_eq!(storage.attempts(), 2);
    }

    #[test]
    fn test_execute_effects_collects_feedback() {
        let effects = vec![
            Effect::None,
            Effect::chain(vec![Effect::send(1), Effect::run(|| Some(2))]),
            Effect::run(|| None),
        ];
        assert_eq!(execute_effects(effects), vec![1, 2]);
    }
}
