//! # Tasklist Core
//!
//! Core traits and types for the tasklist widget.
//!
//! The widget is built from small reducers, each owning one slice of the
//! page state. This crate provides the abstractions they share.
//!
//! ## Core Concepts
//!
//! - **State**: Owned, cloneable domain data for a component
//! - **Action**: Every user intent a component reacts to
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions, executed later by the runtime
//! - **Environment**: Injected dependencies (clock, id generator, storage)
//!
//! ## Example
//!
//! ```
//! use tasklist_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: u32,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let _ = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! ```

// Re-export commonly used types
pub use smallvec::{smallvec, SmallVec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Reducer module - The core trait for component logic
///
/// Reducers are deterministic functions: `(State, Action, Environment) → (State, Effects)`.
/// All I/O they need is returned as [`Effect`](crate::effect::Effect) values.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for component logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state slice this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns the effects the runtime must
        /// execute afterwards. Actions a reducer does not care about must leave
        /// state untouched.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. Reducers return them and the runtime
/// executes them after the state change has been applied.
pub mod effect {
    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Feed an action straight back into the store
        Send(Box<Action>),

        /// Arbitrary synchronous computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Run(Box<dyn FnOnce() -> Option<Action>>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Send(action) => f.debug_tuple("Effect::Send").field(action).finish(),
                Effect::Run(_) => write!(f, "Effect::Run(<closure>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Feed `action` back into the store once the current action is reduced
        #[must_use]
        pub fn send(action: Action) -> Effect<Action> {
            Effect::Send(Box::new(action))
        }

        /// Wrap a synchronous side effect
        #[must_use]
        pub fn run<F>(f: F) -> Effect<Action>
        where
            F: FnOnce() -> Option<Action> + 'static,
        {
            Effect::Run(Box::new(f))
        }

        /// Returns true for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// Everything a reducer cannot compute from its inputs (time, fresh
/// identifiers, durable storage) is reached through these traits.
pub mod environment {
    use chrono::{DateTime, Utc};
    use thiserror::Error;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of unique task identifiers
    pub trait IdGenerator: Send + Sync {
        /// Returns an identifier strictly greater than any handed out before
        fn next_id(&self) -> u64;

        /// Guarantees every later [`next_id`](Self::next_id) is greater than `id`
        fn advance_past(&self, id: u64);
    }

    /// Errors raised by a [`KeyValueStore`]
    #[derive(Error, Debug)]
    pub enum StorageError {
        /// The key contains characters the store cannot address
        #[error("Invalid storage key: {0:?}")]
        InvalidKey(String),

        /// Reading or writing the underlying medium failed
        #[error("Storage I/O failed for key {key:?}: {source}")]
        Io {
            /// Key being accessed
            key: String,
            /// Underlying error
            #[source]
            source: std::io::Error,
        },

        /// The store refuses all access (disabled, quota exhausted, ...)
        #[error("Storage unavailable: {0}")]
        Unavailable(String),
    }

    /// Durable, synchronous, string-keyed storage
    ///
    /// Values are opaque text; serialization is the caller's concern.
    pub trait KeyValueStore: Send + Sync {
        /// Read the raw text stored at `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the medium cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Replace the raw text stored at `key`
        ///
        /// # Errors
        ///
        /// Returns [`StorageError`] if the medium cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }
}
