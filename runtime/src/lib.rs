//! # Tasklist Runtime
//!
//! Runtime implementation for the tasklist widget.
//!
//! This crate provides the [`Store`]: the single owner of the widget state. It
//! runs the reducer for every action, executes the returned effects, feeds any
//! actions they produce back into the reducer, and finally tells subscribers
//! that the state changed so views can be re-projected.
//!
//! Everything happens synchronously on the caller's thread. One `send` call
//! completes (reducer, effects, feedback, notification) before the next one
//! can start.
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Re-render after every change
//! store.subscribe(|state| render(state));
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tasklist_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// `send` was called while the store was already processing an action
        ///
        /// Typically a subscriber trying to dispatch from inside its
        /// notification. The action is dropped and state is unchanged.
        #[error("Store is already processing an action")]
        Reentrant,

        /// Effects kept feeding actions back past the per-send limit
        ///
        /// Actions processed before the limit was hit stay applied.
        #[error("Feedback loop exceeded {0} actions")]
        FeedbackLimit(usize),
    }
}

pub use error::StoreError;

/// Maximum number of actions (initial plus feedback) processed by one `send`
pub const MAX_ACTIONS_PER_SEND: usize = 64;

/// Identifies a subscription so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Guard that clears the dispatching flag on drop
///
/// Keeps the store usable even if a reducer or subscriber unwinds.
struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Cell, DispatchGuard, Effect, MAX_ACTIONS_PER_SEND, Rc, Reducer, RefCell, StoreError,
        SubscriptionId, VecDeque,
    };

    type Subscriber<S> = Rc<dyn Fn(&S)>;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind a `RefCell`; the store is single-threaded)
    /// 2. Reducer (component logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Subscribers (notified after every `send`)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: RefCell<S>,
        reducer: R,
        environment: E,
        subscribers: RefCell<Vec<(SubscriptionId, Subscriber<S>)>>,
        next_subscription: Cell<u64>,
        dispatching: Cell<bool>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: RefCell::new(initial_state),
                reducer,
                environment,
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                dispatching: Cell::new(false),
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, executes the returned effects, processes every
        /// action those effects feed back (in FIFO order), then notifies
        /// subscribers once with the final state.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Reentrant`] if called while another `send` is in
        ///   progress (e.g. from a subscriber)
        /// - [`StoreError::FeedbackLimit`] if effects produced more than
        ///   [`MAX_ACTIONS_PER_SEND`] actions; subscribers are still notified
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) -> Result<(), StoreError> {
            if self.dispatching.replace(true) {
                tracing::warn!(?action, "Rejected re-entrant action");
                metrics::counter!("store.reentrant.rejected_actions").increment(1);
                return Err(StoreError::Reentrant);
            }
            let _guard = DispatchGuard(&self.dispatching);

            let mut queue = VecDeque::from([action]);
            let mut processed = 0_usize;
            let mut outcome = Ok(());

            while let Some(action) = queue.pop_front() {
                if processed == MAX_ACTIONS_PER_SEND {
                    tracing::warn!(
                        dropped = queue.len() + 1,
                        "Feedback limit reached, dropping remaining actions"
                    );
                    outcome = Err(StoreError::FeedbackLimit(MAX_ACTIONS_PER_SEND));
                    break;
                }
                processed += 1;
                self.process(action, &mut queue);
            }

            if processed > 1 {
                metrics::counter!("store.feedback.total").increment((processed - 1) as u64);
            }

            self.notify();
            tracing::debug!(processed, "Action processing completed");

            outcome
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let open = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.borrow();
            f(&state)
        }

        /// Register a callback invoked with the new state after every `send`
        ///
        /// Subscribers run in registration order. They must not call
        /// [`send`](Self::send); doing so returns [`StoreError::Reentrant`].
        pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
        where
            F: Fn(&S) + 'static,
        {
            let id = SubscriptionId(self.next_subscription.get());
            self.next_subscription.set(id.0 + 1);
            self.subscribers.borrow_mut().push((id, Rc::new(subscriber)));
            tracing::trace!(subscription = id.0, "Subscriber registered");
            id
        }

        /// Remove a subscriber; returns false if it was already gone
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let mut subscribers = self.subscribers.borrow_mut();
            let before = subscribers.len();
            subscribers.retain(|(existing, _)| *existing != id);
            before != subscribers.len()
        }

        fn process(&self, action: A, queue: &mut VecDeque<A>) {
            tracing::trace!(?action, "Processing action");
            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.borrow_mut();

                let span = tracing::trace_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                Self::execute_effect(effect, queue);
            }
        }

        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    for effect in effects {
                        Self::execute_effect(effect, queue);
                    }
                },
                Effect::Send(action) => {
                    tracing::trace!("Effect::Send queued an action");
                    queue.push_back(*action);
                },
                Effect::Run(run) => {
                    tracing::trace!("Executing Effect::Run");
                    metrics::counter!("store.effects.executed", "type" => "run").increment(1);
                    if let Some(action) = run() {
                        tracing::trace!("Effect::Run produced an action");
                        queue.push_back(action);
                    }
                },
            }
        }

        fn notify(&self) {
            // Snapshot, so callbacks may subscribe or unsubscribe; changes
            // take effect from the next `send`
            let subscribers: Vec<Subscriber<S>> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(_, subscriber)| Rc::clone(subscriber))
                .collect();
            tracing::trace!(count = subscribers.len(), "Notifying subscribers");

            let state = self.state.borrow();
            for subscriber in &subscribers {
                subscriber(&state);
            }
        }
    }
}

pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, Default)]
    struct TestState {
        value: i32,
        log: Vec<&'static str>,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        IncrementTwiceViaFeedback,
        Record(&'static str),
        RunEffect,
        Loop,
        NoOp,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::IncrementTwiceViaFeedback => smallvec![Effect::chain(vec![
                    Effect::send(TestAction::Increment),
                    Effect::send(TestAction::Increment),
                ])],
                TestAction::Record(entry) => {
                    state.log.push(entry);
                    smallvec![Effect::None]
                },
                TestAction::RunEffect => {
                    smallvec![Effect::run(|| Some(TestAction::Record("from run")))]
                },
                TestAction::Loop => smallvec![Effect::send(TestAction::Loop)],
                TestAction::NoOp => SmallVec::new(),
            }
        }
    }

    fn store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState::default(), TestReducer, ())
    }

    #[test]
    fn test_send_applies_reducer() {
        let store = store();
        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(store.state(|s| s.value), 1);
    }

    #[test]
    fn test_feedback_actions_processed_in_same_send() {
        let store = store();
        assert!(store.send(TestAction::IncrementTwiceViaFeedback).is_ok());
        assert_eq!(store.state(|s| s.value), 2);
    }

    #[test]
    fn test_run_effect_feeds_back_action() {
        let store = store();
        assert!(store.send(TestAction::RunEffect).is_ok());
        assert_eq!(store.state(|s| s.log.clone()), vec!["from run"]);
    }

    #[test]
    fn test_subscribers_notified_once_per_send() {
        let store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |state: &TestState| sink.borrow_mut().push(state.value));

        let _ = store.send(TestAction::IncrementTwiceViaFeedback);
        let _ = store.send(TestAction::NoOp);

        assert_eq!(*seen.borrow(), vec![2, 2]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = store();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = store.subscribe(move |_: &TestState| counter.set(counter.get() + 1));

        let _ = store.send(TestAction::Increment);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        let _ = store.send(TestAction::Increment);

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_reentrant_send_is_rejected() {
        let store = Rc::new(store());
        let errors = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::downgrade(&store);
        let sink = Rc::clone(&errors);
        store.subscribe(move |_: &TestState| {
            if let Some(store) = inner.upgrade() {
                if let Err(error) = store.send(TestAction::Increment) {
                    sink.borrow_mut().push(error);
                }
            }
        });

        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(*errors.borrow(), vec![StoreError::Reentrant]);
        assert_eq!(store.state(|s| s.value), 1);

        // The store stays usable afterwards
        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(store.state(|s| s.value), 2);
    }

    #[test]
    fn test_subscribers_can_change_subscriptions_while_notified() {
        let store = Rc::new(store());
        let late_calls = Rc::new(Cell::new(0));
        let own_id = Rc::new(Cell::new(None));

        let inner = Rc::downgrade(&store);
        let counter = Rc::clone(&late_calls);
        let own = Rc::clone(&own_id);
        let id = store.subscribe(move |_: &TestState| {
            let Some(store) = inner.upgrade() else { return };
            let counter = Rc::clone(&counter);
            store.subscribe(move |_: &TestState| counter.set(counter.get() + 1));
            if let Some(id) = own.get() {
                assert!(store.unsubscribe(id));
            }
        });
        own_id.set(Some(id));

        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(late_calls.get(), 0);

        // The first subscriber is gone; the one it added now runs
        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(late_calls.get(), 1);
        assert_eq!(store.state(|s| s.value), 2);
    }

    #[test]
    fn test_runaway_feedback_is_cut_off() {
        let store = store();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(move |_: &TestState| counter.set(counter.get() + 1));

        assert_eq!(
            store.send(TestAction::Loop),
            Err(StoreError::FeedbackLimit(MAX_ACTIONS_PER_SEND))
        );
        assert_eq!(calls.get(), 1);
        assert!(store.send(TestAction::Increment).is_ok());
    }
}
