//! Reducer composition utilities
//!
//! The widget is one page made of several components. Each component is a
//! reducer over its own state slice; these helpers glue them together:
//!
//! - **`scope_reducer`**: Focus a reducer on one field of a larger state
//! - **`combine_reducers`**: Run several reducers on the same state/action
//!
//! # Examples
//!
//! ```
//! use tasklist_core::{Reducer, Effect, smallvec, SmallVec};
//! use tasklist_core::composition::{combine_reducers, scope_reducer};
//!
//! #[derive(Clone, Default)]
//! struct PageState {
//!     draft: String,
//!     submissions: u32,
//! }
//!
//! #[derive(Clone)]
//! enum PageAction {
//!     Edit(String),
//!     Submit,
//! }
//!
//! struct DraftReducer;
//! struct SubmitCounter;
//!
//! impl Reducer for DraftReducer {
//!     type State = String;
//!     type Action = PageAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, draft: &mut String, action: PageAction, _env: &()) -> SmallVec<[Effect<PageAction>; 4]> {
//!         match action {
//!             PageAction::Edit(text) => *draft = text,
//!             PageAction::Submit => draft.clear(),
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! impl Reducer for SubmitCounter {
//!     type State = u32;
//!     type Action = PageAction;
//!     type Environment = ();
//!
//!     fn reduce(&self, count: &mut u32, action: PageAction, _env: &()) -> SmallVec<[Effect<PageAction>; 4]> {
//!         if matches!(action, PageAction::Submit) {
//!             *count += 1;
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let page = combine_reducers(vec![
//!     Box::new(scope_reducer(
//!         DraftReducer,
//!         |s: &PageState| &s.draft,
//!         |s: &mut PageState, draft| s.draft = draft,
//!     )),
//!     Box::new(scope_reducer(
//!         SubmitCounter,
//!         |s: &PageState| &s.submissions,
//!         |s: &mut PageState, n| s.submissions = n,
//!     )),
//! ]);
//!
//! let mut state = PageState::default();
//! let _ = page.reduce(&mut state, PageAction::Edit("Buy milk".into()), &());
//! let _ = page.reduce(&mut state, PageAction::Submit, &());
//! assert_eq!(state.draft, "");
//! assert_eq!(state.submissions, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;

/// Boxed reducer over a shared state/action/environment triple
pub type BoxedReducer<S, A, E> = Box<dyn Reducer<State = S, Action = A, Environment = E>>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Each reducer sees every action, in registration order, and all effects are
/// concatenated in that same order.
#[must_use]
pub fn combine_reducers<S, A, E>(reducers: Vec<BoxedReducer<S, A, E>>) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<BoxedReducer<S, A, E>>,
}

impl<S, A, E> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    /// Number of reducers combined
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Returns true if no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> smallvec::SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = smallvec::SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects.into_iter().filter(|effect| !effect.is_none()));
        }

        all_effects
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// The child reducer works on a copy of the slice; the updated copy then
/// replaces the original, so the parent only ever sees whole new values.
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// A scoped reducer that operates on a subset of state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<(A, E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> smallvec::SmallVec<[Effect<Self::Action>; 4]> {
        let mut sub_state = (self.get_state)(state).clone();

        let effects = self.reducer.reduce(&mut sub_state, action, env);

        (self.set_state)(state, sub_state);

        effects
    }
}
