//! Integration tests for a Store driving composed reducers
//!
//! A form component hands submitted text to a list component through a
//! feedback action; the store must apply both before subscribers see the
//! state.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tasklist_core::composition::{CombinedReducer, combine_reducers, scope_reducer};
use tasklist_core::{Effect, Reducer, SmallVec, smallvec};
use tasklist_runtime::{Store, StoreError};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, Default)]
struct PageState {
    draft: String,
    items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum PageAction {
    Type(String),
    Submit,
    Append(String),
}

#[derive(Clone, Default)]
struct PageEnv {
    saves: Arc<AtomicUsize>,
}

struct FormReducer;
struct ListReducer;

impl Reducer for FormReducer {
    type State = String;
    type Action = PageAction;
    type Environment = PageEnv;

    fn reduce(
        &self,
        draft: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PageAction::Type(text) => {
                *draft = text;
                SmallVec::new()
            },
            PageAction::Submit if !draft.is_empty() => {
                smallvec![Effect::send(PageAction::Append(std::mem::take(draft)))]
            },
            _ => SmallVec::new(),
        }
    }
}

impl Reducer for ListReducer {
    type State = Vec<String>;
    type Action = PageAction;
    type Environment = PageEnv;

    fn reduce(
        &self,
        items: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PageAction::Append(text) => {
                items.insert(0, text);
                let saves = Arc::clone(&env.saves);
                smallvec![Effect::run(move || {
                    saves.fetch_add(1, Ordering::SeqCst);
                    None
                })]
            },
            _ => SmallVec::new(),
        }
    }
}

type PageStore = Store<PageState, PageAction, PageEnv, CombinedReducer<PageState, PageAction, PageEnv>>;

fn page_store(env: PageEnv) -> PageStore {
    let reducer = combine_reducers(vec![
        Box::new(scope_reducer(
            FormReducer,
            |s: &PageState| &s.draft,
            |s: &mut PageState, draft| s.draft = draft,
        )),
        Box::new(scope_reducer(
            ListReducer,
            |s: &PageState| &s.items,
            |s: &mut PageState, items| s.items = items,
        )),
    ]);
    Store::new(PageState::default(), reducer, env)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn feedback_is_applied_before_subscribers_run() {
    let env = PageEnv::default();
    let saves = Arc::clone(&env.saves);
    let store = page_store(env);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |state: &PageState| {
        sink.borrow_mut().push((state.draft.clone(), state.items.clone()));
    });

    store.send(PageAction::Type("Buy milk".to_string())).unwrap();
    store.send(PageAction::Submit).unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("Buy milk".to_string(), Vec::new()));
    assert_eq!(seen[1], (String::new(), vec!["Buy milk".to_string()]));
    assert_eq!(saves.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_submit_changes_nothing() {
    let env = PageEnv::default();
    let saves = Arc::clone(&env.saves);
    let store = page_store(env);

    store.send(PageAction::Submit).unwrap();

    assert!(store.state(|s| s.items.is_empty()));
    assert_eq!(saves.load(Ordering::SeqCst), 0);
}

#[test]
fn newest_item_first() {
    let store = page_store(PageEnv::default());

    for text in ["A", "B"] {
        store.send(PageAction::Type(text.to_string())).unwrap();
        store.send(PageAction::Submit).unwrap();
    }

    assert_eq!(store.state(|s| s.items.clone()), ["B", "A"]);
}

#[test]
fn subscriber_cannot_send() {
    let store = Rc::new(page_store(PageEnv::default()));
    let result = Rc::new(RefCell::new(None));

    let inner = Rc::downgrade(&store);
    let sink = Rc::clone(&result);
    store.subscribe(move |_state: &PageState| {
        if let Some(store) = inner.upgrade() {
            *sink.borrow_mut() = Some(store.send(PageAction::Submit));
        }
    });

    store.send(PageAction::Type("x".to_string())).unwrap();

    assert_eq!(*result.borrow(), Some(Err(StoreError::Reentrant)));
    assert_eq!(store.state(|s| s.draft.clone()), "x");
}
