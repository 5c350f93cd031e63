use std::rc::Rc;

use yew::prelude::*;

use crate::models::selection::{Selection, SelectionAction};
use crate::services::persistence::{SelectionStore, SessionBackend};
use crate::utils::log;

/// Reducer state wrapping the normalized selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionState(pub Selection);

impl Reducible for SelectionState {
    type Action = SelectionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let next = self.0.reduce(action);
        if next == self.0 {
            self
        } else {
            Rc::new(Self(next))
        }
    }
}

/// Handle returned by `use_selection` hook
#[derive(Clone, PartialEq)]
pub struct SelectionHandle {
    pub selection: Selection,
    pub dispatch: Callback<SelectionAction>,
}

/// Custom hook for the filter selection with sessionStorage persistence
#[hook]
pub fn use_selection() -> SelectionHandle {
    // Read stored state once, fallback to default on anything unreadable
    let store = use_mut_ref(|| {
        let store = SelectionStore::open(SessionBackend);
        if let Some(e) = store.recovered_error() {
            log::warn(&format!("Ignoring stored filters: {e}"));
        }
        store
    });
    let state = {
        let store = store.clone();
        use_reducer(move || SelectionState(store.borrow().current().clone()))
    };

    // Effect: Persist selection on change
    {
        let store = store.clone();
        use_effect_with(state.0.clone(), move |selection| {
            if let Err(e) = store.borrow_mut().update(selection.clone()) {
                log::warn(&format!("Failed to save filters: {e}"));
            }
            || ()
        });
    }

    let dispatch = {
        let state = state.clone();
        Callback::from(move |action| state.dispatch(action))
    };

    SelectionHandle {
        selection: state.0.clone(),
        dispatch,
    }
}
