use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::models::{
    error::AppError,
    selection::{Dimensions, Selection},
};
use crate::services::orchestrator::{
    DatasetId, FetchMachine, FetchRequest, FetchState, Resolution,
};
use crate::utils::log;

/// Handle returned by `use_fetch` hook
pub struct FetchHandle<T> {
    pub state: FetchState<T>,
    /// Identity of the data in `state`, for one-shot animations
    pub dataset: DatasetId,
    /// Explicit re-fetch; nothing is retried automatically
    pub refresh: Callback<()>,
}

/// Fetches whenever the selection changes, keeping only the newest response.
#[hook]
pub fn use_fetch<T, F, Fut>(
    selection: Selection,
    dimensions: Dimensions,
    fetcher: F,
) -> FetchHandle<T>
where
    T: 'static,
    F: Fn(FetchRequest) -> Fut + 'static,
    Fut: Future<Output = Result<T, AppError>> + 'static,
{
    let machine = use_mut_ref(|| FetchMachine::<T>::new(dimensions));
    let view = use_state(|| FetchState::<T>::Idle);
    let fetcher = Rc::new(fetcher);

    // Teardown: responses arriving after unmount are ignored
    {
        let machine = machine.clone();
        use_effect_with((), move |_| move || machine.borrow_mut().dispose());
    }

    {
        let machine = machine.clone();
        let view = view.clone();
        let fetcher = fetcher.clone();

        use_effect_with(selection, move |selection| {
            let request = machine.borrow_mut().select(selection);
            view.set(machine.borrow().state().clone());

            if let Some(request) = request {
                dispatch(&machine, &view, fetcher.as_ref(), request);
            }
            || ()
        });
    }

    let refresh = {
        let machine = machine.clone();
        let view = view.clone();
        Callback::from(move |()| {
            let request = machine.borrow_mut().refresh();
            view.set(machine.borrow().state().clone());

            if let Some(request) = request {
                dispatch(&machine, &view, fetcher.as_ref(), request);
            }
        })
    };

    let dataset = machine.borrow().dataset();
    FetchHandle {
        state: (*view).clone(),
        dataset,
        refresh,
    }
}

fn dispatch<T, F, Fut>(
    machine: &Rc<RefCell<FetchMachine<T>>>,
    view: &UseStateHandle<FetchState<T>>,
    fetcher: &F,
    request: FetchRequest,
) where
    T: 'static,
    F: Fn(FetchRequest) -> Fut,
    Fut: Future<Output = Result<T, AppError>> + 'static,
{
    let token = request.token;
    let pending = fetcher(request);
    let machine = machine.clone();
    let view = view.clone();

    spawn_local(async move {
        let result = pending.await;
        let failure = result.as_ref().err().map(ToString::to_string);

        let resolution = machine.borrow_mut().resolve(token, result);
        match resolution {
            Resolution::Applied => {
                if let Some(message) = failure {
                    log::error(&format!("Fetch failed: {message}"));
                }
                view.set(machine.borrow().state().clone());
            }
            Resolution::Stale => log::debug("Discarded response for an outdated selection"),
            Resolution::Disposed => {}
        }
    });
}
