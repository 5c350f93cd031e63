use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::models::metrics::Site;
use crate::services::api::fetch_sites;
use crate::utils::log;

#[derive(Clone, PartialEq, Debug)]
pub enum SitesState {
    Loading,
    Loaded(Rc<Vec<Site>>),
    Error(String),
}

impl SitesState {
    pub fn sites(&self) -> &[Site] {
        match self {
            SitesState::Loaded(sites) => sites,
            _ => &[],
        }
    }
}

/// Loads the site list once on mount.
#[hook]
pub fn use_sites() -> UseStateHandle<SitesState> {
    let state = use_state(|| SitesState::Loading);

    {
        let state = state.clone();

        use_effect_with((), move |_| {
            let aborted = Rc::new(Cell::new(false));
            let aborted_check = aborted.clone();

            spawn_local(async move {
                match fetch_sites().await {
                    Ok(sites) if !aborted_check.get() => {
                        state.set(SitesState::Loaded(Rc::new(sites)));
                    }
                    Err(e) if !aborted_check.get() => {
                        log::error(&format!("Failed to load sites: {e}"));
                        state.set(SitesState::Error(e.to_string()));
                    }
                    _ => {} // Unmounted, ignore result
                }
            });

            move || {
                aborted.set(true);
            }
        });
    }

    state
}
