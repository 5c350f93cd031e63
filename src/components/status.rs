use chrono::Local;
use yew::prelude::*;

use crate::hooks::use_fetch::use_fetch;
use crate::models::selection::{Dimensions, Selection};
use crate::services::api::fetch_status;
use crate::services::orchestrator::FetchState;

#[derive(Properties, PartialEq)]
pub struct StatusProps {
    pub loading: bool,
    #[prop_or_default]
    pub error: Option<AttrValue>,
    #[prop_or_default]
    pub on_retry: Option<Callback<()>>,
}

impl StatusProps {
    pub fn from_state<T>(state: &FetchState<T>, on_retry: Callback<()>) -> Self {
        Self {
            loading: state.is_loading(),
            error: state.error().map(|e| AttrValue::from(e.to_string())),
            on_retry: Some(on_retry),
        }
    }
}

#[function_component(Status)]
pub fn status(props: &StatusProps) -> Html {
    if props.loading {
        return html! {
            <div class="status loading">
                <div class="spinner"></div>
                <p>{"Loading data..."}</p>
            </div>
        };
    }

    match &props.error {
        Some(msg) => html! {
            <div class="status error">
                <p>{"❌ Error: "}{msg}</p>
                if let Some(on_retry) = &props.on_retry {
                    <button class="retry" onclick={on_retry.reform(|_: MouseEvent| ())}>
                        {"Retry"}
                    </button>
                }
            </div>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct SiteStatusProps {
    pub selection: Selection,
}

/// Open/closed badge for the selected site
#[function_component(SiteStatus)]
pub fn site_status(props: &SiteStatusProps) -> Html {
    let status = use_fetch(props.selection.clone(), Dimensions::SITE_ONLY, |request| {
        fetch_status(request.params)
    });

    match &status.state {
        FetchState::Success(record) => {
            let (class, label) = match record.is_open {
                Some(true) => ("site-status open", "Open"),
                Some(false) => ("site-status closed", "Closed"),
                None => ("site-status unknown", "Status unknown"),
            };
            let updated = record
                .last_updated
                .map(|at| format!("Updated {}", at.with_timezone(&Local).format("%d %b %H:%M")));

            html! {
                <div class={class}>
                    <span>{label}</span>
                    if let Some(updated) = updated {
                        <span class="site-status-updated">{updated}</span>
                    }
                    if let Some(message) = &record.message {
                        <span class="site-status-message">{message}</span>
                    }
                </div>
            }
        }
        FetchState::Failure(_) => html! {
            <div class="site-status unknown">{"Status unavailable"}</div>
        },
        FetchState::Idle | FetchState::Loading => html! {},
    }
}
