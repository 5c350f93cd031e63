use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::config::Config;
use crate::models::metrics::Site;
use crate::models::selection::{Selection, SelectionAction, month_label};

#[derive(Properties, PartialEq)]
pub struct FilterPanelProps {
    pub selection: Selection,
    pub sites: Vec<Site>,
    pub on_action: Callback<SelectionAction>,
}

/// Site dropdown plus month and year toggles
#[function_component(FilterPanel)]
pub fn filter_panel(props: &FilterPanelProps) -> Html {
    let on_site_change = {
        let callback = props.on_action.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            callback.emit(SelectionAction::SetSite(target.value()));
        })
    };

    let current_site = props.selection.site().as_str().to_string();

    html! {
        <div class="filter-panel">
            <select
                class="site-selector"
                onchange={on_site_change}
                aria-label="Select site"
                title="Select site"
            >
                <option value="all" selected={current_site == "all"}>{"All sites"}</option>
                {
                    props.sites.iter().map(|site| {
                        let selected = site.id == current_site;
                        html! {
                            <option value={site.id.clone()} {selected}>{&site.name}</option>
                        }
                    }).collect::<Html>()
                }
            </select>

            <div class="month-toggles" role="group" aria-label="Months">
                {
                    (1..=12u8).map(|month| {
                        let active = props.selection.months().contains(&month);
                        let label = month_label(month).map(short_label).unwrap_or_default();
                        let onclick = props.on_action.reform(move |_: MouseEvent| SelectionAction::ToggleMonth(month));
                        html! {
                            <button class={classes!("toggle", active.then_some("active"))} {onclick}>
                                {label}
                            </button>
                        }
                    }).collect::<Html>()
                }
            </div>

            <div class="year-toggles" role="group" aria-label="Years">
                {
                    Config::SELECTABLE_YEARS.iter().map(|&year| {
                        let active = props.selection.years().contains(&year);
                        let onclick = props.on_action.reform(move |_: MouseEvent| SelectionAction::ToggleYear(year));
                        html! {
                            <button class={classes!("toggle", active.then_some("active"))} {onclick}>
                                {year}
                            </button>
                        }
                    }).collect::<Html>()
                }
            </div>

            <button
                class="reset-filters"
                onclick={props.on_action.reform(|_: MouseEvent| SelectionAction::Reset)}
            >
                {"Reset"}
            </button>
        </div>
    }
}

/// "january" -> "Jan"
fn short_label(label: &str) -> String {
    let mut chars = label.chars().take(3);
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
