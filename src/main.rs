use yew::prelude::*;

use fuel_dashboard::components::{
    DailySalesChart, FilterPanel, SalesDistributionChart, SiteStatus, Summary,
};
use fuel_dashboard::hooks::use_selection::use_selection;
use fuel_dashboard::hooks::use_sites::{SitesState, use_sites};
use fuel_dashboard::models::selection::SiteScope;

#[function_component(App)]
fn app() -> Html {
    let selection = use_selection();
    let sites = use_sites();
    let site_list = sites.sites().to_vec();
    let current = selection.selection.clone();

    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{"Fuel Retail Dashboard"}</h1>
                if !matches!(current.site(), SiteScope::All) {
                    <SiteStatus selection={current.clone()} />
                }
            </header>

            <main class="app-main">
                <section class="filter-section">
                    <FilterPanel
                        selection={current.clone()}
                        sites={site_list}
                        on_action={selection.dispatch.clone()}
                    />
                    if let SitesState::Error(e) = &*sites {
                        <p class="status error">{"Could not load sites: "}{e}</p>
                    }
                </section>

                if matches!(current.site(), SiteScope::All) {
                    <section class="placeholder">
                        <p>{"Select a site to view its figures"}</p>
                    </section>
                } else {
                    <section class="data-section">
                        <h2>{"Data Summary"}</h2>
                        <Summary selection={current.clone()} />
                    </section>

                    <section class="chart-section">
                        <h2>{"Sales"}</h2>
                        <SalesDistributionChart selection={current.clone()} />
                        <DailySalesChart selection={current} />
                    </section>
                }
            </main>

            <style>
                {include_str!("style.css")}
            </style>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
