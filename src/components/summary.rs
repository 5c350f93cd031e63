use yew::prelude::*;

use crate::components::kpi_card::KpiCard;
use crate::components::status::{Status, StatusProps};
use crate::hooks::use_fetch::use_fetch;
use crate::models::metrics::{VolumeBreakdown, VolumeEstimatePolicy, VolumeSource};
use crate::models::selection::{Dimensions, Selection};
use crate::services::api::fetch_site_summary;
use crate::services::aggregate::SiteSummary;
use crate::utils::format::{Unit, format_value};

#[derive(Properties, PartialEq)]
pub struct SummaryProps {
    pub selection: Selection,
}

#[function_component(Summary)]
pub fn summary(props: &SummaryProps) -> Html {
    let summary = use_fetch(
        props.selection.clone(),
        Dimensions::MONTH_AND_YEAR,
        |request| fetch_site_summary(request.selection),
    );
    let status = StatusProps::from_state(&summary.state, summary.refresh.clone());

    // Failed or idle consumers render the "no data" representation
    let data = summary.state.data().cloned().unwrap_or_default();
    let dataset = summary.dataset;

    html! {
        <div class="data-summary">
            <Status ..status />
            <SummaryHeader summary={data.as_ref().clone()} />
            <div class="summary-grid">
                <KpiCard title="Net Sales" value={data.metrics.net_sales} unit={Unit::Currency} {dataset} />
                <KpiCard title="Profit" value={data.metrics.profit} unit={Unit::Currency} {dataset} />
                <KpiCard title="Fuel Volume" value={data.metrics.total_fuel_volume} unit={Unit::Volume} {dataset} />
                <KpiCard title="Average PPL" value={data.metrics.avg_ppl} unit={Unit::Rate} {dataset} />
                <KpiCard title="Profit Margin" value={data.metrics.profit_margin} unit={Unit::Percentage} {dataset} />
                <KpiCard title="Transactions" value={data.metrics.transactions} unit={Unit::Count} {dataset} />
            </div>
            <VolumeSplit summary={data.as_ref().clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SummarySectionProps {
    summary: SiteSummary,
}

#[function_component(SummaryHeader)]
fn summary_header(props: &SummarySectionProps) -> Html {
    let name = props.summary.site_name.as_deref().unwrap_or("Site name unavailable");

    html! {
        <header class="site-header">
            <h2>{name}</h2>
            if let Some(city) = &props.summary.city {
                <p class="site-city">{city}</p>
            }
            if props.summary.is_partial() {
                <p class="partial-warning">{"Some figures could not be loaded"}</p>
            }
        </header>
    }
}

#[function_component(VolumeSplit)]
fn volume_split(props: &SummarySectionProps) -> Html {
    let breakdown = VolumeBreakdown::from_metrics(
        &props.summary.metrics,
        VolumeEstimatePolicy::default(),
    );

    match breakdown {
        Some(split) => {
            let note = match split.source {
                VolumeSource::Reported => "Reported",
                VolumeSource::Estimated => "Estimated (no breakdown reported)",
            };
            html! {
                <div class="volume-split">
                    <h3>{"Bunkered / Non-bunkered"}</h3>
                    <p class="summary-value">
                        {format_value(split.bunkered, Unit::Volume)}
                        {" / "}
                        {format_value(split.non_bunkered, Unit::Volume)}
                    </p>
                    <p class="summary-note">{note}</p>
                </div>
            }
        }
        None => html! {},
    }
}
