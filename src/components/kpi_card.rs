use yew::prelude::*;

use crate::hooks::use_animated_value::use_animated_value;
use crate::services::orchestrator::DatasetId;
use crate::utils::format::Unit;

#[derive(Properties, PartialEq)]
pub struct KpiCardProps {
    pub title: AttrValue,
    pub value: Option<f64>,
    pub unit: Unit,
    pub dataset: DatasetId,
    /// Pre-formatted value used when `value` is absent
    #[prop_or_default]
    pub formatted: Option<AttrValue>,
    #[prop_or_default]
    pub note: Option<AttrValue>,
}

#[function_component(KpiCard)]
pub fn kpi_card(props: &KpiCardProps) -> Html {
    let node = use_node_ref();
    let rendered = use_animated_value(
        node.clone(),
        props.value,
        props.formatted.clone(),
        Some(props.unit),
        props.dataset,
    );

    html! {
        <div class="summary-item kpi-card" ref={node}>
            <h3>{&props.title}</h3>
            <p class="summary-value">{rendered}</p>
            if let Some(note) = &props.note {
                <p class="summary-note">{note}</p>
            }
        </div>
    }
}
