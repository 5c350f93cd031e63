use charming::{
    Chart as CharmingChart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, LineStyle, LineStyleType, SplitLine,
        TextStyle, Tooltip, Trigger,
    },
    renderer::WasmRenderer,
    series::{Bar, Pie},
};
use gloo::events::EventListener;
use std::rc::Rc;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::components::status::{Status, StatusProps};
use crate::hooks::use_fetch::use_fetch;
use crate::models::chart::ChartSeries;
use crate::models::selection::{Dimensions, Selection};
use crate::services::api::{fetch_date_wise, fetch_sales_distribution};
use crate::utils::format::{Unit, format_value};
use crate::utils::log;

const SALES_DISTRIBUTION_ID: &str = "sales-distribution-chart";
const DAILY_SALES_ID: &str = "daily-sales-chart";

#[derive(Properties, PartialEq)]
pub struct ChartProps {
    pub selection: Selection,
}

/// Sales split by product as a donut
#[function_component(SalesDistributionChart)]
pub fn sales_distribution_chart(props: &ChartProps) -> Html {
    let fetched = use_fetch(props.selection.clone(), Dimensions::MONTH_AND_YEAR, |request| {
        fetch_sales_distribution(request.params)
    });
    let status = StatusProps::from_state(&fetched.state, fetched.refresh.clone());
    let series = fetched
        .state
        .data()
        .map(|slices| ChartSeries::from_sales_distribution(slices).without_noise());

    html! {
        <div class="chart-panel">
            <Status ..status />
            if let Some(series) = series {
                <SeriesChart id={SALES_DISTRIBUTION_ID} series={Rc::new(series.clone())} kind={ChartKind::Donut} />
                <ul class="chart-legend">
                    {
                        series.points().iter().map(|point| {
                            let style = point.color.as_ref().map(|c| format!("background:{c}"));
                            html! {
                                <li>
                                    <span class="legend-swatch" {style}></span>
                                    {&point.label}{" "}{format_value(point.value, Unit::Currency)}
                                </li>
                            }
                        }).collect::<Html>()
                    }
                </ul>
            }
        </div>
    }
}

/// Net sales per day of the selected period
#[function_component(DailySalesChart)]
pub fn daily_sales_chart(props: &ChartProps) -> Html {
    let fetched = use_fetch(props.selection.clone(), Dimensions::MONTH_AND_YEAR, |request| {
        fetch_date_wise(request.params)
    });
    let status = StatusProps::from_state(&fetched.state, fetched.refresh.clone());
    let series = fetched
        .state
        .data()
        .map(|days| Rc::new(ChartSeries::from_daily_sales(days)));

    html! {
        <div class="chart-panel">
            <Status ..status />
            if let Some(series) = series {
                <SeriesChart id={DAILY_SALES_ID} {series} kind={ChartKind::Bar} />
            }
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum ChartKind {
    Donut,
    Bar,
}

#[derive(Properties, PartialEq)]
struct SeriesChartProps {
    id: &'static str,
    series: Rc<ChartSeries>,
    kind: ChartKind,
}

#[function_component(SeriesChart)]
fn series_chart(props: &SeriesChartProps) -> Html {
    let container_ref = use_node_ref();

    {
        let container_ref = container_ref.clone();
        let id = props.id;
        let kind = props.kind;

        use_effect_with(
            (props.series.clone(), container_ref),
            move |(series, container_ref)| {
                let listener = container_ref.cast::<HtmlElement>().map(|container| {
                    let chart = build_chart(series, kind);
                    render_chart(&container, id, &chart);

                    EventListener::new(&gloo::utils::window(), "resize", move |_| {
                        render_chart(&container, id, &chart);
                    })
                });

                move || drop(listener)
            },
        );
    }

    html! {
        <div class="chart-container" ref={container_ref}>
            <div id={props.id} />
        </div>
    }
}

fn render_chart(container: &HtmlElement, id: &str, chart: &CharmingChart) {
    let width = container.client_width().cast_unsigned();
    let height = container.client_height().cast_unsigned();

    if width == 0 || height == 0 {
        return;
    }

    if let Err(e) = WasmRenderer::new(width, height).render(id, chart) {
        log::error(&format!("Render error: {e:?}"));
    }
}

fn build_chart(series: &ChartSeries, kind: ChartKind) -> CharmingChart {
    match kind {
        ChartKind::Donut => build_donut(series),
        ChartKind::Bar => build_bar(series),
    }
}

fn build_donut(series: &ChartSeries) -> CharmingChart {
    let data: Vec<(f64, String)> = series
        .points()
        .iter()
        .map(|p| (p.value, p.label.clone()))
        .collect();

    CharmingChart::new()
        .title(
            Title::new()
                .text("Sales Distribution")
                .left("center")
                .text_style(TextStyle::new().font_size(16)),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().show(false))
        .series(
            Pie::new()
                .name("Sales")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

fn build_bar(series: &ChartSeries) -> CharmingChart {
    let (x_data, y_data) = series.series_data();

    CharmingChart::new()
        .title(
            Title::new()
                .text("Daily Sales")
                .left("center")
                .text_style(TextStyle::new().font_size(16)),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("8%")
                .right("4%")
                .bottom("12%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(x_data))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("£")
                .axis_label(AxisLabel::new())
                .split_line(
                    SplitLine::new().line_style(LineStyle::new().type_(LineStyleType::Dashed)),
                ),
        )
        .series(Bar::new().data(y_data).bar_width("70%"))
}
