use crate::logic::view::{bar_width, ring_gradient};
use storalytics_core::chart::RingDataset;
use storalytics_core::{BarChart, DonutChart, format_amount};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct DonutProps {
    pub chart: DonutChart,
}

fn legend(ring: &RingDataset) -> Html {
    html! {
        <div class="legend">
            <h4>{&ring.label}</h4>
            <ul>
                {for ring.segments.iter().map(|segment| html! {
                    <li title={segment.tooltip.clone()}>
                        <span class="swatch" style={format!("background:{}", segment.color)}></span>
                        <span>{&segment.label}</span>
                        <span class="muted">{&segment.display_label}</span>
                    </li>
                })}
            </ul>
        </div>
    }
}

/// Two concentric rings drawn with conic gradients, plus a legend per ring.
#[function_component(DonutView)]
pub(crate) fn donut_view(props: &DonutProps) -> Html {
    let chart = &props.chart;
    html! {
        <div class="tile donut">
            <header><span>{&chart.title}</span></header>
            <div class="donut-rings">
                <div class="ring outer" style={format!("background:{}", ring_gradient(&chart.outer))}>
                    <div class="ring inner" style={format!("background:{}", ring_gradient(&chart.inner))}>
                        <div class="ring-hole"></div>
                    </div>
                </div>
            </div>
            {legend(&chart.outer)}
            {legend(&chart.inner)}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct BarProps {
    pub chart: BarChart,
}

#[function_component(BarView)]
pub(crate) fn bar_view(props: &BarProps) -> Html {
    let chart = &props.chart;
    let max = chart.max_value();
    html! {
        <div class="tile bars">
            <header>
                <span>{&chart.title}</span>
                <span class="muted">{&chart.dataset_label}</span>
            </header>
            <ul class="bar-list">
                {for chart.bars.iter().map(|bar| html! {
                    <li>
                        <span class="bar-label">{&bar.label}</span>
                        <span class="bar-track">
                            <span
                                class="bar-fill"
                                style={format!("width:{:.2}%;background:{}", bar_width(bar.value, max), chart.color)}
                            ></span>
                        </span>
                        <span class="bar-value">{format!("{} {}", format_amount(bar.value), chart.unit)}</span>
                    </li>
                })}
            </ul>
        </div>
    }
}
