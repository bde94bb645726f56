use crate::app::{persist_unit, run_fetch};
use crate::components::charts::{BarView, DonutView};
use crate::components::table::DataTableView;
use crate::logic::store::AppStore;
use crate::services::api::ApiClient;
use std::rc::Rc;
use storalytics_core::{
    DashboardSession, DashboardView, DisplayUnit, DrillTarget, FetchRequest, Status,
};
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

fn summary_table(view: &DashboardView) -> Html {
    let cells = &view.summary_cells;
    html! {
        <table class="summary">
            <tbody>
                <tr><th>{"Allocated"}</th><td>{&cells.allocated}</td></tr>
                <tr><th>{"Utilized"}</th><td>{&cells.utilized}</td></tr>
                <tr><th>{"Available"}</th><td>{&cells.available}</td></tr>
                <tr><th>{"Avg Utilization"}</th><td>{&cells.avg_utilization}</td></tr>
            </tbody>
        </table>
    }
}

type Step = fn(&mut DashboardSession) -> Option<FetchRequest>;

fn nav_callback(
    client: Option<Rc<ApiClient>>,
    dispatch: Dispatch<AppStore>,
    step: Step,
) -> Callback<MouseEvent> {
    Callback::from(move |_: MouseEvent| {
        if let Some(client) = &client {
            run_fetch(&dispatch, client, step);
        }
    })
}

#[function_component(DashboardPage)]
pub(crate) fn dashboard_page() -> Html {
    let client = use_context::<Rc<ApiClient>>();
    let view = use_selector(|store: &AppStore| store.dashboard.view());
    let status = use_selector(|store: &AppStore| store.dashboard.status().clone());
    let unit = use_selector(|store: &AppStore| store.dashboard.unit());
    let dispatch = Dispatch::<AppStore>::new();

    {
        let client = client.clone();
        let dispatch = dispatch.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(client) = client {
                    run_fetch(&dispatch, &client, |session| Some(session.start()));
                }
                || ()
            },
            (),
        );
    }

    let on_back = nav_callback(client.clone(), dispatch.clone(), DashboardSession::back);
    let on_refresh = nav_callback(client.clone(), dispatch.clone(), |session| {
        Some(session.refresh())
    });
    let on_retry = nav_callback(client.clone(), dispatch.clone(), |session| {
        Some(session.retry())
    });

    let on_select = {
        let dispatch = dispatch.clone();
        Callback::from(move |target: DrillTarget| {
            if let Some(client) = &client {
                run_fetch(&dispatch, client, |session| Some(session.drill_down(&target)));
            }
        })
    };

    let unit_buttons = DisplayUnit::ALL.into_iter().map(|option| {
        let dispatch = dispatch.clone();
        let onclick = Callback::from(move |_: MouseEvent| {
            persist_unit(option);
            dispatch.reduce_mut(|store| store.dashboard.set_unit(option));
        });
        html! {
            <button class={classes!("toggle", (*unit == option).then_some("active"))} {onclick}>
                {option.label()}
            </button>
        }
    });

    let can_go_back = (*view).as_ref().is_some_and(|view| view.can_go_back);
    let loading = status.is_loading();

    let status_line = match &*status {
        Status::Loading => html! { <p class="muted loading">{"Loading..."}</p> },
        Status::Failed { message } => html! {
            <div class="error-banner">
                <span class="error-text">{message}</span>
                <button class="solid" onclick={on_retry}>{"Retry"}</button>
            </div>
        },
        Status::Idle | Status::Ready => html! {},
    };

    let content = match (*view).as_ref() {
        Some(view) => html! {
            <>
                <p class="breadcrumb">{&view.breadcrumb}</p>
                {summary_table(view)}
                <div class="chart-grid">
                    <DonutView chart={view.donut.clone()} />
                    if let Some(bar) = &view.bar {
                        <BarView chart={bar.clone()} />
                    }
                </div>
                <DataTableView table={view.table.clone()} {on_select} />
            </>
        },
        None => html! {},
    };

    html! {
        <section class="dashboard">
            <div class="toolbar">
                <button class="ghost" onclick={on_back} disabled={!can_go_back || loading}>{"Back"}</button>
                <button class="ghost" onclick={on_refresh} disabled={loading}>{"Refresh"}</button>
                <div class="unit-toggle">{for unit_buttons}</div>
            </div>
            {status_line}
            {content}
        </section>
    }
}
