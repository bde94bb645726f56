//! App shell: session restore, login gate and page layout.

use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginForm;
use crate::components::upload::UploadPanel;
use crate::logic::store::{AppStore, AuthPhase, init_unit, sign_in, sign_out};
use crate::services::api::ApiClient;
use gloo::console;
use preferences::{api_base_url, load_unit};
use std::rc::Rc;
use storalytics_core::{DashboardSession, FetchRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

mod preferences;

pub(crate) use preferences::persist_unit;

const APP_TITLE: &str = "Storage Analytics Dashboard";

/// Apply a session transition and execute the fetch it issues, if any.
///
/// The result is handed back through `apply`, which drops it when a newer
/// request has been issued in the meantime.
pub(crate) fn run_fetch<F>(dispatch: &Dispatch<AppStore>, client: &Rc<ApiClient>, step: F)
where
    F: FnOnce(&mut DashboardSession) -> Option<FetchRequest>,
{
    let mut issued = None;
    dispatch.reduce_mut(|store| issued = step(&mut store.dashboard));
    let Some(request) = issued else {
        return;
    };
    let dispatch = dispatch.clone();
    let client = Rc::clone(client);
    spawn_local(async move {
        let result = client.fetch_dashboard(&request.filter).await;
        if let Err(err) = &result {
            console::warn!("dashboard fetch failed", err.to_string());
        }
        dispatch.reduce_mut(|store| {
            store.dashboard.apply(request.token, result);
        });
    });
}

#[function_component(StoralyticsApp)]
fn storalytics_app() -> Html {
    let client: Rc<ApiClient> = use_memo(|_| ApiClient::new(api_base_url()), ());
    let phase = use_selector(|store: &AppStore| store.auth.phase.clone());

    {
        let client = Rc::clone(&client);
        use_effect_with_deps(
            move |_| {
                let dispatch = Dispatch::<AppStore>::new();
                dispatch.reduce_mut(|store| init_unit(store, load_unit()));
                spawn_local(async move {
                    match client.check_auth().await {
                        Some(session) => dispatch.reduce_mut(|store| sign_in(store, session)),
                        None => dispatch.reduce_mut(|store| sign_out(store, None)),
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_logout = {
        let client = Rc::clone(&client);
        Callback::from(move |_: MouseEvent| {
            Dispatch::<AppStore>::new().reduce_mut(|store| sign_out(store, None));
            let client = Rc::clone(&client);
            spawn_local(async move {
                if let Err(err) = client.logout().await {
                    console::warn!("logout request failed", err.to_string());
                }
            });
        })
    };

    let account = match &*phase {
        AuthPhase::SignedIn(session) => html! {
            <div class="account">
                <span>{format!("{} ({})", session.username, session.role())}</span>
                <button class="ghost" onclick={on_logout}>{"Logout"}</button>
            </div>
        },
        _ => html! {},
    };

    let body = match &*phase {
        AuthPhase::Checking => html! { <p class="muted">{"Checking session..."}</p> },
        AuthPhase::SignedOut => html! { <LoginForm /> },
        AuthPhase::SignedIn(session) => html! {
            <>
                if session.is_staff {
                    <UploadPanel />
                }
                <DashboardPage />
            </>
        },
    };

    html! {
        <ContextProvider<Rc<ApiClient>> context={client}>
            <div class="app">
                <header class="app-header">
                    <h1>{APP_TITLE}</h1>
                    {account}
                </header>
                <main>{body}</main>
            </div>
        </ContextProvider<Rc<ApiClient>>>
    }
}

/// Mount the app on `#root`, or on `<body>` when absent.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<StoralyticsApp>::with_root(root).render();
    } else {
        yew::Renderer::<StoralyticsApp>::new().render();
    }
}
