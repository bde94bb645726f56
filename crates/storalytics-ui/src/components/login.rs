use crate::logic::store::{AppStore, sign_in};
use crate::services::api::ApiClient;
use std::rc::Rc;
use storalytics_core::auth;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

fn input_value(event: &InputEvent) -> Option<String> {
    event
        .target_dyn_into::<web_sys::HtmlInputElement>()
        .map(|input| input.value())
}

#[function_component(LoginForm)]
pub(crate) fn login_form() -> Html {
    let client = use_context::<Rc<ApiClient>>();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let busy = use_selector(|store: &AppStore| store.auth.busy);
    let error = use_selector(|store: &AppStore| store.auth.error.clone());

    let on_username = {
        let username = username.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                username.set(value);
            }
        })
    };
    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(value) = input_value(&e) {
                password.set(value);
            }
        })
    };

    let on_submit = {
        let username = username.clone();
        let password = password.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let dispatch = Dispatch::<AppStore>::new();
            let request = match auth::credentials(&username, &password) {
                Ok(request) => request,
                Err(err) => {
                    dispatch.reduce_mut(|store| store.auth.error = Some(err.to_string()));
                    return;
                }
            };
            let Some(client) = client.clone() else {
                return;
            };
            dispatch.reduce_mut(|store| {
                store.auth.busy = true;
                store.auth.error = None;
            });
            spawn_local(async move {
                match client.login(&request).await {
                    Ok(session) => dispatch.reduce_mut(|store| sign_in(store, session)),
                    Err(err) => dispatch.reduce_mut(|store| {
                        store.auth.busy = false;
                        store.auth.error = Some(err.to_string());
                    }),
                }
            });
        })
    };

    html! {
        <form class="card login" onsubmit={on_submit}>
            <header><h3>{"Sign in"}</h3></header>
            <label class="stack">
                <span>{"Username"}</span>
                <input type="text" autocomplete="username" value={(*username).clone()} oninput={on_username} />
            </label>
            <label class="stack">
                <span>{"Password"}</span>
                <input type="password" autocomplete="current-password" value={(*password).clone()} oninput={on_password} />
            </label>
            if let Some(message) = &*error {
                <p class="error-text">{message}</p>
            }
            <div class="actions">
                <button class="solid" type="submit" disabled={*busy}>
                    {if *busy { "Signing in..." } else { "Login" }}
                </button>
            </div>
        </form>
    }
}
