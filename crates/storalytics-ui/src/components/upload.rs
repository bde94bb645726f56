use crate::logic::store::{AppStore, UploadNotice, choose_file, finish_upload};
use crate::services::api::ApiClient;
use std::rc::Rc;
use storalytics_core::UploadSelection;
use storalytics_core::upload::require_selection;
use wasm_bindgen_futures::spawn_local;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn file_size(file: &File) -> u64 {
    file.size().max(0.0) as u64
}

#[function_component(UploadPanel)]
pub(crate) fn upload_panel() -> Html {
    let client = use_context::<Rc<ApiClient>>();
    let file = use_mut_ref(|| None::<File>);
    let input_ref = use_node_ref();
    let upload = use_selector(|store: &AppStore| store.upload.clone());

    let on_change = {
        let file = file.clone();
        Callback::from(move |e: Event| {
            let chosen = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            let Some(chosen) = chosen else {
                *file.borrow_mut() = None;
                return;
            };
            let selection = UploadSelection::new(chosen.name(), file_size(&chosen));
            *file.borrow_mut() = selection.is_ok().then_some(chosen);
            Dispatch::<AppStore>::new().reduce_mut(|store| choose_file(store, selection));
        })
    };

    let on_submit = {
        let file = file.clone();
        let input_ref = input_ref.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let dispatch = Dispatch::<AppStore>::new();
            let store = dispatch.get();
            if let Err(err) = require_selection(store.upload.selection.as_ref()) {
                dispatch.reduce_mut(|store| {
                    store.upload.notice = Some(UploadNotice::Error(err.to_string()));
                });
                return;
            }
            let (Some(client), Some(chosen)) = (client.clone(), file.borrow().clone()) else {
                return;
            };
            dispatch.reduce_mut(|store| {
                store.upload.busy = true;
                store.upload.notice = None;
            });
            let file = file.clone();
            let input_ref = input_ref.clone();
            spawn_local(async move {
                let result = client.upload(&chosen).await;
                if result.is_ok() {
                    *file.borrow_mut() = None;
                    if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                        input.set_value("");
                    }
                }
                dispatch.reduce_mut(|store| finish_upload(store, result));
            });
        })
    };

    let notice = match &upload.notice {
        Some(UploadNotice::Success(report)) => html! {
            <div class="notice success">
                <p>{&report.message}</p>
                <ul>
                    {for report.details().into_iter().map(|line| html! { <li>{line}</li> })}
                </ul>
            </div>
        },
        Some(UploadNotice::Error(message)) => html! {
            <p class="notice error-text">{message}</p>
        },
        None => html! {},
    };

    html! {
        <section class="card upload">
            <header><h3>{"Upload Data"}</h3></header>
            <form onsubmit={on_submit}>
                <input ref={input_ref} type="file" accept=".xlsx,.csv" onchange={on_change} />
                if let Some(selection) = &upload.selection {
                    <p class="muted">{selection.label()}</p>
                }
                <button class="solid" type="submit" disabled={upload.busy}>
                    {if upload.busy { "Uploading..." } else { "Upload" }}
                </button>
            </form>
            {notice}
        </section>
    }
}
