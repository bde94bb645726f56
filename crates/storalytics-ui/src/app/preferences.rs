//! Persistence and environment helpers for the app shell.

use crate::logic::preferences::{API_META_NAME, UNIT_KEY, api_base, stored_unit};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::document;
use storalytics_core::DisplayUnit;
use wasm_bindgen::JsCast;
use web_sys::HtmlMetaElement;

pub(crate) fn load_unit() -> DisplayUnit {
    let stored = LocalStorage::get::<String>(UNIT_KEY).ok();
    stored_unit(stored.as_deref())
}

pub(crate) fn persist_unit(unit: DisplayUnit) {
    if let Err(err) = LocalStorage::set(UNIT_KEY, unit.label()) {
        console::error!("storage operation failed", "set", UNIT_KEY, err.to_string());
    }
}

pub(crate) fn api_base_url() -> String {
    let content = document()
        .query_selector(&format!("meta[name=\"{API_META_NAME}\"]"))
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlMetaElement>().ok())
        .map(|meta| meta.content());
    api_base(content.as_deref())
}
