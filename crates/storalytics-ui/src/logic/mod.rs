//! Core, DOM-free primitives and helpers for the Web UI.
pub mod preferences;
pub mod store;
pub mod view;
