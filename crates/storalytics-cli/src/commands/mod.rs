//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod dashboard;
pub(crate) mod explore;
pub(crate) mod upload;
