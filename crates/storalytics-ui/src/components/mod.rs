pub(crate) mod charts;
pub(crate) mod dashboard;
pub(crate) mod login;
pub(crate) mod table;
pub(crate) mod upload;
