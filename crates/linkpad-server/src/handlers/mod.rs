//! HTTP request handlers.

pub(crate) mod share;
pub(crate) mod status;
pub(crate) mod theme;
