//! Bridge between the UI thread and the async contract endpoint.

pub mod commands;
pub mod runtime;
