//! HTTP request handlers.

pub mod bonus;
pub mod delete;
pub mod generate;
pub mod history;
pub mod quota;
