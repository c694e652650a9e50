//! Replicate-style predictor client.
//!
//! Implements the core `Predictor` port over the provider's HTTP API:
//! create a prediction, poll it by its handle URL, and fetch output bytes.
//! Internal errors are mapped to the core port error at the boundary.

mod client;
mod config;
mod error;
mod wire;

pub use client::ReplicateClient;
pub use config::ReplicateConfig;
pub use error::{ReplicateError, ReplicateResult};
