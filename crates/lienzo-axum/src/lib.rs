//! Axum web adapter for lienzo.
//!
//! Exposes the generation, history, quota, bonus, and deletion services
//! over HTTP, and serves persisted artifacts as static files. The
//! composition root lives in [`bootstrap`]; handlers only ever talk to
//! core services through the shared [`state::AppState`].

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
