//! HTTP API for the prompt optimizer.
//!
//! Exposes the history, template store and optimization workflow of a
//! [`popt_sdk::Optimizer`] as JSON endpoints under `/v1`, for a browser
//! front end or scripts.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::{build_router, AppState};
pub use server::PoptServer;
