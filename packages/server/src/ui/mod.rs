//! UI layer: axum router, WebSocket sessions and HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerError};
pub use signal::shutdown_signal;
