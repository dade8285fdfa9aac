//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs (claim parsing, pipeline dispatch, diagnostics)
//!     → JSON response
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, RelayerServer};
