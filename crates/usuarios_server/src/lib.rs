//! HTTP surface for the usuarios service.
//!
//! # Responsibility
//! - Expose the usuario CRUD routes over `axum`.
//! - Wire the SQLite gateway, CORS policy and listener at startup.
//!
//! # Invariants
//! - Storage is reached only through `usuarios_core::UsuarioRepository`.
//! - A failing request never stops the process; a failing store at startup
//!   does.

pub mod config;
pub mod handlers;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use handlers::{ApiError, AppState, ErrorResponse, MessageResponse};
pub use routes::{build_router, cors_layer, usuario_routes};
pub use server::{run, ServerError};
