//! Core domain and persistence for the usuarios service.
//! This crate is the single owner of usuario storage access.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::usuario::{Usuario, UsuarioId};
pub use repo::memory_repo::InMemoryUsuarioRepository;
pub use repo::usuario_repo::{RepoError, RepoResult, SqliteUsuarioRepository, UsuarioRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
