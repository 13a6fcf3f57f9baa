//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence gateway contract for usuarios.
//! - Isolate SQLite query details from the HTTP layer.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Every implementation hides soft-deleted rows from reads.

pub mod memory_repo;
pub mod usuario_repo;
