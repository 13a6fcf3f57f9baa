//! Domain model for the usuarios service.
//!
//! # Responsibility
//! - Define canonical data structures shared by persistence and HTTP layers.
//!
//! # Invariants
//! - Every usuario is identified by a store-generated `UsuarioId`.
//! - Deletion is represented by a soft-delete marker in storage, not a hard
//!   delete.

pub mod usuario;
