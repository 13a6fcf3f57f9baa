//! Usuario domain model.
//!
//! # Responsibility
//! - Define the single record exposed by the HTTP API.
//! - Describe the wire shape used for both request bodies and responses.
//!
//! # Invariants
//! - `id` is assigned by the store and never changes afterwards.
//! - Audit columns (`created_at`, `updated_at`, `deleted_at`) live only in
//!   storage and are not part of this shape.
//! - Decoding is lenient: a missing field falls back to its zero value.

use serde::{Deserialize, Serialize};

/// Store-generated primary key of a usuario row.
pub type UsuarioId = i64;

/// The user entity managed by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usuario {
    /// Ignored on create and update; the store owns identity.
    pub id: UsuarioId,
    pub nombre: String,
    pub correo: String,
    pub edad: i64,
    /// External sync flag (0/1). Stored on create, echoed on read, never
    /// touched by update.
    pub sincronizado: i64,
}

impl Usuario {
    /// Builds an unsaved usuario with `id = 0` and `sincronizado = 0`.
    pub fn new(nombre: impl Into<String>, correo: impl Into<String>, edad: i64) -> Self {
        Self {
            id: 0,
            nombre: nombre.into(),
            correo: correo.into(),
            edad,
            sincronizado: 0,
        }
    }

    /// Copies the mutable profile fields from `input` onto `self`.
    ///
    /// Only `nombre`, `correo` and `edad` are copied; `id` and
    /// `sincronizado` are left as stored.
    pub fn apply_update(&mut self, input: &Usuario) {
        self.nombre = input.nombre.clone();
        self.correo = input.correo.clone();
        self.edad = input.edad;
    }
}
