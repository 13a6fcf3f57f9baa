//! Usuario repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the five CRUD operations over canonical `usuarios` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Rows with `deleted_at IS NOT NULL` are invisible to every read and write.
//! - `update` only writes `nombre`, `correo`, `edad` (plus `updated_at`).
//! - `delete` sets `deleted_at`; rows are never physically removed.

use crate::db::DbError;
use crate::model::usuario::{Usuario, UsuarioId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

const USUARIO_SELECT_SQL: &str = "SELECT
    id,
    nombre,
    correo,
    edad,
    sincronizado
FROM usuarios";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for usuario persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("usuario not found: {0}")]
    NotFound(UsuarioId),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("usuario store lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Persistence gateway for the usuario entity.
///
/// Implementations must be shareable across request tasks.
pub trait UsuarioRepository: Send + Sync {
    /// Returns every live usuario, ordered by id. Empty when none exist.
    fn find_all(&self) -> RepoResult<Vec<Usuario>>;
    /// Returns the live usuario with `id`, or `RepoError::NotFound`.
    fn find_by_id(&self, id: UsuarioId) -> RepoResult<Usuario>;
    /// Persists a new usuario. Any id on `usuario` is ignored.
    fn create(&self, usuario: &Usuario) -> RepoResult<Usuario>;
    /// Copies `nombre`, `correo`, `edad` from `input` onto the live row `id`.
    fn update(&self, id: UsuarioId, input: &Usuario) -> RepoResult<Usuario>;
    /// Soft-deletes the live row `id`. A second call reports `NotFound`.
    fn delete(&self, id: UsuarioId) -> RepoResult<()>;
}

/// SQLite-backed usuario repository.
///
/// Owns the injected connection; concurrent callers are serialized on it.
pub struct SqliteUsuarioRepository {
    conn: Mutex<Connection>,
}

impl SqliteUsuarioRepository {
    /// Wraps an opened connection. The caller is expected to have applied
    /// migrations (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::Poisoned)
    }
}

impl UsuarioRepository for SqliteUsuarioRepository {
    fn find_all(&self) -> RepoResult<Vec<Usuario>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{USUARIO_SELECT_SQL}
             WHERE deleted_at IS NULL
             ORDER BY id ASC;"
        ))?;

        let usuarios = stmt
            .query_map([], parse_usuario_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(usuarios)
    }

    fn find_by_id(&self, id: UsuarioId) -> RepoResult<Usuario> {
        let conn = self.conn()?;
        find_live(&conn, id)
    }

    fn create(&self, usuario: &Usuario) -> RepoResult<Usuario> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO usuarios (
                nombre,
                correo,
                edad,
                sincronizado
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                usuario.nombre.as_str(),
                usuario.correo.as_str(),
                usuario.edad,
                usuario.sincronizado,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("event=usuario_create module=repo status=ok id={id}");
        find_live(&conn, id)
    }

    fn update(&self, id: UsuarioId, input: &Usuario) -> RepoResult<Usuario> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE usuarios
             SET
                nombre = ?1,
                correo = ?2,
                edad = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4
               AND deleted_at IS NULL;",
            params![input.nombre.as_str(), input.correo.as_str(), input.edad, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=usuario_update module=repo status=ok id={id}");
        find_live(&conn, id)
    }

    fn delete(&self, id: UsuarioId) -> RepoResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE usuarios
             SET
                deleted_at = (strftime('%s', 'now') * 1000),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND deleted_at IS NULL;",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=usuario_delete module=repo status=ok id={id}");
        Ok(())
    }
}

fn find_live(conn: &Connection, id: UsuarioId) -> RepoResult<Usuario> {
    conn.query_row(
        &format!(
            "{USUARIO_SELECT_SQL}
             WHERE id = ?1
               AND deleted_at IS NULL;"
        ),
        [id],
        parse_usuario_row,
    )
    .optional()?
    .ok_or(RepoError::NotFound(id))
}

fn parse_usuario_row(row: &Row<'_>) -> rusqlite::Result<Usuario> {
    Ok(Usuario {
        id: row.get("id")?,
        nombre: row.get("nombre")?,
        correo: row.get("correo")?,
        edad: row.get("edad")?,
        sincronizado: row.get("sincronizado")?,
    })
}
