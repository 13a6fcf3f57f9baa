//! In-memory usuario repository.
//!
//! Mirrors the SQLite contract (monotonic ids, soft delete, field-limited
//! update) without a database, so callers can be exercised in isolation.

use crate::model::usuario::{Usuario, UsuarioId};
use crate::repo::usuario_repo::{RepoError, RepoResult, UsuarioRepository};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct StoredUsuario {
    usuario: Usuario,
    deleted: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: BTreeMap<UsuarioId, StoredUsuario>,
    last_id: UsuarioId,
}

impl MemoryState {
    fn live_mut(&mut self, id: UsuarioId) -> RepoResult<&mut Usuario> {
        match self.rows.get_mut(&id) {
            Some(stored) if !stored.deleted => Ok(&mut stored.usuario),
            _ => Err(RepoError::NotFound(id)),
        }
    }
}

/// Usuario repository kept entirely in process memory.
#[derive(Debug, Default)]
pub struct InMemoryUsuarioRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryUsuarioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, soft-deleted ones included.
    pub fn stored_len(&self) -> RepoResult<usize> {
        Ok(self.state()?.rows.len())
    }

    fn state(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| RepoError::Poisoned)
    }
}

impl UsuarioRepository for InMemoryUsuarioRepository {
    fn find_all(&self) -> RepoResult<Vec<Usuario>> {
        let state = self.state()?;
        Ok(state
            .rows
            .values()
            .filter(|stored| !stored.deleted)
            .map(|stored| stored.usuario.clone())
            .collect())
    }

    fn find_by_id(&self, id: UsuarioId) -> RepoResult<Usuario> {
        let mut state = self.state()?;
        state.live_mut(id).map(|usuario| usuario.clone())
    }

    fn create(&self, usuario: &Usuario) -> RepoResult<Usuario> {
        let mut state = self.state()?;
        state.last_id += 1;
        let created = Usuario {
            id: state.last_id,
            ..usuario.clone()
        };
        state.rows.insert(
            created.id,
            StoredUsuario {
                usuario: created.clone(),
                deleted: false,
            },
        );
        Ok(created)
    }

    fn update(&self, id: UsuarioId, input: &Usuario) -> RepoResult<Usuario> {
        let mut state = self.state()?;
        let usuario = state.live_mut(id)?;
        usuario.apply_update(input);
        Ok(usuario.clone())
    }

    fn delete(&self, id: UsuarioId) -> RepoResult<()> {
        let mut state = self.state()?;
        match state.rows.get_mut(&id) {
            Some(stored) if !stored.deleted => {
                stored.deleted = true;
                Ok(())
            }
            _ => Err(RepoError::NotFound(id)),
        }
    }
}
