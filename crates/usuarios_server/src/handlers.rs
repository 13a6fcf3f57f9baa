//! Usuario HTTP handlers.
//!
//! # Responsibility
//! - Translate each route into exactly one repository call.
//! - Map repository outcomes to status codes and JSON bodies.
//!
//! # Invariants
//! - Handlers never touch storage except through `UsuarioRepository`.
//! - Error bodies carry a human-readable message only; internal detail is
//!   logged, not returned.
//! - Request bodies are decoded before the path id is resolved.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinError;
use usuarios_core::{RepoError, RepoResult, Usuario, UsuarioId, UsuarioRepository};

pub const MSG_NOT_FOUND: &str = "Usuario no encontrado";
pub const MSG_LIST_FAILED: &str = "Error al obtener usuarios";
pub const MSG_GET_FAILED: &str = "Error al obtener usuario";
pub const MSG_CREATE_FAILED: &str = "Error al crear usuario";
pub const MSG_UPDATE_FAILED: &str = "Error al actualizar usuario";
pub const MSG_DELETE_FAILED: &str = "Error al eliminar usuario";
pub const MSG_DELETED: &str = "Usuario eliminado";

/// Shared handler state: the injected persistence gateway.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn UsuarioRepository>,
}

impl AppState {
    pub fn new(repo: impl UsuarioRepository + 'static) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Request failure as seen by the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Decode(String),
    #[error("{}", MSG_NOT_FOUND)]
    NotFound,
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Repository call failure, including a blocking task that never returned.
#[derive(Debug)]
enum CallError {
    Repo(RepoError),
    Task(JoinError),
}

impl CallError {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::Repo(err) if err.is_not_found())
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Task(err) => write!(f, "repository task failed: {err}"),
        }
    }
}

/// Runs a synchronous repository call on the blocking pool.
async fn call_repo<T, F>(state: &AppState, op: F) -> Result<T, CallError>
where
    T: Send + 'static,
    F: FnOnce(&dyn UsuarioRepository) -> RepoResult<T> + Send + 'static,
{
    let repo = Arc::clone(&state.repo);
    tokio::task::spawn_blocking(move || op(repo.as_ref()))
        .await
        .map_err(CallError::Task)?
        .map_err(CallError::Repo)
}

fn internal(event: &str, err: &CallError, message: &'static str) -> ApiError {
    error!("event={event} module=http status=error error={err}");
    ApiError::Internal(message)
}

fn not_found_or_internal(event: &str, err: CallError, message: &'static str) -> ApiError {
    if err.is_not_found() {
        info!("event={event} module=http status=not_found error={err}");
        ApiError::NotFound
    } else {
        internal(event, &err, message)
    }
}

/// Decodes a request body that must be a JSON object shaped like `Usuario`.
///
/// Derived `Deserialize` also accepts a sequence for a struct, so anything
/// other than an object is rejected before field decoding.
fn decode_body(event: &str, body: &[u8]) -> Result<Usuario, ApiError> {
    let reject = |message: String| {
        warn!("event={event} module=http status=bad_request error={message}");
        ApiError::Decode(message)
    };

    let value: Value = serde_json::from_slice(body).map_err(|err| reject(err.to_string()))?;
    if !value.is_object() {
        return Err(reject(format!(
            "expected a JSON object for usuario, found {}",
            json_kind(&value)
        )));
    }
    serde_json::from_value(value).map_err(|err| reject(err.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ids that are not integers cannot name a live row.
fn parse_id(event: &str, raw: &str) -> Result<UsuarioId, ApiError> {
    raw.trim().parse().map_err(|_| {
        info!("event={event} module=http status=not_found raw_id={raw}");
        ApiError::NotFound
    })
}

/// `GET /usuarios`
pub async fn list_usuarios(State(state): State<AppState>) -> Result<Json<Vec<Usuario>>, ApiError> {
    let usuarios = call_repo(&state, |repo| repo.find_all())
        .await
        .map_err(|err| internal("usuario_list", &err, MSG_LIST_FAILED))?;
    Ok(Json(usuarios))
}

/// `GET /usuarios/:id`
pub async fn get_usuario(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Usuario>, ApiError> {
    let id = parse_id("usuario_get", &raw_id)?;
    let usuario = call_repo(&state, move |repo| repo.find_by_id(id))
        .await
        .map_err(|err| not_found_or_internal("usuario_get", err, MSG_GET_FAILED))?;
    Ok(Json(usuario))
}

/// `POST /usuarios`
pub async fn create_usuario(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Usuario>), ApiError> {
    let input = decode_body("usuario_create", &body)?;
    let created = call_repo(&state, move |repo| repo.create(&input))
        .await
        .map_err(|err| internal("usuario_create", &err, MSG_CREATE_FAILED))?;
    info!(
        "event=usuario_create module=http status=ok id={}",
        created.id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /usuarios/:id`
pub async fn update_usuario(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Usuario>, ApiError> {
    let input = decode_body("usuario_update", &body)?;
    let id = parse_id("usuario_update", &raw_id)?;
    let updated = call_repo(&state, move |repo| repo.update(id, &input))
        .await
        .map_err(|err| not_found_or_internal("usuario_update", err, MSG_UPDATE_FAILED))?;
    info!("event=usuario_update module=http status=ok id={id}");
    Ok(Json(updated))
}

/// `DELETE /usuarios/:id`
pub async fn delete_usuario(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id("usuario_delete", &raw_id)?;
    call_repo(&state, move |repo| repo.delete(id))
        .await
        .map_err(|err| not_found_or_internal("usuario_delete", err, MSG_DELETE_FAILED))?;
    info!("event=usuario_delete module=http status=ok id={id}");
    Ok(Json(MessageResponse {
        message: MSG_DELETED.to_string(),
    }))
}
