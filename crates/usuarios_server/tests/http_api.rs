use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use usuarios_core::{
    open_db_in_memory, DbError, InMemoryUsuarioRepository, RepoError, RepoResult,
    SqliteUsuarioRepository, Usuario, UsuarioId, UsuarioRepository,
};
use usuarios_server::{build_router, AppState};

fn memory_router() -> Router {
    build_router(AppState::new(InMemoryUsuarioRepository::new()))
}

fn sqlite_router() -> Router {
    build_router(AppState::new(SqliteUsuarioRepository::new(
        open_db_in_memory().unwrap(),
    )))
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn full_lifecycle_scenario() {
    for router in [memory_router(), sqlite_router()] {
        let (status, created) = send(
            &router,
            Method::POST,
            "/usuarios",
            Some(r#"{"nombre":"Ana","correo":"ana@mail.com","edad":25}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();
        assert!(id > 0);
        assert_eq!(created["nombre"], "Ana");
        assert_eq!(created["correo"], "ana@mail.com");
        assert_eq!(created["edad"], 25);
        assert_eq!(created["sincronizado"], 0);

        let uri = format!("/usuarios/{id}");
        let (status, fetched) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(
            &router,
            Method::PUT,
            &uri,
            Some(r#"{"nombre":"Ana L.","correo":"ana@mail.com","edad":26}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], id);
        assert_eq!(updated["nombre"], "Ana L.");
        assert_eq!(updated["edad"], 26);

        let (status, confirmation) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(confirmation, json!({ "message": "Usuario eliminado" }));

        let (status, error) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error, json!({ "error": "Usuario no encontrado" }));
    }
}

#[tokio::test]
async fn malformed_body_is_rejected_without_creating() {
    for router in [memory_router(), sqlite_router()] {
        let (status, error) = send(&router, Method::POST, "/usuarios", Some(r#"{"nombre": "#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error["error"].as_str().unwrap().is_empty());

        let (status, list) = send(&router, Method::GET, "/usuarios", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([]));
    }
}

#[tokio::test]
async fn wrong_field_type_is_bad_request() {
    let router = memory_router();
    let (status, error) = send(&router, Method::POST, "/usuarios", Some(r#"{"edad":"veinte"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn create_without_content_type_still_decodes() {
    let router = memory_router();
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/usuarios")
                .body(Body::from(r#"{"nombre":"Sin cabecera"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn create_ignores_client_id_and_keeps_sync_flag() {
    let router = sqlite_router();
    let (status, created) = send(
        &router,
        Method::POST,
        "/usuarios",
        Some(r#"{"id":999,"nombre":"Ana","correo":"ana@mail.com","edad":25,"sincronizado":1}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["id"], 999);
    assert_eq!(created["sincronizado"], 1);
}

#[tokio::test]
async fn update_keeps_id_and_sync_flag() {
    let router = sqlite_router();
    let (_, created) = send(
        &router,
        Method::POST,
        "/usuarios",
        Some(r#"{"nombre":"Ana","correo":"ana@mail.com","edad":25,"sincronizado":1}"#),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &router,
        Method::PUT,
        &format!("/usuarios/{id}"),
        Some(r#"{"id":500,"nombre":"A","correo":"a@x.com","edad":30,"sincronizado":0}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({
            "id": id,
            "nombre": "A",
            "correo": "a@x.com",
            "edad": 30,
            "sincronizado": 1
        })
    );
}

#[tokio::test]
async fn list_excludes_deleted_usuarios() {
    let router = memory_router();
    for nombre in ["A", "B"] {
        let body = json!({ "nombre": nombre }).to_string();
        send(&router, Method::POST, "/usuarios", Some(body.as_str())).await;
    }

    let (_, list) = send(&router, Method::GET, "/usuarios", None).await;
    let first_id = list[0]["id"].as_i64().unwrap();
    send(&router, Method::DELETE, &format!("/usuarios/{first_id}"), None).await;

    let (status, list) = send(&router, Method::GET, "/usuarios", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["nombre"], "B");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let router = sqlite_router();
    for uri in ["/usuarios/77", "/usuarios/abc"] {
        let (status, _) = send(&router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "GET {uri}");

        let (status, _) = send(&router, Method::PUT, uri, Some(r#"{"nombre":"X"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "PUT {uri}");

        let (status, _) = send(&router, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
    }
}

#[tokio::test]
async fn update_decodes_body_before_resolving_id() {
    let router = memory_router();
    let (status, _) = send(&router, Method::PUT, "/usuarios/77", Some("not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_delete_is_not_found() {
    let router = memory_router();
    let (_, created) = send(&router, Method::POST, "/usuarios", Some(r#"{"nombre":"Ana"}"#)).await;
    let uri = format!("/usuarios/{}", created["id"]);

    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_object_bodies_are_rejected_without_writing() {
    for router in [memory_router(), sqlite_router()] {
        for body in ["[]", r#"[0,"Ana","ana@mail.com",25,0]"#, "null", "7"] {
            let (status, error) = send(&router, Method::POST, "/usuarios", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "POST {body}");
            assert!(error["error"].is_string(), "POST {body}");
        }

        let (_, list) = send(&router, Method::GET, "/usuarios", None).await;
        assert_eq!(list, json!([]));

        let (_, created) = send(&router, Method::POST, "/usuarios", Some(r#"{"nombre":"Ana"}"#)).await;
        let uri = format!("/usuarios/{}", created["id"]);
        let (status, _) = send(
            &router,
            Method::PUT,
            &uri,
            Some(r#"["Otro","otro@mail.com",99]"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, fetched) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }
}

/// Gateway whose store is always unreachable.
struct BrokenStore;

fn store_down() -> RepoError {
    DbError::UnsupportedSchemaVersion {
        db_version: 9,
        latest_supported: 1,
    }
    .into()
}

impl UsuarioRepository for BrokenStore {
    fn find_all(&self) -> RepoResult<Vec<Usuario>> {
        Err(store_down())
    }

    fn find_by_id(&self, _id: UsuarioId) -> RepoResult<Usuario> {
        Err(store_down())
    }

    fn create(&self, _usuario: &Usuario) -> RepoResult<Usuario> {
        Err(store_down())
    }

    fn update(&self, _id: UsuarioId, _input: &Usuario) -> RepoResult<Usuario> {
        Err(store_down())
    }

    fn delete(&self, _id: UsuarioId) -> RepoResult<()> {
        Err(store_down())
    }
}

#[tokio::test]
async fn store_failures_map_to_internal_error_without_detail() {
    let router = build_router(AppState::new(BrokenStore));

    let (status, error) = send(&router, Method::GET, "/usuarios", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error, json!({ "error": "Error al obtener usuarios" }));

    let (status, error) = send(&router, Method::POST, "/usuarios", Some(r#"{"nombre":"Ana"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error, json!({ "error": "Error al crear usuario" }));

    let (status, error) = send(&router, Method::GET, "/usuarios/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!error["error"].as_str().unwrap().contains("schema"));

    let (status, _) = send(&router, Method::PUT, "/usuarios/1", Some("{}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&router, Method::DELETE, "/usuarios/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
