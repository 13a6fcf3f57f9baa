//! Route table and cross-origin policy.

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::{
    create_usuario, delete_usuario, get_usuario, list_usuarios, update_usuario, AppState,
};

/// Create usuario routes
pub fn usuario_routes(state: AppState) -> Router {
    Router::new()
        .route("/usuarios", get(list_usuarios).post(create_usuario))
        .route(
            "/usuarios/:id",
            get(get_usuario).put(update_usuario).delete(delete_usuario),
        )
        .with_state(state)
}

/// Permissive CORS: any origin, the four CRUD methods, credentials allowed.
///
/// The origin is mirrored rather than sent as `*`, since browsers reject a
/// wildcard origin on credentialed requests.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Full application router: usuario routes behind the CORS layer.
pub fn build_router(state: AppState) -> Router {
    usuario_routes(state).layer(cors_layer())
}
