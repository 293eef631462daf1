use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers::{root, upload};

pub fn build_router(config: &Config) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(config.upload_limit_bytes)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Any origin, method and header, with credentials. Credentials rule out the
/// `*` wildcard, so each is mirrored back from the request instead.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
