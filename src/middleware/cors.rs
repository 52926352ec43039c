use tower_http::cors::{Any, CorsLayer};

/// Browser clients upload from arbitrary origins.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
