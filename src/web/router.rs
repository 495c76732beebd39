//! Web application router and middleware setup.

use crate::web::config::WebConfig;
use crate::web::handlers::{self, SharedStore};
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the axum application with all routes and middleware.
pub fn create_app(config: &WebConfig, store: SharedStore) -> Router {
    let mut app = Router::new()
        .route("/json", get(handlers::get_json))
        .route("/prometheus", get(handlers::get_prometheus))
        .with_state(store);

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
