// File: services/pushrelay_backend/src/main.rs
use axum::{routing::get, Json, Router};
use pushrelay_config::load_config;
use pushrelay_fcm::routes as fcm_routes;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[axum::debug_handler]
async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome!" }))
}

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));

    pushrelay_common::logging::init();

    let app = Router::new()
        .route("/", get(welcome))
        .merge(fcm_routes(config.clone()).await);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    let app = {
        use pushrelay_fcm::openapi::FcmApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        info!("Adding Swagger UI at /docs");

        let swagger_ui = SwaggerUi::new("/docs").url("/docs/openapi.json", FcmApiDoc::openapi());
        app.merge(swagger_ui)
    };

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
