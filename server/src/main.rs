use std::sync::Arc;

use axum::{
    routing::get,
    Router,
    response::Json,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use improc::stock::stock_registry;

mod handlers;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Engines register before the server starts; the registry is read-only
    // from here on.
    let registry = Arc::new(stock_registry());

    // Build router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/parse", get(handlers::parse))
        .route("/validate", get(handlers::validate))
        .route("/engines", get(handlers::engines))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(registry);

    // Server address
    let addr = "0.0.0.0:3000";
    log::info!("improc server running on http://{}", addr);
    log::info!("API endpoints:");
    log::info!("   GET /parse?<query> - Parse an operation query");
    log::info!("   GET /validate?<fragment> - Validate a single operation");
    log::info!("   GET /engines - List engine capabilities");
    log::info!("   GET /health - Health check");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn root() -> &'static str {
    "improc server v0.1.0\n\nAPI Endpoints:\n  GET /parse?<query>\n  GET /validate?<fragment>\n  GET /engines\n  GET /health\n"
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": "0.1.0"
    }))
}
