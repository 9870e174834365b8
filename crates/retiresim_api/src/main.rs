mod error;
mod handlers;
mod routes;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let app = Router::new()
        .route("/", get(|| async { "retiresim API" }))
        .merge(routes::simulation_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001")
        .await
        .expect("failed to bind to port 3001");

    tracing::info!(addr = %listener.local_addr().unwrap(), "retiresim API listening");

    axum::serve(listener, app).await.expect("failed to start server");
}
