use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::str::FromStr;

mod analysis;
mod config;
mod error;
mod state;

use crate::analysis::{handle_analysis_post, handle_rules_get};
pub use analysis::AnalysisRequest;
pub use config::ServerConfig;
pub use error::SparqlensServerError;
pub use state::AppState;

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from_str(&config.bind)?;

    let app_state = AppState {
        analyzer: config.analyzer,
    };
    let app = create_router(app_state);

    let app = if config.cors {
        app.layer(tower_http::cors::CorsLayer::permissive())
    } else {
        app
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    Ok(axum::serve(listener, app).await?)
}

/// Creates the routes of the server.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/analysis", post(handle_analysis_post))
        .route("/rules", get(handle_rules_get))
        .with_state(app_state)
}
