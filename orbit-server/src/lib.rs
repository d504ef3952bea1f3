pub mod agent;
pub mod config;
pub mod llm;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use orbit_shared::AGENT_ROUTE;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use agent::Agent;
pub use config::ServerConfig;
pub use llm::OpenAiAgent;

pub fn router(agent: Arc<dyn Agent>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route(AGENT_ROUTE, post(move |body| routes::run_agent(body, agent)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
