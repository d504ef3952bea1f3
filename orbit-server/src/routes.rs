use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use orbit_shared::{AgentReply, AgentRequest, ErrorBody};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::agent::Agent;

const FALLBACK_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Agent(String),
}

impl RouteError {
    fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            FALLBACK_ERROR.to_string()
        } else {
            message
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let message = self.message();
        match &self {
            RouteError::Validation(_) => error!("Rejected agent request: {}", message),
            RouteError::Agent(_) => error!("Agent failed: {}", message),
        }
        (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message })).into_response()
    }
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn run_agent(
    body: Result<Json<AgentRequest>, JsonRejection>,
    agent: Arc<dyn Agent>,
) -> Result<Json<AgentReply>, RouteError> {
    let Json(request) = body.map_err(|rejection| RouteError::Validation(rejection.body_text()))?;
    request
        .validate()
        .map_err(|e| RouteError::Validation(e.to_string()))?;

    info!("Agent request with {} messages", request.messages.len());

    let reply = agent
        .run(request.messages)
        .await
        .map_err(|e| RouteError::Agent(e.to_string()))?;

    Ok(Json(AgentReply { reply }))
}
