//! Axum Handlers for the REST API
//!
//! This module contains the request/response endpoints. It uses `utoipa` doc
//! comments to generate OpenAPI documentation.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mind_search_core::{AgentClient, AgentError};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    models::{ChatRequest, ChatResponse, ErrorResponse, WelcomeResponse},
    prompt::compose_query,
    state::AppState,
};

pub const WELCOME_MESSAGE: &str = "Welcome to Mind Search API";

/// Errors surfaced by the HTTP endpoints. Both variants carry the raw error
/// text to the client in `detail`.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be decoded.
    Validation(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => {
                warn!(%detail, "Rejected request body");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ErrorResponse { detail }),
                )
                    .into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        detail: err.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        Self::InternalServerError(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

/// Answers a single chat request with one agent run.
pub async fn handle_chat(
    agent: &dyn AgentClient,
    request: &ChatRequest,
) -> Result<ChatResponse, AgentError> {
    let query = compose_query(&request.message, request.history());
    let output = agent.invoke(&query).await?;
    Ok(ChatResponse::answer(output.into_text()))
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = WelcomeResponse)
    )
)]
pub async fn read_root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Ask the research agent a question, optionally with earlier turns as context.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The agent's answer", body = ChatResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "The agent failed", body = ErrorResponse)
    )
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;
    info!(
        history_len = request.history().len(),
        "Received chat request"
    );

    let response = handle_chat(state.agent.as_ref(), &request).await?;
    Ok(Json(response))
}
