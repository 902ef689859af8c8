use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{search_url, FOLLOW_UP_PATH};
use crate::state::SearchBackend;
use crate::types::FollowUpRequest;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("missing search query")]
    MissingQuery,
    #[error("missing session id")]
    MissingSession,
    #[error("search backend unreachable: {0}")]
    Unreachable(String),
    #[error("search backend returned {0}")]
    Upstream(StatusCode),
    #[error("search backend sent an invalid body: {0}")]
    InvalidBody(String),
}

impl ProxyError {
    fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingQuery | ProxyError::MissingSession => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(status) if status.is_client_error() => *status,
            ProxyError::Unreachable(_) | ProxyError::Upstream(_) | ProxyError::InvalidBody(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search_handler(
    State(backend): State<SearchBackend>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ProxyError> {
    let query = params
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or(ProxyError::MissingQuery)?;

    log::info!("proxying search: {}", query);
    forward(backend.client.get(search_url(&backend.base_url, &query))).await
}

pub async fn follow_up_handler(
    State(backend): State<SearchBackend>,
    Json(request): Json<FollowUpRequest>,
) -> Result<Json<Value>, ProxyError> {
    if request.session_id.trim().is_empty() {
        return Err(ProxyError::MissingSession);
    }

    log::info!("proxying follow-up for session {}", request.session_id);
    let url = format!("{}{}", backend.base_url, FOLLOW_UP_PATH);
    forward(backend.client.post(url).json(&request)).await
}

// The upstream body is passed through untouched; the page normalizes it.
async fn forward(request: reqwest::RequestBuilder) -> Result<Json<Value>, ProxyError> {
    let response = request.send().await.map_err(|e| {
        log::error!("search backend request failed: {}", e);
        ProxyError::Unreachable(e.to_string())
    })?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("search backend answered {}", status);
        let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        return Err(ProxyError::Upstream(status));
    }

    let body = response.json::<Value>().await.map_err(|e| {
        log::error!("search backend body is not JSON: {}", e);
        ProxyError::InvalidBody(e.to_string())
    })?;
    Ok(Json(body))
}
