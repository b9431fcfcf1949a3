//! Request log handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::{AppError, AppState, DataResponse};
use costbook_core::RequestLog;

/// Query parameters for the request log
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<String>,
}

/// GET /api/logs - Most recent request log entries
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogsQuery>,
) -> Result<Json<DataResponse<Vec<RequestLog>>>, AppError> {
    let limit = params
        .limit
        .as_deref()
        .map(|s| s.trim().parse::<i64>())
        .transpose()
        .map_err(|_| AppError::bad_request("limit must be an integer"))?;

    let entries = state.db.list_request_logs(limit)?;
    Ok(DataResponse::json(entries))
}
