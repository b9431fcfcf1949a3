//! Monthly report handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState, REPORT_SOURCE_HEADER};
use costbook_core::{Materialized, Period};

/// Query parameters for a monthly report
///
/// Kept as strings so malformed values produce a JSON 400 instead of the
/// extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub id: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

fn required_int<T: std::str::FromStr>(value: Option<&str>, name: &str) -> Result<T, AppError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request(&format!("{} is required", name)))?;
    value
        .parse()
        .map_err(|_| AppError::bad_request(&format!("{} must be an integer", name)))
}

impl ReportQuery {
    fn validate(&self) -> Result<(i64, Period), AppError> {
        let user_id: i64 = required_int(self.id.as_deref(), "id")?;
        let year: i32 = required_int(self.year.as_deref(), "year")?;
        let month: u32 = required_int(self.month.as_deref(), "month")?;

        let period = Period::new(year, month);
        period.ensure_reportable().map_err(AppError::from_core)?;

        Ok((user_id, period))
    }
}

/// GET /api/report?id=&year=&month= - Category-complete monthly report
///
/// The `x-report-source` header says whether the report was computed live,
/// served from the cache, or computed and stored.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let (user_id, period) = params.validate()?;

    // Runs to completion on the blocking pool even if the client goes away
    let task_state = state.clone();
    let materialized = tokio::task::spawn_blocking(
        move || -> costbook_core::Result<Option<Materialized>> {
            if !task_state.db.user_exists(user_id)? {
                return Ok(None);
            }
            task_state.materializer.materialize(user_id, period).map(Some)
        },
    )
    .await?
    .map_err(AppError::from_core)?
    .ok_or_else(|| AppError::not_found("user not found"))?;

    let mut response = Json(materialized.report).into_response();
    response.headers_mut().insert(
        REPORT_SOURCE_HEADER,
        HeaderValue::from_static(materialized.source.as_str()),
    );
    Ok(response)
}
