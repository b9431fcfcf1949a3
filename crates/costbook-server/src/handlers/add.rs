//! Add user / add cost handler

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use crate::{AppError, AppState, DataResponse};
use costbook_core::{NewCost, NewUser, Period, PeriodKind};

const MAX_NAME_LEN: usize = 64;
const MAX_DESCRIPTION_LEN: usize = 256;

/// Body of POST /api/add, discriminated by `kind`
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AddRequest {
    User(AddUserRequest),
    Cost(AddCostRequest),
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct AddCostRequest {
    pub userid: i64,
    pub description: String,
    pub category: String,
    pub sum: f64,
    /// RFC 3339 timestamp; defaults to now
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Trim and length-check a text field
fn text_field(value: &str, name: &str, max: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > max {
        return Err(AppError::bad_request(&format!(
            "{} must be between 1 and {} characters",
            name, max
        )));
    }
    Ok(trimmed.to_string())
}

impl AddUserRequest {
    fn validate(self) -> Result<NewUser, AppError> {
        Ok(NewUser {
            id: self.id,
            first_name: text_field(&self.first_name, "first_name", MAX_NAME_LEN)?,
            last_name: text_field(&self.last_name, "last_name", MAX_NAME_LEN)?,
            birthday: self.birthday,
        })
    }
}

impl AddCostRequest {
    fn validate(self, state: &AppState) -> Result<NewCost, AppError> {
        let description = text_field(&self.description, "description", MAX_DESCRIPTION_LEN)?;

        let category = state
            .materializer
            .registry()
            .normalize(self.category.trim())
            .ok_or_else(|| {
                AppError::bad_request(&format!(
                    "category must be one of: {}",
                    state.materializer.registry()
                ))
            })?
            .to_string();

        if !(self.sum > 0.0 && self.sum.is_finite()) {
            return Err(AppError::bad_request("sum must be a positive number"));
        }

        // Past months are frozen once their report is materialized
        if let Some(ts) = self.created_at {
            let period = Period::containing(ts.date_naive());
            if state.materializer.classify(period) == PeriodKind::Past {
                return Err(AppError::bad_request(
                    "created_at must not fall in a past month",
                ));
            }
        }

        Ok(NewCost {
            user_id: self.userid,
            description,
            category,
            sum: self.sum,
            created_at: self.created_at,
        })
    }
}

/// POST /api/add - Create a user or record a cost
pub async fn add(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = body.map_err(|e| AppError::bad_request(&e.body_text()))?;

    match request {
        AddRequest::User(req) => {
            let new_user = req.validate()?;
            let user = state
                .db
                .create_user(&new_user)
                .map_err(AppError::from_core)?;
            info!(user_id = user.id, "User added via API");
            Ok((StatusCode::CREATED, DataResponse::json(user)).into_response())
        }
        AddRequest::Cost(req) => {
            let new_cost = req.validate(&state)?;
            let cost = state.db.add_cost(&new_cost).map_err(|e| match e {
                costbook_core::Error::NotFound(_) => AppError::not_found("user not found"),
                other => AppError::from_core(other),
            })?;
            Ok((StatusCode::CREATED, DataResponse::json(cost)).into_response())
        }
    }
}
