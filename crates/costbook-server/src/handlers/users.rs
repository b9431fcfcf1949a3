//! User directory handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use crate::{AppError, AppState, DataResponse};
use costbook_core::{User, UserWithTotal};

/// GET /api/users - List users, newest first
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DataResponse<Vec<User>>>, AppError> {
    let users = state.db.list_users()?;
    Ok(DataResponse::json(users))
}

/// GET /api/users/:id - One user with the total of their costs
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<UserWithTotal>>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::bad_request("id must be an integer"))?;

    let user = state
        .db
        .get_user_with_total(id)?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    Ok(DataResponse::json(user))
}
