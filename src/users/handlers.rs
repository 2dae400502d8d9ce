//! User HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::http::request::JsonBody;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::RequestContext;
use crate::users::commands::{CreateUserRequest, UpdateUserRequest};
use crate::users::domain::User;

pub async fn create_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let log = ctx.logger();
    log.info("Creating new user");

    match state.users.create.execute(body) {
        Ok(user) => {
            log.info("User created successfully");
            Ok((StatusCode::CREATED, Json(user)))
        }
        Err(err) => {
            log.warn("User creation failed");
            Err(err.into())
        }
    }
}

pub async fn list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Value>, ApiError> {
    let log = ctx.logger();
    log.info("Fetching all users");

    let users = state.users.get_all.execute()?;
    log.info("Users fetched successfully");
    Ok(Json(json!({
        "count": users.len(),
        "users": users,
    })))
}

pub async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    ctx.logger().debug("Fetching user");

    state
        .users
        .get
        .execute(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

pub async fn update_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let log = ctx.logger();
    log.info("Updating user");

    let user = state.users.update.execute(&id, body).inspect_err(|_| log.warn("User update failed"))?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ctx.logger().info("Deleting user");

    state.users.delete.execute(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
