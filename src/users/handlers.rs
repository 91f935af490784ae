use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{UpdateUserResponse, UserPatch, UserView},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{ApiJson, AppError},
    state::AppState,
    validation::{parse_id, IdKind},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, AppError> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserView>, AppError> {
    let id = parse_id(&id, IdKind::User)?;
    Ok(Json(services::get(&state, id).await?))
}

#[instrument(skip(state, principal, patch))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    let id = parse_id(&id, IdKind::User)?;
    let updated_user = services::update(&state, id, patch, &principal).await?;
    Ok(Json(UpdateUserResponse {
        message: "User successfully updated.",
        updated_user,
    }))
}

#[instrument(skip(state, principal))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, IdKind::User)?;
    services::delete(&state, id, &principal).await?;
    Ok(Json(MessageResponse::new("User successfully deleted.")))
}
