use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{wire_id, CreateApplicationRequest, CreatedApplicationResponse},
    repo::ApplicationDetails,
    services,
};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{ApiJson, AppError},
    state::AppState,
    validation::{parse_id, IdKind},
};

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/applications/:id",
            get(get_application).delete(delete_application),
        )
        .route("/applicationsByUser", get(list_my_applications))
}

#[instrument(skip(state, principal, payload))]
pub async fn create_application(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(payload): ApiJson<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<CreatedApplicationResponse>), AppError> {
    let job_id = payload
        .job_id
        .as_ref()
        .and_then(wire_id)
        .ok_or_else(|| AppError::validation("Job ID is required in a valid format."))?;
    let user_id = match &payload.user_id {
        None => principal.user_id,
        Some(raw) => wire_id(raw).ok_or_else(|| AppError::validation("Invalid user ID format."))?,
    };

    let application = services::create(&state, user_id, job_id, &principal).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedApplicationResponse {
            message: "Application successfully saved.",
            application,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_applications(
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationDetails>>, AppError> {
    Ok(Json(services::list(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApplicationDetails>, AppError> {
    let id = parse_id(&id, IdKind::Application)?;
    Ok(Json(services::get(&state, id).await?))
}

#[instrument(skip(state, principal), fields(user_id = principal.user_id))]
pub async fn list_my_applications(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<Vec<ApplicationDetails>>, AppError> {
    Ok(Json(services::list_by_user(&state, principal.user_id).await?))
}

#[instrument(skip(state, principal))]
pub async fn delete_application(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, IdKind::Application)?;
    services::delete(&state, id, &principal).await?;
    Ok(Json(MessageResponse::new("Application successfully deleted.")))
}
