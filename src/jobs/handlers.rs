use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{CreatedJobResponse, JobDraft, JobPatch, JobsQuery, UpdatedJobResponse},
    filter::JobFilter,
    repo::Job,
    services,
};
use crate::{
    dto::MessageResponse,
    error::{ApiJson, AppError},
    state::AppState,
    validation::{parse_id, IdKind},
};

pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route(
            "/jobs/:id",
            get(get_job).patch(update_job).delete(delete_job),
        )
}

#[instrument(skip(state, draft))]
pub async fn create_job(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<JobDraft>,
) -> Result<(StatusCode, Json<CreatedJobResponse>), AppError> {
    let job = services::create(&state, draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedJobResponse {
            message: "Job created successfully.",
            job,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(q): Query<JobsQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let filter = JobFilter::new(q.keyword, q.location)?;
    Ok(Json(services::list(&state, &filter).await?))
}

#[instrument(skip(state))]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let id = parse_id(&id, IdKind::Job)?;
    Ok(Json(services::get(&state, id).await?))
}

#[instrument(skip(state, patch))]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<JobPatch>,
) -> Result<Json<UpdatedJobResponse>, AppError> {
    let id = parse_id(&id, IdKind::Job)?;
    let updated_job = services::update(&state, id, patch).await?;
    Ok(Json(UpdatedJobResponse {
        message: "Job successfully updated.",
        updated_job,
    }))
}

#[instrument(skip(state))]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id, IdKind::Job)?;
    services::delete(&state, id).await?;
    Ok(Json(MessageResponse::new("Job successfully deleted.")))
}
