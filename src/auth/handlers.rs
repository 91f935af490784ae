use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::{AuthResponse, LoginRequest, SignupRequest},
    services,
};
use crate::{
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let session = services::signup(
        &state,
        payload.name.as_deref().unwrap_or_default(),
        payload.email.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully.",
            user: session.user.into(),
            token: session.token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = services::login(
        &state,
        payload.email.as_deref().unwrap_or_default(),
        payload.password.as_deref().unwrap_or_default(),
    )
    .await
    .map_err(|e| match e {
        // an unknown email is an authentication failure on this surface
        AppError::NotFound(msg) => AppError::Unauthenticated(msg),
        other => other,
    })?;

    Ok(Json(AuthResponse {
        message: "Login successful.",
        user: session.user.into(),
        token: session.token,
    }))
}
