use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use juniper::http::{graphiql::graphiql_source, GraphQLRequest};
use serde_json::json;
use tracing::instrument;

use super::context::GraphQLContext;
use crate::{
    auth::extractors::MaybeAuthUser,
    error::{ApiJson, AppError},
    state::AppState,
};

pub fn graphql_routes() -> Router<AppState> {
    Router::new().route("/graphql", get(graphql_playground).post(graphql_handler))
}

/// Executes one operation. Requests that fail validation are a 400; anything
/// that executed, including resolver errors, is a 200.
#[instrument(skip_all)]
pub async fn graphql_handler(
    State(state): State<AppState>,
    auth: Result<MaybeAuthUser, AppError>,
    ApiJson(request): ApiJson<GraphQLRequest>,
) -> Response {
    let principal = match auth {
        Ok(MaybeAuthUser(principal)) => principal,
        Err(e) => return rejected(e),
    };

    let context = GraphQLContext::new(state.clone(), principal);
    let response = request.execute(&state.schema, &context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// A bad bearer token fails the whole request, shaped like a GraphQL error.
fn rejected(e: AppError) -> Response {
    let body = json!({
        "errors": [{
            "message": e.public_message(),
            "extensions": { "code": e.code() },
        }]
    });
    (e.status_code(), Json(body)).into_response()
}

pub async fn graphql_playground() -> Html<String> {
    Html(graphiql_source("/graphql", None))
}
