pub mod context;
pub mod handlers;
pub mod schema;
pub mod types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::graphql_routes()
}
