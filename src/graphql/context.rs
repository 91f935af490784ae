use crate::{
    auth::claims::Principal,
    error::{AppError, AppResult},
    state::AppState,
};

/// Per-request resolver context. The bearer token is decoded once, before
/// execution starts.
pub struct GraphQLContext {
    pub state: AppState,
    pub principal: Option<Principal>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(state: AppState, principal: Option<Principal>) -> Self {
        Self { state, principal }
    }

    pub fn require_principal(&self) -> AppResult<&Principal> {
        self.principal
            .as_ref()
            .ok_or_else(|| AppError::unauthenticated("User not authenticated."))
    }
}
