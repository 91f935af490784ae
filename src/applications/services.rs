use anyhow::anyhow;
use tracing::{info, warn};

use super::repo::{ApplicationDetails, ApplicationScope, USER_FK};
use crate::{
    auth::claims::Principal,
    db::StoreError,
    error::{AppError, AppResult},
    state::AppState,
};

pub async fn create(
    st: &AppState,
    user_id: i32,
    job_id: i32,
    principal: &Principal,
) -> AppResult<ApplicationDetails> {
    if !principal.owns(user_id) {
        warn!(acting = principal.user_id, target = user_id, "application for another user");
        return Err(AppError::forbidden("Access denied."));
    }
    if st.users.find_by_id(user_id).await?.is_none() {
        return Err(AppError::not_found("User not found."));
    }
    if st.jobs.find_by_id(job_id).await?.is_none() {
        return Err(AppError::not_found("Job not found."));
    }
    if st.applications.find_by_pair(user_id, job_id).await?.is_some() {
        return Err(AppError::conflict("Application already exists."));
    }

    let record = st
        .applications
        .create(user_id, job_id)
        .await
        .map_err(insert_error)?;
    info!(application_id = record.id, user_id, job_id, "application created");

    find(st, record.id)
        .await?
        .ok_or_else(|| anyhow!("application {} vanished after insert", record.id).into())
}

/// The user or job may vanish between the existence checks and the insert.
fn insert_error(e: StoreError) -> AppError {
    match e {
        StoreError::MissingReference(Some(c)) if c == USER_FK => AppError::not_found("User not found."),
        StoreError::MissingReference(_) => AppError::not_found("Job not found."),
        other => AppError::on_unique("Application already exists.")(other),
    }
}

pub async fn list(st: &AppState) -> AppResult<Vec<ApplicationDetails>> {
    Ok(st.applications.details(ApplicationScope::All).await?)
}

pub async fn find(st: &AppState, id: i32) -> AppResult<Option<ApplicationDetails>> {
    let mut found = st.applications.details(ApplicationScope::ById(id)).await?;
    Ok(found.pop())
}

pub async fn get(st: &AppState, id: i32) -> AppResult<ApplicationDetails> {
    find(st, id)
        .await?
        .ok_or_else(|| AppError::not_found("Application not found."))
}

/// Callers pass the authenticated user's id; nobody lists someone else's.
pub async fn list_by_user(st: &AppState, user_id: i32) -> AppResult<Vec<ApplicationDetails>> {
    Ok(st.applications.details(ApplicationScope::ByUser(user_id)).await?)
}

pub async fn list_by_job(st: &AppState, job_id: i32) -> AppResult<Vec<ApplicationDetails>> {
    Ok(st.applications.details(ApplicationScope::ByJob(job_id)).await?)
}

/// Existence and ownership are checked together, so someone else's
/// application looks exactly like a missing one.
pub async fn delete(st: &AppState, id: i32, principal: &Principal) -> AppResult<()> {
    if st.applications.find_owned(id, principal.user_id).await?.is_none() {
        warn!(application_id = id, acting = principal.user_id, "application delete refused");
        return Err(AppError::not_found("Application not found."));
    }
    if !st.applications.delete(id).await? {
        return Err(AppError::not_found("Application not found."));
    }
    info!(application_id = id, user_id = principal.user_id, "application deleted");
    Ok(())
}
