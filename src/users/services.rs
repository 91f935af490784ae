use std::collections::HashMap;

use tracing::{info, warn};

use super::{
    dto::{PublicUser, UserPatch, UserView},
    repo::{User, UserChanges},
};
use crate::{
    auth::{claims::Principal, password},
    error::{AppError, AppResult},
    state::AppState,
    validation::{normalize_email, present, require_valid_email},
};

pub async fn list(st: &AppState) -> AppResult<Vec<UserView>> {
    let users = st.users.list().await?;
    let mut by_user: HashMap<i32, Vec<_>> = HashMap::new();
    for record in st.applications.records(None).await? {
        by_user.entry(record.user_id).or_default().push(record);
    }
    Ok(users
        .into_iter()
        .map(|u| UserView {
            applications: by_user.remove(&u.id).unwrap_or_default(),
            user: u.into(),
        })
        .collect())
}

pub async fn find(st: &AppState, id: i32) -> AppResult<Option<User>> {
    Ok(st.users.find_by_id(id).await?)
}

pub async fn get(st: &AppState, id: i32) -> AppResult<UserView> {
    let user = find(st, id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found."))?;
    let applications = st.applications.records(Some(id)).await?;
    Ok(UserView {
        user: user.into(),
        applications,
    })
}

fn ensure_owner(principal: &Principal, id: i32) -> AppResult<()> {
    if principal.owns(id) {
        Ok(())
    } else {
        warn!(acting = principal.user_id, target = id, "user access denied");
        Err(AppError::forbidden("Access denied."))
    }
}

pub async fn update(
    st: &AppState,
    id: i32,
    patch: UserPatch,
    principal: &Principal,
) -> AppResult<PublicUser> {
    let name = present(patch.name.as_deref()).map(str::to_string);
    let email = present(patch.email.as_deref()).map(normalize_email);
    let plain = patch.password.filter(|p| !p.trim().is_empty());
    if name.is_none() && email.is_none() && plain.is_none() {
        return Err(AppError::validation("No update data provided."));
    }
    ensure_owner(principal, id)?;

    if find(st, id).await?.is_none() {
        return Err(AppError::not_found("User not found."));
    }

    if let Some(email) = &email {
        require_valid_email(email)?;
        if let Some(other) = st.users.find_by_email(email).await? {
            if other.id != id {
                return Err(AppError::conflict("Email already in use."));
            }
        }
    }

    let password_hash = plain.as_deref().map(password::hash_password).transpose()?;
    let changes = UserChanges {
        name,
        email,
        password_hash,
    };
    let user = st
        .users
        .update(id, &changes)
        .await
        .map_err(AppError::on_unique("Email already in use."))?
        .ok_or_else(|| AppError::not_found("User not found."))?;

    info!(user_id = id, "user updated");
    Ok(user.into())
}

pub async fn delete(st: &AppState, id: i32, principal: &Principal) -> AppResult<()> {
    ensure_owner(principal, id)?;
    if !st.users.delete(id).await? {
        return Err(AppError::not_found("User not found."));
    }
    info!(user_id = id, "user deleted");
    Ok(())
}
