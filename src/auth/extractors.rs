use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::{claims::Principal, jwt::JwtKeys};
use crate::error::AppError;

/// Reads `Authorization: Bearer <token>`.
///
/// `Ok(None)` when no credential was presented, `Err` when one was presented
/// but does not verify.
pub fn principal_from_headers(
    headers: &HeaderMap,
    keys: &JwtKeys,
) -> Result<Option<Principal>, AppError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| AppError::unauthenticated("Invalid or expired token."))?
        .trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let token = match raw.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => return Err(AppError::unauthenticated("Invalid or expired token.")),
    };
    if token.is_empty() {
        return Ok(None);
    }

    match keys.verify(token) {
        Ok(principal) => Ok(Some(principal)),
        Err(e) => {
            warn!("invalid or expired token");
            Err(e)
        }
    }
}

/// Principal required: routes behind this extractor reject anonymous calls.
pub struct AuthUser(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        principal_from_headers(&parts.headers, &keys)?
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthenticated("Access denied. No token provided."))
    }
}

/// Principal optional: an absent header yields `None`, a bad token still fails.
pub struct MaybeAuthUser(pub Option<Principal>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        Ok(MaybeAuthUser(principal_from_headers(&parts.headers, &keys)?))
    }
}
