use axum::extract::FromRef;
use tracing::{info, warn};

use super::{jwt::JwtKeys, password};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::repo::User,
    validation::{normalize_email, present, require_valid_email},
};

/// A user plus a freshly issued bearer token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub async fn signup(st: &AppState, name: &str, email: &str, plain: &str) -> AppResult<Session> {
    let (Some(name), Some(email), true) =
        (present(Some(name)), present(Some(email)), !plain.trim().is_empty())
    else {
        return Err(AppError::validation("Name, email and password are required."));
    };
    let email = normalize_email(email);
    require_valid_email(&email)?;

    if st.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::conflict("Email already in use."));
    }

    let hash = password::hash_password(plain)?;
    let user = st
        .users
        .create(name, &email, &hash)
        .await
        .map_err(AppError::on_unique("Email already in use."))?;

    let token = JwtKeys::from_ref(st).issue(user.id, &user.email)?;
    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Session { user, token })
}

pub async fn login(st: &AppState, email: &str, plain: &str) -> AppResult<Session> {
    let (Some(email), true) = (present(Some(email)), !plain.trim().is_empty()) else {
        return Err(AppError::validation("Email and password are required."));
    };
    let email = normalize_email(email);

    let Some(user) = st.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::not_found("User email not found."));
    };

    if !password::verify_password(plain, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials("Invalid email or password.".into()));
    }

    let token = JwtKeys::from_ref(st).issue(user.id, &user.email)?;
    info!(user_id = user.id, "user logged in");
    Ok(Session { user, token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fake_state;

    #[tokio::test]
    async fn signup_succeeds_once_per_email() {
        let st = fake_state();
        let session = signup(&st, "A", "a@x.com", "p").await.unwrap();
        assert_eq!(session.user.email, "a@x.com");
        assert!(!session.token.is_empty());

        let err = signup(&st, "B", "A@X.com ", "q").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Email already in use."));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_for_one_email_succeed_once() {
        let st = fake_state();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let st = st.clone();
                tokio::spawn(async move { signup(&st, &format!("N{i}"), "same@x.com", "p").await })
            })
            .collect();
        let mut ok = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) => assert!(matches!(e, AppError::Conflict(ref m) if m == "Email already in use."), "unexpected {e:?}"),
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn signup_token_identifies_the_new_user() {
        let st = fake_state();
        let session = signup(&st, "A", "a@x.com", "p").await.unwrap();
        let principal = JwtKeys::from_ref(&st).verify(&session.token).unwrap();
        assert_eq!(principal.user_id, session.user.id);
        assert_eq!(principal.email, "a@x.com");
    }

    #[tokio::test]
    async fn signup_stores_a_hash_not_the_password() {
        let st = fake_state();
        let session = signup(&st, "A", "a@x.com", "secret").await.unwrap();
        assert_ne!(session.user.password_hash, "secret");
        assert!(session.user.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn signup_requires_all_fields() {
        let st = fake_state();
        for (n, e, p) in [("", "a@x.com", "p"), ("A", " ", "p"), ("A", "a@x.com", "")] {
            let err = signup(&st, n, e, p).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Name, email and password are required."));
        }
    }

    #[tokio::test]
    async fn signup_rejects_malformed_email() {
        let st = fake_state();
        let err = signup(&st, "A", "nope", "p").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_returns_same_user() {
        let st = fake_state();
        let created = signup(&st, "A", "a@x.com", "p").await.unwrap();
        let session = login(&st, "a@x.com", "p").await.unwrap();
        assert_eq!(session.user.id, created.user.id);
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn login_failures() {
        let st = fake_state();
        signup(&st, "A", "a@x.com", "p").await.unwrap();

        let err = login(&st, "a@x.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials(_)));

        let err = login(&st, "ghost@x.com", "p").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "User email not found."));

        let err = login(&st, "", "p").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
