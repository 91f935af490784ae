//! Shape checks applied before any store access.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

/// Which resource an identifier names; drives the error message.
#[derive(Debug, Clone, Copy)]
pub enum IdKind {
    User,
    Job,
    Application,
}

impl IdKind {
    fn label(self) -> &'static str {
        match self {
            IdKind::User => "user",
            IdKind::Job => "job",
            IdKind::Application => "application",
        }
    }
}

/// Parses a wire identifier (path segment or GraphQL `ID`) into a row id.
pub fn parse_id(raw: &str, kind: IdKind) -> AppResult<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::validation(format!("Invalid {} ID format.", kind.label())))
}

/// Returns the trimmed value when it holds at least one non-space character.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Optional filter values must not be blank once supplied.
pub fn optional_non_blank(value: Option<String>, message: &str) -> AppResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(AppError::validation(message)),
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn require_valid_email(email: &str) -> AppResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::validation("Invalid email format."))
    }
}
