//! Typed job search predicates.
//!
//! Only two predicates exist: a keyword matched case-insensitively against
//! title, description or company (any of them), and a location matched
//! case-insensitively against the location column. Both are optional and
//! combined with AND.

use sqlx::{Postgres, QueryBuilder};

use super::repo::Job;
use crate::{error::AppResult, validation::optional_non_blank};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    keyword: Option<String>,
    location: Option<String>,
}

impl JobFilter {
    /// Supplied values must be non-blank; they are stored trimmed.
    pub fn new(keyword: Option<String>, location: Option<String>) -> AppResult<Self> {
        Ok(Self {
            keyword: optional_non_blank(keyword, "Keyword is required.")?,
            location: optional_non_blank(location, "Location is required.")?,
        })
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.location.is_none()
    }

    /// Appends the WHERE clause (if any) to a query selecting from `jobs`.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut sep = " WHERE ";

        if let Some(keyword) = &self.keyword {
            let pattern = like_pattern(keyword);
            qb.push(sep);
            sep = " AND ";
            qb.push("(title ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR description ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR company ILIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        if let Some(location) = &self.location {
            qb.push(sep);
            qb.push("location ILIKE ")
                .push_bind(like_pattern(location))
                .push(" ESCAPE '\\'");
        }
    }

    /// Same predicate evaluated in memory.
    #[cfg(test)]
    pub fn matches(&self, job: &Job) -> bool {
        let keyword_ok = self.keyword.as_deref().map_or(true, |k| {
            contains_ci(&job.title, k) || contains_ci(&job.description, k) || contains_ci(&job.company, k)
        });
        let location_ok = self
            .location
            .as_deref()
            .map_or(true, |l| contains_ci(&job.location, l));
        keyword_ok && location_ok
    }
}

#[cfg(test)]
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// `%needle%` with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
