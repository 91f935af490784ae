use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo::Job;

/// Submitted job. Fields are optional so that missing ones surface as a 400.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct JobDraft {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "companyURL")]
    pub company_url: Option<String>,
    pub location: Option<String>,
}

/// Partial job update. Unknown keys are ignored; blank strings count as absent.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "companyURL")]
    pub company_url: Option<String>,
    pub location: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub posted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    pub keyword: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedJobResponse {
    pub message: &'static str,
    pub job: Job,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedJobResponse {
    pub message: &'static str,
    pub updated_job: Job,
}
