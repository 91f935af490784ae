use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use crate::config::JobSearchConfig;

/// Listing as returned by the external search API.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalJob {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub list_date: Option<String>,
}

impl ExternalJob {
    /// `list_date` as RFC 3339 or a bare `YYYY-MM-DD`.
    pub fn posted_at(&self) -> Option<OffsetDateTime> {
        let raw = self.list_date.as_deref()?.trim();
        if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Some(ts);
        }
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(|d| d.midnight().assume_utc())
    }
}

#[async_trait]
pub trait JobSearchClient: Send + Sync {
    async fn search(&self, keyword: Option<&str>) -> anyhow::Result<Vec<ExternalJob>>;
    async fn job_description(&self, url: &str) -> anyhow::Result<Option<String>>;
}

#[derive(Deserialize)]
struct JobInfo {
    job_description: Option<String>,
}

/// HTTP client for the search API. Single attempt per call, bounded by a short timeout.
#[derive(Clone)]
pub struct HttpJobSearch {
    client: reqwest::Client,
    search_url: String,
    info_url: String,
    api_key: String,
}

impl HttpJobSearch {
    pub fn new(cfg: &JobSearchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build job search http client")?;
        Ok(Self {
            client,
            search_url: cfg.search_url.clone(),
            info_url: cfg.info_url.clone(),
            api_key: cfg.api_key.clone(),
        })
    }
}

#[async_trait]
impl JobSearchClient for HttpJobSearch {
    async fn search(&self, keyword: Option<&str>) -> anyhow::Result<Vec<ExternalJob>> {
        let mut req = self
            .client
            .get(&self.search_url)
            .header("x-api-key", &self.api_key);
        if let Some(keyword) = keyword {
            req = req.query(&[("keyword", keyword)]);
        }
        let jobs = req
            .send()
            .await
            .context("job search request")?
            .error_for_status()
            .context("job search status")?
            .json::<Vec<ExternalJob>>()
            .await
            .context("job search body")?;
        Ok(jobs)
    }

    async fn job_description(&self, url: &str) -> anyhow::Result<Option<String>> {
        let info = self
            .client
            .get(&self.info_url)
            .header("x-api-key", &self.api_key)
            .query(&[("query", url)])
            .send()
            .await
            .context("job info request")?
            .error_for_status()
            .context("job info status")?
            .json::<JobInfo>()
            .await
            .context("job info body")?;
        Ok(info.job_description.filter(|d| !d.trim().is_empty()))
    }
}
