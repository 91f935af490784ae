//! Job catalog.
//!
//! Jobs carry no owner: any caller may create, update or delete them. Users
//! and applications, by contrast, are only mutable by their owner.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::{
    dto::{JobDraft, JobPatch},
    filter::JobFilter,
    repo::{Job, JobChanges, NewJob},
};
use crate::{
    error::{AppError, AppResult},
    job_search::JobSearchClient,
    state::AppState,
    validation::present,
};

pub async fn create(st: &AppState, draft: JobDraft) -> AppResult<Job> {
    let required = |v: &Option<String>| present(v.as_deref()).map(str::to_string);
    let (Some(title), Some(url), Some(description), Some(company), Some(company_url), Some(location)) = (
        required(&draft.title),
        required(&draft.url),
        required(&draft.description),
        required(&draft.company),
        required(&draft.company_url),
        required(&draft.location),
    ) else {
        return Err(AppError::validation(
            "Title, URL, description, company, companyURL and location are required.",
        ));
    };

    let job = st
        .jobs
        .create(&NewJob {
            title,
            url,
            description,
            company,
            company_url,
            location,
            posted_at: OffsetDateTime::now_utc(),
        })
        .await?;
    info!(job_id = job.id, "job created");
    Ok(job)
}

/// Lists jobs matching `filter`. A filtered search with no local hits
/// pulls fresh listings from the external search API first, when one is
/// configured.
pub async fn list(st: &AppState, filter: &JobFilter) -> AppResult<Vec<Job>> {
    let jobs = st.jobs.list(filter).await?;
    if !jobs.is_empty() || filter.is_empty() {
        return Ok(jobs);
    }
    let Some(search) = st.job_search.as_deref() else {
        return Ok(jobs);
    };

    match ingest(st, search, filter).await {
        Ok(0) => Ok(jobs),
        Ok(saved) => {
            info!(saved, keyword = ?filter.keyword(), location = ?filter.location(), "ingested external jobs");
            Ok(st.jobs.list(filter).await?)
        }
        Err(e) => {
            warn!(error = %e, "job search enrichment failed");
            Ok(jobs)
        }
    }
}

/// Saves listings whose url is not yet known. Returns how many were new.
async fn ingest(st: &AppState, search: &dyn JobSearchClient, filter: &JobFilter) -> anyhow::Result<usize> {
    let listings = search.search(filter.keyword()).await?;
    let mut saved = 0;
    for listing in listings {
        if listing.url.trim().is_empty() || st.jobs.find_by_url(&listing.url).await?.is_some() {
            continue;
        }
        let posted_at = listing.posted_at().unwrap_or_else(OffsetDateTime::now_utc);
        st.jobs
            .create(&NewJob {
                title: listing.title,
                url: listing.url,
                description: String::new(),
                company: listing.company_name,
                company_url: listing.company_url,
                location: listing.location,
                posted_at,
            })
            .await?;
        saved += 1;
    }
    Ok(saved)
}

pub async fn find(st: &AppState, id: i32) -> AppResult<Option<Job>> {
    let Some(job) = st.jobs.find_by_id(id).await? else {
        return Ok(None);
    };
    Ok(Some(backfill_description(st, job).await))
}

pub async fn get(st: &AppState, id: i32) -> AppResult<Job> {
    find(st, id)
        .await?
        .ok_or_else(|| AppError::not_found("Job not found."))
}

/// Best effort: any failure leaves the job as it was.
async fn backfill_description(st: &AppState, job: Job) -> Job {
    if !job.description.trim().is_empty() {
        return job;
    }
    let Some(search) = st.job_search.as_deref() else {
        return job;
    };

    let description = match search.job_description(&job.url).await {
        Ok(Some(d)) => d,
        Ok(None) => return job,
        Err(e) => {
            warn!(error = %e, job_id = job.id, "job description fetch failed");
            return job;
        }
    };
    let changes = JobChanges {
        description: Some(description),
        ..Default::default()
    };
    match st.jobs.update(job.id, &changes).await {
        Ok(Some(updated)) => {
            debug!(job_id = updated.id, "job description backfilled");
            updated
        }
        Ok(None) => job,
        Err(e) => {
            warn!(error = %e, job_id = job.id, "job description save failed");
            job
        }
    }
}

pub async fn update(st: &AppState, id: i32, patch: JobPatch) -> AppResult<Job> {
    let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let changes = JobChanges {
        title: keep(patch.title),
        url: keep(patch.url),
        description: keep(patch.description),
        company: keep(patch.company),
        company_url: keep(patch.company_url),
        location: keep(patch.location),
        posted_at: patch.posted_at,
    };
    if changes.is_empty() {
        return Err(AppError::validation("No update data provided."));
    }

    let job = st
        .jobs
        .update(id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Job not found."))?;
    info!(job_id = id, "job updated");
    Ok(job)
}

pub async fn delete(st: &AppState, id: i32) -> AppResult<()> {
    if !st.jobs.delete(id).await? {
        return Err(AppError::not_found("Job not found."));
    }
    info!(job_id = id, "job deleted");
    Ok(())
}
