use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use super::filter::JobFilter;
use crate::db::StoreResult;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub description: String,
    pub company: String,
    #[serde(rename = "companyURL")]
    pub company_url: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub posted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub url: String,
    pub description: String,
    pub company: String,
    pub company_url: String,
    pub location: String,
    pub posted_at: OffsetDateTime,
}

/// Column values to overwrite; `None` keeps the stored value.
#[derive(Debug, Default, Clone)]
pub struct JobChanges {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub location: Option<String>,
    pub posted_at: Option<OffsetDateTime>,
}

impl JobChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.company.is_none()
            && self.company_url.is_none()
            && self.location.is_none()
            && self.posted_at.is_none()
    }
}

#[async_trait]
pub trait JobRepo: Send + Sync {
    async fn list(&self, filter: &JobFilter) -> StoreResult<Vec<Job>>;
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Job>>;
    async fn find_by_url(&self, url: &str) -> StoreResult<Option<Job>>;
    async fn create(&self, job: &NewJob) -> StoreResult<Job>;
    async fn update(&self, id: i32, changes: &JobChanges) -> StoreResult<Option<Job>>;
    async fn delete(&self, id: i32) -> StoreResult<bool>;
}

const JOB_COLUMNS: &str =
    "id, title, url, description, company, company_url, location, posted_at, created_at";

pub struct PgJobRepo {
    db: PgPool,
}

impl PgJobRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepo for PgJobRepo {
    async fn list(&self, filter: &JobFilter) -> StoreResult<Vec<Job>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(JOB_COLUMNS).push(" FROM jobs");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY posted_at DESC, id DESC");
        let jobs = qb.build_query_as::<Job>().fetch_all(&self.db).await?;
        Ok(jobs)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(job)
    }

    async fn find_by_url(&self, url: &str) -> StoreResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE url = $1 ORDER BY id LIMIT 1"
        ))
        .bind(url)
        .fetch_optional(&self.db)
        .await?;
        Ok(job)
    }

    async fn create(&self, job: &NewJob) -> StoreResult<Job> {
        let created = sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs (title, url, description, company, company_url, location, posted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&job.title)
        .bind(&job.url)
        .bind(&job.description)
        .bind(&job.company)
        .bind(&job.company_url)
        .bind(&job.location)
        .bind(job.posted_at)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &JobChanges) -> StoreResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
               SET title       = COALESCE($2, title),
                   url         = COALESCE($3, url),
                   description = COALESCE($4, description),
                   company     = COALESCE($5, company),
                   company_url = COALESCE($6, company_url),
                   location    = COALESCE($7, location),
                   posted_at   = COALESCE($8, posted_at)
             WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.url.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.company.as_deref())
        .bind(changes.company_url.as_deref())
        .bind(changes.location.as_deref())
        .bind(changes.posted_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(job)
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query(r#"DELETE FROM jobs WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
