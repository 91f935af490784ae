use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::{db::StoreResult, jobs::repo::Job, users::dto::PublicUser};

/// Foreign key constraint names, as declared in the migrations.
pub const USER_FK: &str = "applications_user_id_fkey";
pub const JOB_FK: &str = "applications_job_id_fkey";

/// Bare application row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: i32,
    pub user_id: i32,
    pub job_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
}

/// Application joined with the applicant (no password) and the full job row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDetails {
    pub id: i32,
    pub user_id: i32,
    pub job_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub applied_at: OffsetDateTime,
    pub user: PublicUser,
    pub job: Job,
}

/// Which applications a details query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    ById(i32),
    ByUser(i32),
    ByJob(i32),
}

#[async_trait]
pub trait ApplicationRepo: Send + Sync {
    /// Fails with a uniqueness violation when the (user, job) pair exists.
    async fn create(&self, user_id: i32, job_id: i32) -> StoreResult<ApplicationRecord>;
    async fn find_by_pair(&self, user_id: i32, job_id: i32) -> StoreResult<Option<ApplicationRecord>>;
    /// Matches only when the application exists and belongs to `user_id`.
    async fn find_owned(&self, id: i32, user_id: i32) -> StoreResult<Option<ApplicationRecord>>;
    async fn records(&self, user_id: Option<i32>) -> StoreResult<Vec<ApplicationRecord>>;
    async fn details(&self, scope: ApplicationScope) -> StoreResult<Vec<ApplicationDetails>>;
    async fn delete(&self, id: i32) -> StoreResult<bool>;
}

#[derive(FromRow)]
struct DetailsRow {
    id: i32,
    user_id: i32,
    job_id: i32,
    applied_at: OffsetDateTime,
    user_name: String,
    user_email: String,
    user_created_at: OffsetDateTime,
    title: String,
    url: String,
    description: String,
    company: String,
    company_url: String,
    location: String,
    posted_at: OffsetDateTime,
    job_created_at: OffsetDateTime,
}

impl From<DetailsRow> for ApplicationDetails {
    fn from(r: DetailsRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            job_id: r.job_id,
            applied_at: r.applied_at,
            user: PublicUser {
                id: r.user_id,
                name: r.user_name,
                email: r.user_email,
                created_at: r.user_created_at,
            },
            job: Job {
                id: r.job_id,
                title: r.title,
                url: r.url,
                description: r.description,
                company: r.company,
                company_url: r.company_url,
                location: r.location,
                posted_at: r.posted_at,
                created_at: r.job_created_at,
            },
        }
    }
}

pub struct PgApplicationRepo {
    db: PgPool,
}

impl PgApplicationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ApplicationRepo for PgApplicationRepo {
    async fn create(&self, user_id: i32, job_id: i32) -> StoreResult<ApplicationRecord> {
        let record = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            INSERT INTO applications (user_id, job_id)
            VALUES ($1, $2)
            RETURNING id, user_id, job_id, applied_at
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }

    async fn find_by_pair(&self, user_id: i32, job_id: i32) -> StoreResult<Option<ApplicationRecord>> {
        let record = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT id, user_id, job_id, applied_at
              FROM applications
             WHERE user_id = $1 AND job_id = $2
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }

    async fn find_owned(&self, id: i32, user_id: i32) -> StoreResult<Option<ApplicationRecord>> {
        let record = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT id, user_id, job_id, applied_at
              FROM applications
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(record)
    }

    async fn records(&self, user_id: Option<i32>) -> StoreResult<Vec<ApplicationRecord>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(
            r#"
            SELECT id, user_id, job_id, applied_at
              FROM applications
             WHERE $1::INTEGER IS NULL OR user_id = $1
             ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    async fn details(&self, scope: ApplicationScope) -> StoreResult<Vec<ApplicationDetails>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT a.id, a.user_id, a.job_id, a.applied_at,
                   u.name AS user_name, u.email AS user_email, u.created_at AS user_created_at,
                   j.title, j.url, j.description, j.company, j.company_url, j.location,
                   j.posted_at, j.created_at AS job_created_at
              FROM applications a
              JOIN users u ON u.id = a.user_id
              JOIN jobs j ON j.id = a.job_id
            "#,
        );
        match scope {
            ApplicationScope::All => {}
            ApplicationScope::ById(id) => {
                qb.push(" WHERE a.id = ").push_bind(id);
            }
            ApplicationScope::ByUser(user_id) => {
                qb.push(" WHERE a.user_id = ").push_bind(user_id);
            }
            ApplicationScope::ByJob(job_id) => {
                qb.push(" WHERE a.job_id = ").push_bind(job_id);
            }
        }
        qb.push(" ORDER BY a.id");
        let rows = qb.build_query_as::<DetailsRow>().fetch_all(&self.db).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query(r#"DELETE FROM applications WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
