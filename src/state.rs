use std::sync::Arc;

use crate::applications::repo::{ApplicationRepo, PgApplicationRepo};
use crate::config::AppConfig;
use crate::db;
use crate::graphql::schema::{create_schema, Schema};
use crate::job_search::{HttpJobSearch, JobSearchClient};
use crate::jobs::repo::{JobRepo, PgJobRepo};
use crate::users::repo::{PgUserRepo, UserRepo};

/// Everything a request needs, built once at startup and injected.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub jobs: Arc<dyn JobRepo>,
    pub applications: Arc<dyn ApplicationRepo>,
    pub job_search: Option<Arc<dyn JobSearchClient>>,
    pub schema: Arc<Schema>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config.db).await?;
        db::migrate(&pool).await?;

        let job_search = match &config.job_search {
            Some(cfg) => Some(Arc::new(HttpJobSearch::new(cfg)?) as Arc<dyn JobSearchClient>),
            None => {
                tracing::info!("job search credentials not set; enrichment disabled");
                None
            }
        };

        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepo::new(pool.clone())),
            Arc::new(PgJobRepo::new(pool.clone())),
            Arc::new(PgApplicationRepo::new(pool)),
            job_search,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        jobs: Arc<dyn JobRepo>,
        applications: Arc<dyn ApplicationRepo>,
        job_search: Option<Arc<dyn JobSearchClient>>,
    ) -> Self {
        Self {
            config,
            users,
            jobs,
            applications,
            job_search,
            schema: Arc::new(create_schema()),
        }
    }
}
