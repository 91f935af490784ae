use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

/// Credentials for the external job-search API. Absent when any of the
/// three values is missing, which turns enrichment off.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchConfig {
    pub search_url: String,
    pub info_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db: DbConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub job_search: Option<JobSearchConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let db = DbConfig {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            acquire_timeout_secs: env_or("DB_ACQUIRE_TIMEOUT_SECS", 5),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "jobboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jobboard-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
        };
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("APP_PORT", 3000),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
        };
        let job_search = match (
            std::env::var("JOB_SEARCH_URL"),
            std::env::var("JOB_INFO_URL"),
            std::env::var("JOB_SEARCH_API_KEY"),
        ) {
            (Ok(search_url), Ok(info_url), Ok(api_key)) => Some(JobSearchConfig {
                search_url,
                info_url,
                api_key,
                timeout_secs: env_or("JOB_SEARCH_TIMEOUT_SECS", 5),
            }),
            _ => None,
        };
        Ok(Self {
            db,
            jwt,
            server,
            job_search,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
