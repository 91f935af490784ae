mod app;
mod applications;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod graphql;
mod job_search;
mod jobs;
mod state;
#[cfg(test)]
mod testing;
mod users;
mod validation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "jobboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;
    let server = app_state.config.server.clone();

    let app = app::build_app(app_state);
    app::serve(app, &server).await
}
