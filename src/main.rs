// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use crate::application::issue_repository::IssueDataSource;
use crate::infrastructure::config::{load_app_config, DataSourceKind, DataSourceSettings};
use crate::infrastructure::fixture_source::{FixtureDataSource, Fixtures};
use crate::infrastructure::http_source::HttpDataSource;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let app_config = load_app_config()?;

    // Data source (infrastructure layer)
    let source = build_data_source(&app_config.data_source)?;

    // Services (application layer) and router (presentation layer)
    let state = Arc::new(AppState::new(source));
    let router = build_router(state);

    let addr: SocketAddr = app_config.server.bind_addr.parse()?;
    tracing::info!("Starting civease-analytics on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

fn build_data_source(settings: &DataSourceSettings) -> anyhow::Result<Arc<dyn IssueDataSource>> {
    match settings.kind {
        DataSourceKind::Fixtures => {
            tracing::warn!("Serving built-in sample fixtures");
            Ok(Arc::new(FixtureDataSource::new(Fixtures::sample())?))
        }
        DataSourceKind::Http => {
            let base_url = settings
                .base_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("data_source.base_url is not set"))?;
            tracing::info!("Using backend API at {}", base_url);
            Ok(Arc::new(HttpDataSource::new(
                base_url,
                settings.token.clone(),
                settings.timeout(),
            )?))
        }
    }
}
