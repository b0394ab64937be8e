use crate::{
    backend::KeyValueStore, configuration::Configuration,
    configuration_handler::ConfigurationHandler, file_storage::FileKeyValueStore,
    http::create_app, memory_storage::MemoryKeyValueStore, service::InterviewService,
    store::InterviewStore,
};
use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod configuration;
mod configuration_handler;
mod error;
mod file_storage;
mod http;
mod memory_storage;
mod persistence;
mod scheduling;
mod service;
mod store;
#[cfg(test)]
mod testutils;
mod types;
mod validation;

#[tokio::main]
async fn main() -> Result<()> {
    let configuration = ConfigurationHandler::parse_arguments();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let address = format!("{}:{}", configuration.host(), configuration.port());
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Interview scheduler listening");

    let app = if let Some(data_dir) = configuration.data_dir() {
        let storage = FileKeyValueStore::new(&data_dir)
            .with_context(|| format!("Failed to prepare data directory {}", data_dir.display()))?;
        info!(directory = %storage.directory().display(), "Persisting interviews to disk");
        create_app(build_service(storage, &configuration))
    } else {
        warn!("Running ephemeral, interviews are lost on restart");
        create_app(build_service(MemoryKeyValueStore::default(), &configuration))
    };

    axum::serve(listener, app).await.context("Server stopped")?;
    Ok(())
}

fn build_service<S: KeyValueStore>(
    storage: S,
    configuration: &impl Configuration,
) -> InterviewService<S> {
    InterviewService::new(InterviewStore::open(storage, configuration.storage_key()))
}
