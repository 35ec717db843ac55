//! DMSA Service
//!
//! Serves generated schema artifacts for a catalog of data models over HTTP:
//! - DDL (create, drop, purge) for a model version and SQL dialect, optionally
//!   limited to tables, constraints or indexes
//! - Entity-relationship diagrams, regenerated on request and served by a
//!   filename that embeds the generator version

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::artifact::ArtifactStore;
use infrastructure::generator::{ProcessDdlGenerator, ProcessDiagramGenerator};
use infrastructure::services::{DdlService, DiagramService};
use tracing::{info, warn};

/// Create the application state from configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    if config.catalog.is_empty() {
        warn!("Catalog has no models; every schema request will return 404");
    }

    if config.artifacts.generator_version.trim().is_empty() {
        anyhow::bail!("artifacts.generator_version must not be empty");
    }

    let catalog = Arc::new(config.catalog.clone());

    let ddl_generator = Arc::new(ProcessDdlGenerator::new(
        config.generator.ddl.to_process_command(),
    ));
    let erd_generator = Arc::new(ProcessDiagramGenerator::new(
        config.generator.erd.to_process_command(),
    ));

    let store = ArtifactStore::new(config.artifacts.storage_dir.clone());
    let dir_status = store.ensure_dir().await?;

    info!(
        storage_dir = %store.root().display(),
        status = ?dir_status,
        generator_version = %config.artifacts.generator_version,
        models = catalog.models.len(),
        dialects = catalog.dialects.len(),
        "Artifact storage ready"
    );

    let ddl_service = Arc::new(DdlService::new(catalog.clone(), ddl_generator));
    let diagram_service = Arc::new(DiagramService::new(
        catalog.clone(),
        erd_generator,
        store,
        config.artifacts.generator_version.clone(),
    ));

    Ok(AppState::new(catalog, ddl_service, diagram_service))
}
