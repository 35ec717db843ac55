//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::generation::{DdlGenerator, DiagramGenerator, GenerationRequest};
use crate::domain::{Catalog, DomainError};
use crate::infrastructure::artifact::DirStatus;
use crate::infrastructure::services::{DdlService, DiagramService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub ddl_service: Arc<dyn DdlServiceTrait>,
    pub diagram_service: Arc<dyn DiagramServiceTrait>,
}

/// Trait for DDL generation
#[async_trait::async_trait]
pub trait DdlServiceTrait: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError>;
}

/// Trait for diagram artifact operations
#[async_trait::async_trait]
pub trait DiagramServiceTrait: Send + Sync {
    /// Regenerate and return the retrieval URL
    async fn resolve(
        &self,
        model: &str,
        version: &str,
        format: Option<&str>,
    ) -> Result<String, DomainError>;
    /// Path of an existing artifact
    async fn open(&self, filename: &str) -> Result<PathBuf, DomainError>;
    /// Make sure artifacts can be written
    async fn ensure_storage(&self) -> Result<DirStatus, DomainError>;
    fn generator_version(&self) -> &str;
}

#[async_trait::async_trait]
impl<G: DdlGenerator + ?Sized + 'static> DdlServiceTrait for DdlService<G> {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        DdlService::generate(self, request).await
    }
}

#[async_trait::async_trait]
impl<G: DiagramGenerator + ?Sized + 'static> DiagramServiceTrait for DiagramService<G> {
    async fn resolve(
        &self,
        model: &str,
        version: &str,
        format: Option<&str>,
    ) -> Result<String, DomainError> {
        DiagramService::resolve(self, model, version, format).await
    }

    async fn open(&self, filename: &str) -> Result<PathBuf, DomainError> {
        DiagramService::open(self, filename).await
    }

    async fn ensure_storage(&self) -> Result<DirStatus, DomainError> {
        self.store().ensure_dir().await
    }

    fn generator_version(&self) -> &str {
        DiagramService::generator_version(self)
    }
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        ddl_service: Arc<dyn DdlServiceTrait>,
        diagram_service: Arc<dyn DiagramServiceTrait>,
    ) -> Self {
        Self {
            catalog,
            ddl_service,
            diagram_service,
        }
    }
}
