//! Catalog listing response

use serde::Serialize;

use crate::domain::{Catalog, DialectSpec, ModelSpec};

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub models: Vec<ModelSpec>,
    pub dialects: Vec<DialectSpec>,
    pub generator_version: String,
}

impl CatalogResponse {
    pub fn from_domain(catalog: &Catalog, generator_version: &str) -> Self {
        Self {
            models: catalog.models.clone(),
            dialects: catalog.dialects.clone(),
            generator_version: generator_version.to_string(),
        }
    }
}
