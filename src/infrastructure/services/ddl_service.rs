//! DDL service - validates a generation request against the catalog and
//! hands the translated argument list to the DDL generator

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::generation::{DdlGenerator, GenerationRequest};
use crate::domain::{Catalog, DomainError};
use crate::infrastructure::observability::{record_generation, GenerationMetricParams};

#[derive(Debug)]
pub struct DdlService<G: DdlGenerator + ?Sized> {
    catalog: Arc<Catalog>,
    generator: Arc<G>,
}

impl<G: DdlGenerator + ?Sized> DdlService<G> {
    pub fn new(catalog: Arc<Catalog>, generator: Arc<G>) -> Self {
        Self { catalog, generator }
    }

    /// Generate DDL text. Unknown catalog entries fail before the generator
    /// is invoked; generator failures are returned as-is.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        self.catalog
            .require_model_version(&request.model, &request.version)?;
        self.catalog.require_dialect(&request.dialect)?;

        let args = request.to_args();
        debug!(args = ?args, "Translated DDL request");

        let start = Instant::now();
        let result = self.generator.generate(&args).await;

        record_generation(GenerationMetricParams {
            kind: "ddl",
            model: &request.model,
            duration: start.elapsed(),
            success: result.is_ok(),
        });

        let ddl = result?;

        info!(
            model = %request.model,
            version = %request.version,
            dialect = %request.dialect,
            scope = %request.scope,
            drop = request.drop,
            purge = request.purge,
            bytes = ddl.len(),
            "Generated DDL"
        );

        Ok(ddl)
    }
}
