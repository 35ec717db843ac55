//! Diagram service - write-through artifact cache for entity-relationship
//! diagrams

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::domain::artifact::DiagramKey;
use crate::domain::generation::DiagramGenerator;
use crate::domain::{Catalog, DomainError};
use crate::infrastructure::artifact::{ArtifactStore, KeyLocks};
use crate::infrastructure::observability::{record_generation, GenerationMetricParams};

#[derive(Debug)]
pub struct DiagramService<G: DiagramGenerator + ?Sized> {
    catalog: Arc<Catalog>,
    generator: Arc<G>,
    store: ArtifactStore,
    generator_version: String,
    locks: KeyLocks,
}

impl<G: DiagramGenerator + ?Sized> DiagramService<G> {
    pub fn new(
        catalog: Arc<Catalog>,
        generator: Arc<G>,
        store: ArtifactStore,
        generator_version: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            generator,
            store,
            generator_version: generator_version.into(),
            locks: KeyLocks::new(),
        }
    }

    pub fn generator_version(&self) -> &str {
        &self.generator_version
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Regenerate the diagram and return the URL it can be fetched from.
    ///
    /// Every call rewrites the artifact. The diagram is rendered into a
    /// staging file and renamed over the artifact, so concurrent fetches see
    /// the previous or the new file. Calls for the same filename are
    /// serialized.
    pub async fn resolve(
        &self,
        model: &str,
        version: &str,
        format: Option<&str>,
    ) -> Result<String, DomainError> {
        self.catalog.require_model_version(model, version)?;

        let key = DiagramKey::new(model, version, format, self.generator_version.as_str())?;
        let filename = key.filename();
        let path = self.store.path_for(&filename)?;

        let dir_status = self.store.ensure_dir().await?;
        debug!(root = %self.store.root().display(), status = ?dir_status, "Artifact directory ready");

        let _guard = self.locks.acquire(&filename).await;

        let staging = self.store.staging_path_for(&filename)?;
        let start = Instant::now();
        let result = self.generator.generate(model, version, &staging).await;

        record_generation(GenerationMetricParams {
            kind: "erd",
            model,
            duration: start.elapsed(),
            success: result.is_ok(),
        });

        if let Err(e) = result {
            self.store.discard(&staging).await;
            return Err(e);
        }

        if let Err(e) = self.store.publish(&staging, &path).await {
            self.store.discard(&staging).await;
            return Err(e);
        }

        info!(
            model,
            version,
            format = key.format(),
            path = %path.display(),
            "Generated diagram"
        );

        Ok(key.url())
    }

    /// Path of a previously generated artifact. Never generates.
    pub async fn open(&self, filename: &str) -> Result<PathBuf, DomainError> {
        self.store.existing(filename).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tempfile::TempDir;

    use crate::domain::generation::mock::MockDiagramGenerator;

    fn create_service(
        generator: MockDiagramGenerator,
        generator_version: &str,
    ) -> (DiagramService<MockDiagramGenerator>, Arc<MockDiagramGenerator>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(generator);
        let service = DiagramService::new(
            Arc::new(Catalog::default()),
            generator.clone(),
            ArtifactStore::new(dir.path().join("erd")),
            generator_version,
        );
        (service, generator, dir)
    }

    fn erd_entries(dir: &TempDir) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir.path().join("erd")) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_resolve_writes_artifact_and_returns_url() {
        let (service, generator, dir) = create_service(MockDiagramGenerator::new(), "0.4");

        let url = service.resolve("pedsnet", "v2", Some("svg")).await.unwrap();

        assert_eq!(url, "/pedsnet/v2/erd/pedsnet_v2_dmsa_0.4.svg");
        let expected = dir.path().join("erd").join("pedsnet_v2_dmsa_0.4.svg");
        assert_eq!(
            std::fs::read_to_string(&expected).unwrap(),
            "diagram pedsnet v2"
        );

        // rendered next to the artifact under a hidden name with the same extension
        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].parent(), expected.parent());
        assert_eq!(calls[0].extension().unwrap(), "svg");
        assert_ne!(calls[0], expected);
        assert_eq!(erd_entries(&dir), vec!["pedsnet_v2_dmsa_0.4.svg"]);
    }

    #[tokio::test]
    async fn test_resolve_twice_regenerates_same_filename() {
        let (service, generator, _dir) = create_service(MockDiagramGenerator::new(), "0.4");

        let first = service.resolve("omop", "v5", None).await.unwrap();
        let second = service.resolve("omop", "v5", None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "/omop/v5/erd/omop_v5_dmsa_0.4.png");
        assert_eq!(generator.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_generator_version_changes_url() {
        let (old, _, _dir_old) = create_service(MockDiagramGenerator::new(), "0.4");
        let (new, _, _dir_new) = create_service(MockDiagramGenerator::new(), "0.5");

        let old_url = old.resolve("pcornet", "v3", Some("png")).await.unwrap();
        let new_url = new.resolve("pcornet", "v3", Some("png")).await.unwrap();

        assert_ne!(old_url, new_url);
    }

    #[tokio::test]
    async fn test_resolve_unknown_model() {
        let (service, generator, _dir) = create_service(MockDiagramGenerator::new(), "0.4");

        let err = service.resolve("pedsnet", "v7", None).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_generation_failure_leaves_no_file() {
        let (service, _, dir) =
            create_service(MockDiagramGenerator::new().with_error("renderer crashed"), "0.4");

        let err = service.resolve("pedsnet", "v2", None).await.unwrap_err();

        assert!(matches!(err, DomainError::Generation { .. }));
        assert!(erd_entries(&dir).is_empty());
        assert!(service.open("pedsnet_v2_dmsa_0.4.png").await.is_err());
    }

    #[tokio::test]
    async fn test_failed_regeneration_keeps_previous_artifact() {
        let (service, _, dir) = create_service(MockDiagramGenerator::new(), "0.4");
        service.resolve("omop", "v5", None).await.unwrap();

        let failing = DiagramService::new(
            Arc::new(Catalog::default()),
            Arc::new(MockDiagramGenerator::new().with_error("renderer crashed")),
            service.store().clone(),
            "0.4",
        );
        assert!(failing.resolve("omop", "v5", None).await.is_err());

        let path = service.open("omop_v5_dmsa_0.4.png").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "diagram omop v5");
        assert_eq!(erd_entries(&dir), vec!["omop_v5_dmsa_0.4.png"]);
    }

    #[tokio::test]
    async fn test_open_never_generated() {
        let (service, generator, _dir) = create_service(MockDiagramGenerator::new(), "0.4");

        let err = service.open("pedsnet_v2_dmsa_0.4.png").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_open_after_resolve() {
        let (service, generator, _dir) = create_service(MockDiagramGenerator::new(), "0.4");
        service.resolve("i2b2", "v1.7", Some("pdf")).await.unwrap();

        let path = service.open("i2b2_v1.7_dmsa_0.4.pdf").await.unwrap();

        assert!(path.is_file());
        assert_eq!(generator.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_same_key_resolves_are_serialized() {
        let (service, generator, _dir) = create_service(
            MockDiagramGenerator::new().with_delay(Duration::from_millis(20)),
            "0.4",
        );

        let (a, b) = tokio::join!(
            service.resolve("pedsnet", "v2", Some("png")),
            service.resolve("pedsnet", "v2", Some("png"))
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(generator.calls().len(), 2);
        assert_eq!(generator.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_different_key_resolves_run_in_parallel() {
        let (service, generator, _dir) = create_service(
            MockDiagramGenerator::new().with_delay(Duration::from_millis(20)),
            "0.4",
        );

        let (a, b) = tokio::join!(
            service.resolve("pedsnet", "v2", Some("png")),
            service.resolve("pedsnet", "v2", Some("svg"))
        );

        assert_ne!(a.unwrap(), b.unwrap());
        assert_eq!(generator.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_artifact_never_visible_half_written() {
        let (service, _, dir) = create_service(
            MockDiagramGenerator::new().with_delay(Duration::from_millis(50)),
            "0.4",
        );
        let filename = "pedsnet_v2_dmsa_0.4.png";

        let watch = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            // the renderer has written its partial output by now
            assert_eq!(erd_entries(&dir).len(), 1);
            service.open(filename).await
        };
        let (resolved, mid_render) = tokio::join!(service.resolve("pedsnet", "v2", None), watch);

        resolved.unwrap();
        assert!(matches!(mid_render, Err(DomainError::NotFound { .. })));
        let path = service.open(filename).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "diagram pedsnet v2");
    }
}
