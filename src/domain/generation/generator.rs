use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Produces DDL text from a generator argument list
#[async_trait]
pub trait DdlGenerator: Send + Sync + Debug {
    async fn generate(&self, args: &[String]) -> Result<String, DomainError>;
}

/// Renders an entity-relationship diagram to a file
#[async_trait]
pub trait DiagramGenerator: Send + Sync + Debug {
    /// Write the diagram for `model`/`version` to `output`. The image format
    /// follows the extension of `output`.
    async fn generate(&self, model: &str, version: &str, output: &Path) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Records every argument list and answers with a fixed response
    #[derive(Debug, Default)]
    pub struct MockDdlGenerator {
        calls: Mutex<Vec<Vec<String>>>,
        error: Option<String>,
    }

    impl MockDdlGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DdlGenerator for MockDdlGenerator {
        async fn generate(&self, args: &[String]) -> Result<String, DomainError> {
            self.calls.lock().unwrap().push(args.to_vec());

            if let Some(ref error) = self.error {
                return Err(DomainError::generation("mock-ddl", error));
            }

            Ok(format!("-- ddl {}\n", args.join(" ")))
        }
    }

    /// Writes a small placeholder file in two steps and records each output
    /// path. Tracks how many renders overlap.
    #[derive(Debug, Default)]
    pub struct MockDiagramGenerator {
        calls: Mutex<Vec<PathBuf>>,
        error: Option<String>,
        delay: Option<Duration>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockDiagramGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail after the partial write
        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Pause between the partial and the complete write
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }

        /// Highest number of renders that were running at the same time
        pub fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }

        async fn render(&self, model: &str, version: &str, output: &Path) -> Result<(), DomainError> {
            tokio::fs::write(output, "partial")
                .await
                .map_err(|e| DomainError::storage(e.to_string()))?;

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(ref error) = self.error {
                return Err(DomainError::generation("mock-erd", error));
            }

            tokio::fs::write(output, format!("diagram {} {}", model, version))
                .await
                .map_err(|e| DomainError::storage(e.to_string()))
        }
    }

    #[async_trait]
    impl DiagramGenerator for MockDiagramGenerator {
        async fn generate(
            &self,
            model: &str,
            version: &str,
            output: &Path,
        ) -> Result<(), DomainError> {
            self.calls.lock().unwrap().push(output.to_path_buf());

            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);

            let result = self.render(model, version, output).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }
}
