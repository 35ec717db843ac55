//! Generators that shell out to the `dmsa` executable

use std::ffi::OsStr;
use std::path::Path;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::generation::{DdlGenerator, DiagramGenerator};
use crate::domain::DomainError;

/// Program plus the leading arguments selecting a subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub prefix: Vec<String>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>, prefix: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix,
        }
    }

    async fn run<I, S>(&self, generator: &str, args: I) -> Result<Output, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(&self.prefix).args(args).kill_on_drop(true);

        debug!(generator, command = ?command.as_std(), "Running generator");

        let output = command.output().await.map_err(|e| {
            DomainError::generation(
                generator,
                format!("failed to spawn '{}': {}", self.program, e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(generator, status = %output.status, stderr = %stderr, "Generator failed");

            return Err(DomainError::generation(
                generator,
                format!("{}: {}", output.status, stderr),
            ));
        }

        Ok(output)
    }
}

/// DDL generator returning the process's stdout
#[derive(Debug, Clone)]
pub struct ProcessDdlGenerator {
    command: ProcessCommand,
}

impl ProcessDdlGenerator {
    pub fn new(command: ProcessCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl DdlGenerator for ProcessDdlGenerator {
    async fn generate(&self, args: &[String]) -> Result<String, DomainError> {
        let output = self.command.run("ddl", args).await?;

        String::from_utf8(output.stdout)
            .map_err(|e| DomainError::generation("ddl", format!("output is not UTF-8: {}", e)))
    }
}

/// Diagram generator invoked as `{program} {prefix..} model version path`
#[derive(Debug, Clone)]
pub struct ProcessDiagramGenerator {
    command: ProcessCommand,
}

impl ProcessDiagramGenerator {
    pub fn new(command: ProcessCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl DiagramGenerator for ProcessDiagramGenerator {
    async fn generate(&self, model: &str, version: &str, output: &Path) -> Result<(), DomainError> {
        let args = [OsStr::new(model), OsStr::new(version), output.as_os_str()];
        self.command.run("erd", args).await?;
        Ok(())
    }
}
