//! Catalog entities and lookups

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A data model and the versions of it that can be generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human readable name, e.g. "PEDSnet"
    pub pretty: String,
    /// Identifier used in URLs and generator arguments, e.g. "pedsnet"
    pub name: String,
    /// Available versions, newest first
    pub versions: Vec<String>,
}

impl ModelSpec {
    pub fn new(
        pretty: impl Into<String>,
        name: impl Into<String>,
        versions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            pretty: pretty.into(),
            name: name.into(),
            versions: versions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_version(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }
}

/// A target SQL dialect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectSpec {
    pub pretty: String,
    pub name: String,
}

impl DialectSpec {
    pub fn new(pretty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pretty: pretty.into(),
            name: name.into(),
        }
    }
}

/// Immutable catalog injected at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub models: Vec<ModelSpec>,
    #[serde(default)]
    pub dialects: Vec<DialectSpec>,
}

impl Catalog {
    pub fn new(models: Vec<ModelSpec>, dialects: Vec<DialectSpec>) -> Self {
        Self { models, dialects }
    }

    pub fn model(&self, name: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn dialect(&self, name: &str) -> Option<&DialectSpec> {
        self.dialects.iter().find(|d| d.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Check that a model exists in the given version
    pub fn require_model_version(&self, model: &str, version: &str) -> Result<&ModelSpec, DomainError> {
        let spec = self
            .model(model)
            .ok_or_else(|| DomainError::not_found(format!("Model '{}' not found", model)))?;

        if !spec.has_version(version) {
            return Err(DomainError::not_found(format!(
                "Model '{}' has no version '{}'",
                model, version
            )));
        }

        Ok(spec)
    }

    pub fn require_dialect(&self, dialect: &str) -> Result<&DialectSpec, DomainError> {
        self.dialect(dialect)
            .ok_or_else(|| DomainError::not_found(format!("Dialect '{}' not found", dialect)))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            models: vec![
                ModelSpec::new("PEDSnet", "pedsnet", ["v2", "v1"]),
                ModelSpec::new("i2b2 PEDSnet", "i2b2_pedsnet", ["v2"]),
                ModelSpec::new("PCORnet", "pcornet", ["v3", "v2", "v1"]),
                ModelSpec::new("OMOP", "omop", ["v5", "v4"]),
                ModelSpec::new("i2b2", "i2b2", ["v1.7"]),
            ],
            dialects: vec![
                DialectSpec::new("PostgreSQL", "postgresql"),
                DialectSpec::new("Oracle", "oracle"),
                DialectSpec::new("MS SQL Server", "mssql"),
                DialectSpec::new("MySQL", "mysql"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookups() {
        let catalog = Catalog::default();

        assert!(catalog.model("pedsnet").is_some());
        assert!(catalog.model("unknown").is_none());
        assert!(catalog.dialect("postgresql").is_some());
        assert!(catalog.dialect("sqlite").is_none());
    }

    #[test]
    fn test_require_model_version() {
        let catalog = Catalog::default();

        let spec = catalog.require_model_version("i2b2", "v1.7").unwrap();
        assert_eq!(spec.pretty, "i2b2");

        let err = catalog.require_model_version("omop", "v9").unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = catalog.require_model_version("nope", "v1").unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn test_require_dialect() {
        let catalog = Catalog::default();

        assert_eq!(catalog.require_dialect("mssql").unwrap().pretty, "MS SQL Server");
        assert!(catalog.require_dialect("db2").is_err());
    }

    #[test]
    fn test_catalog_deserializes_with_missing_sections() {
        let catalog: Catalog = serde_json::from_str(r#"{"models": []}"#).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.dialects.is_empty());
    }
}
