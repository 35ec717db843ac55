//! Diagram artifact keys
//!
//! An artifact is addressed only by its filename, which is derived from the
//! model, version, output format and the generator version that produced it.
//! Bumping the generator version therefore yields fresh filenames and old
//! artifacts are simply never requested again.

use std::fmt;

use crate::domain::DomainError;

/// Output format used when the caller does not ask for one
pub const DEFAULT_FORMAT: &str = "png";

/// Key of a generated diagram
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiagramKey {
    model: String,
    version: String,
    format: String,
    generator_version: String,
}

impl DiagramKey {
    /// Build a key, falling back to [`DEFAULT_FORMAT`] when `format` is absent
    pub fn new(
        model: impl Into<String>,
        version: impl Into<String>,
        format: Option<&str>,
        generator_version: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let format = match format.map(str::trim) {
            None | Some("") => DEFAULT_FORMAT.to_string(),
            Some(f) => {
                validate_format(f)?;
                f.to_string()
            }
        };

        Ok(Self {
            model: model.into(),
            version: version.into(),
            format,
            generator_version: generator_version.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn generator_version(&self) -> &str {
        &self.generator_version
    }

    /// `{model}_{version}_dmsa_{generator_version}.{format}`
    pub fn filename(&self) -> String {
        format!(
            "{}_{}_dmsa_{}.{}",
            self.model, self.version, self.generator_version, self.format
        )
    }

    /// Retrieval URL that streams the artifact without regenerating it
    pub fn url(&self) -> String {
        format!("/{}/{}/erd/{}", self.model, self.version, self.filename())
    }
}

impl fmt::Display for DiagramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename())
    }
}

fn validate_format(format: &str) -> Result<(), DomainError> {
    if format.len() > 16 || !format.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::validation(format!(
            "Invalid diagram format '{}'",
            format
        )));
    }

    Ok(())
}

/// Reject filenames that could escape the artifact directory or name a
/// hidden staging file
pub fn validate_filename(filename: &str) -> Result<(), DomainError> {
    if filename.is_empty()
        || filename.starts_with('.')
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0')
    {
        return Err(DomainError::validation(format!(
            "Invalid artifact filename '{}'",
            filename
        )));
    }

    Ok(())
}
