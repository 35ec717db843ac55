//! Generation requests and their translation to DDL generator arguments

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Structural layers of a schema included in generated DDL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementScope {
    #[default]
    All,
    Tables,
    Constraints,
    Indexes,
}

impl ElementScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Tables => "tables",
            Self::Constraints => "constraints",
            Self::Indexes => "indexes",
        }
    }

    /// Flags suppressing every layer this scope does not name
    pub fn suppression_flags(&self) -> &'static [DdlFlag] {
        match self {
            Self::All => &[],
            Self::Tables => &[DdlFlag::NoConstraints, DdlFlag::NoIndexes],
            Self::Constraints => &[DdlFlag::NoTables, DdlFlag::NoIndexes],
            Self::Indexes => &[DdlFlag::NoTables, DdlFlag::NoConstraints],
        }
    }
}

impl FromStr for ElementScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "tables" => Ok(Self::Tables),
            "constraints" => Ok(Self::Constraints),
            "indexes" => Ok(Self::Indexes),
            other => Err(DomainError::validation(format!(
                "Unknown element scope '{}', expected one of: all, tables, constraints, indexes",
                other
            ))),
        }
    }
}

impl fmt::Display for ElementScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option flags understood by the DDL generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DdlFlag {
    NoTables,
    NoConstraints,
    NoIndexes,
    Reflect,
    Drop,
    DeleteData,
}

impl DdlFlag {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::NoTables => "-t",
            Self::NoConstraints => "-c",
            Self::NoIndexes => "-i",
            Self::Reflect => "-r",
            Self::Drop => "-d",
            Self::DeleteData => "-x",
        }
    }
}

/// A single DDL generation request, built per HTTP request and never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub version: String,
    pub dialect: String,
    pub scope: ElementScope,
    pub drop: bool,
    pub purge: bool,
}

impl GenerationRequest {
    /// CREATE statements for the given scope
    pub fn create(
        model: impl Into<String>,
        version: impl Into<String>,
        dialect: impl Into<String>,
        scope: ElementScope,
    ) -> Self {
        Self {
            model: model.into(),
            version: version.into(),
            dialect: dialect.into(),
            scope,
            drop: false,
            purge: false,
        }
    }

    /// DROP statements for the given scope
    pub fn drop(
        model: impl Into<String>,
        version: impl Into<String>,
        dialect: impl Into<String>,
        scope: ElementScope,
    ) -> Self {
        Self {
            drop: true,
            ..Self::create(model, version, dialect, scope)
        }
    }

    /// Full purge of the schema. Element scope does not apply.
    pub fn delete(
        model: impl Into<String>,
        version: impl Into<String>,
        dialect: impl Into<String>,
    ) -> Self {
        Self {
            drop: true,
            purge: true,
            ..Self::create(model, version, dialect, ElementScope::All)
        }
    }

    /// Flags in the order the generator expects them
    pub fn flags(&self) -> Vec<DdlFlag> {
        let mut flags = Vec::with_capacity(6);

        if !self.purge {
            flags.extend_from_slice(self.scope.suppression_flags());
        }

        flags.push(DdlFlag::Reflect);

        if self.drop {
            flags.push(DdlFlag::Drop);
        }

        if self.purge {
            flags.push(DdlFlag::DeleteData);
        }

        flags
    }

    /// Full argument list: flags followed by model, version and dialect
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .flags()
            .iter()
            .map(|flag| flag.as_arg().to_string())
            .collect();

        args.push(self.model.clone());
        args.push(self.version.clone());
        args.push(self.dialect.clone());

        args
    }
}
