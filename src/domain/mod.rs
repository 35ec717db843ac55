//! Domain layer - Core business logic and entities

pub mod artifact;
pub mod catalog;
pub mod error;
pub mod generation;

pub use artifact::{DiagramKey, DEFAULT_FORMAT};
pub use catalog::{Catalog, DialectSpec, ModelSpec};
pub use error::DomainError;
pub use generation::{DdlFlag, DdlGenerator, DiagramGenerator, ElementScope, GenerationRequest};
