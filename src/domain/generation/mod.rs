//! Generation domain - DDL argument translation and generator collaborators

mod generator;
mod request;

pub use generator::{DdlGenerator, DiagramGenerator};
pub use request::{DdlFlag, ElementScope, GenerationRequest};

#[cfg(test)]
pub use generator::mock;
