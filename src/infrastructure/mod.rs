//! Infrastructure layer - External service implementations

pub mod artifact;
pub mod generator;
pub mod observability;
pub mod services;
