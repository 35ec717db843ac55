//! Catalog domain - data models, versions and SQL dialects that can be served

mod entity;

pub use entity::{Catalog, DialectSpec, ModelSpec};
