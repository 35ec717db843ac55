//! Artifact domain - diagram keys, filenames and retrieval URLs

mod key;

pub use key::{validate_filename, DiagramKey, DEFAULT_FORMAT};
