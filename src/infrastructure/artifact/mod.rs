//! On-disk artifact storage

mod locks;
mod store;

pub use locks::KeyLocks;
pub use store::{ArtifactStore, DirStatus};
