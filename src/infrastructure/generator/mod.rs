//! Generator collaborators backed by external processes

mod process;

pub use process::{ProcessCommand, ProcessDdlGenerator, ProcessDiagramGenerator};
