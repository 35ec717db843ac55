//! Infrastructure services

mod ddl_service;
mod diagram_service;

pub use ddl_service::DdlService;
pub use diagram_service::DiagramService;
