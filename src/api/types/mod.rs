//! API request and response types

mod catalog;
mod error;

pub use catalog::CatalogResponse;
pub use error::{ApiError, ApiErrorDetail, ApiErrorResponse, ApiErrorType};
