//! DDL endpoints: create, drop and delete

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::generation::{ElementScope, GenerationRequest};

/// `/{model}/{version}/{op}/{dialect}/[{elements}/]`
#[derive(Debug, Deserialize)]
pub struct SchemaPath {
    pub model: String,
    pub version: String,
    pub dialect: String,
    #[serde(default)]
    pub elements: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ElementsQuery {
    pub elements: Option<String>,
}

/// Path segment wins over the query parameter; neither means `all`.
/// Unrecognised values also fall back to `all`.
fn element_scope(path: Option<&str>, query: Option<&str>) -> ElementScope {
    let Some(elements) = path.or(query) else {
        return ElementScope::All;
    };

    elements.parse().unwrap_or_else(|_| {
        warn!(elements, "Unknown elements value, generating all elements");
        ElementScope::All
    })
}

async fn respond(state: &AppState, request: GenerationRequest) -> Result<Response, ApiError> {
    debug!(request = ?request, "Generating DDL");

    let ddl = state.ddl_service.generate(&request).await?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], ddl).into_response())
}

/// GET /{model}/{version}/ddl/{dialect}/[{elements}/]
pub async fn create_ddl(
    State(state): State<AppState>,
    Path(path): Path<SchemaPath>,
    Query(query): Query<ElementsQuery>,
) -> Result<Response, ApiError> {
    let scope = element_scope(path.elements.as_deref(), query.elements.as_deref());
    let request = GenerationRequest::create(path.model, path.version, path.dialect, scope);

    respond(&state, request).await
}

/// GET /{model}/{version}/drop/{dialect}/[{elements}/]
pub async fn drop_ddl(
    State(state): State<AppState>,
    Path(path): Path<SchemaPath>,
    Query(query): Query<ElementsQuery>,
) -> Result<Response, ApiError> {
    let scope = element_scope(path.elements.as_deref(), query.elements.as_deref());
    let request = GenerationRequest::drop(path.model, path.version, path.dialect, scope);

    respond(&state, request).await
}

/// GET /{model}/{version}/delete/{dialect}/
///
/// Any elements segment or query parameter is accepted and ignored.
pub async fn delete_ddl(
    State(state): State<AppState>,
    Path(path): Path<SchemaPath>,
) -> Result<Response, ApiError> {
    let request = GenerationRequest::delete(path.model, path.version, path.dialect);

    respond(&state, request).await
}
