//! Entity-relationship diagram endpoints

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct DiagramQuery {
    pub format: Option<String>,
}

/// GET /{model}/{version}/erd/?format=png|svg|...
///
/// Regenerates the diagram and redirects to its filename URL.
pub async fn request_diagram(
    State(state): State<AppState>,
    Path((model, version)): Path<(String, String)>,
    Query(query): Query<DiagramQuery>,
) -> Result<Response, ApiError> {
    let url = state
        .diagram_service
        .resolve(&model, &version, query.format.as_deref())
        .await?;

    debug!(location = %url, "Redirecting to diagram");

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// GET /{model}/{version}/erd/{filename}
///
/// Streams an artifact that is already on disk.
pub async fn fetch_diagram(
    State(state): State<AppState>,
    Path((_model, _version, filename)): Path<(String, String, String)>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = state.diagram_service.open(&filename).await?;

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    Ok(response.into_response())
}
