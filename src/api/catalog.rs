//! Catalog listing endpoint

use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::api::types::CatalogResponse;

/// GET /
pub async fn list_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    Json(CatalogResponse::from_domain(
        &state.catalog,
        state.diagram_service.generator_version(),
    ))
}
