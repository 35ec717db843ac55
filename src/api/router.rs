use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;

use super::middleware::{logging_middleware, security_headers_middleware};
use super::state::AppState;
use super::{catalog, erd, health, schema};
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Register `path` both with and without a trailing slash
fn route_slashed(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{}/", path), method_router)
}

/// Routes without middleware
pub fn create_routes() -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(catalog::list_catalog))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check));

    for (op, handler) in [
        ("ddl", get(schema::create_ddl)),
        ("drop", get(schema::drop_ddl)),
        ("delete", get(schema::delete_ddl)),
    ] {
        let base = format!("/{{model}}/{{version}}/{}/{{dialect}}", op);
        router = route_slashed(router, &base, handler.clone());
        router = route_slashed(router, &format!("{}/{{elements}}", base), handler);
    }

    router = route_slashed(router, "/{model}/{version}/erd", get(erd::request_diagram));
    router.route("/{model}/{version}/erd/{filename}", get(erd::fetch_diagram))
}

/// Full application router with middleware and the optional metrics endpoint
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = create_routes()
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}
