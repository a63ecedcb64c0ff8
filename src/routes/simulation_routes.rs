use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::api_docs::ApiDoc;
use crate::controllers::simulation_controller::{
    format_climate, get_defaults, get_health, simulate_hybrid, simulate_led,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>`, so a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/simulations/led",    post(simulate_led))
        .route("/simulations/hybrid", post(simulate_hybrid))
        .route("/climate/format",     post(format_climate))
        .route("/defaults",           get(get_defaults))
        .route("/health",             get(get_health))
        .with_state(shared)
}

/// Full application: API, docs UI, tracing and CORS layers.
pub fn app(shared: SharedState) -> Router {
    Router::new()
        .nest("/api", api_routes(shared))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
