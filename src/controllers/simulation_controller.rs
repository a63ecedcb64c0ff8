use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::config::{Config, ParameterDefaults};
use crate::models::lighting::{
    ClimateFormatRequest, HealthStatus, HourlyWeatherRecord, HybridSimulationRequest,
    LedSimulationRequest, LightingSystem, MonthlySummary, SimulationResponse,
};
use crate::services::{climate_import, hybrid_engine, led_engine};
use crate::shared_state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OutputOptions {
    /// Round to display precision (1 decimal DLI, 2 decimals electricity)
    #[serde(default)]
    pub rounded: bool,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({"error": message.into()}))).into_response()
}

/// Runs one engine off the async runtime and wraps the monthly table.
async fn run_simulation<F>(
    state: &AppState,
    system: LightingSystem,
    weather: Vec<HourlyWeatherRecord>,
    options: &OutputOptions,
    engine: F,
) -> Response
where
    F: FnOnce(&[HourlyWeatherRecord]) -> Vec<MonthlySummary> + Send + 'static,
{
    if weather.is_empty() {
        return error_response(StatusCode::UNPROCESSABLE_ENTITY, "weather table is empty");
    }

    let run_id = Uuid::new_v4();
    let records = weather.len();
    info!(%run_id, ?system, records, "Simulation started");

    let monthly = match tokio::task::spawn_blocking(move || engine(&weather)).await {
        Ok(monthly) => monthly,
        Err(e) => {
            error!(%run_id, "Simulation failed: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "simulation failed");
        }
    };

    let total = state.record_run();
    info!(%run_id, months = monthly.len(), total_runs = total, "Simulation finished");

    let monthly = if options.rounded {
        monthly.iter().map(MonthlySummary::rounded_for_display).collect()
    } else {
        monthly
    };

    let response = SimulationResponse {
        run_id,
        system,
        generated_at: chrono::Utc::now(),
        monthly,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/simulations/led
/// Single-fixture simulation
///
/// Monthly natural and supplemental DLI, DLI variability and lighting
/// electricity for one fixture type. Electricity is summed over the days of
/// each calendar month.
#[utoipa::path(
    post,
    path = "/api/simulations/led",
    params(OutputOptions),
    request_body = LedSimulationRequest,
    responses(
        (status = 200, description = "Monthly summary", body = SimulationResponse),
        (status = 422, description = "Empty weather table"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn simulate_led(
    State(state): State<AppState>,
    State(config): State<Config>,
    Query(options): Query<OutputOptions>,
    Json(request): Json<LedSimulationRequest>,
) -> impl IntoResponse {
    let params = request.parameters.unwrap_or(config.defaults.led);
    run_simulation(&state, LightingSystem::Led, request.weather, &options, move |weather| {
        led_engine::led_usage(weather, &params)
    })
    .await
}

/// POST /api/simulations/hybrid
/// Dual-fixture (LED + HPS) simulation
///
/// Same monthly table as the LED endpoint. Electricity is summed per year and
/// month, then averaged over the years present.
#[utoipa::path(
    post,
    path = "/api/simulations/hybrid",
    params(OutputOptions),
    request_body = HybridSimulationRequest,
    responses(
        (status = 200, description = "Monthly summary", body = SimulationResponse),
        (status = 422, description = "Empty weather table"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn simulate_hybrid(
    State(state): State<AppState>,
    State(config): State<Config>,
    Query(options): Query<OutputOptions>,
    Json(request): Json<HybridSimulationRequest>,
) -> impl IntoResponse {
    let params = request.parameters.unwrap_or(config.defaults.hybrid);
    run_simulation(&state, LightingSystem::Hybrid, request.weather, &options, move |weather| {
        hybrid_engine::hybrid_usage(weather, &params)
    })
    .await
}

/// POST /api/climate/format
/// Clean a raw climate export
///
/// Converts rows with `Local Time`, `Temperature (C)` and
/// `Solar Radiation (W/m²)` columns into the hourly weather table.
#[utoipa::path(
    post,
    path = "/api/climate/format",
    request_body = ClimateFormatRequest,
    responses(
        (status = 200, description = "Hourly weather table", body = Vec<HourlyWeatherRecord>),
        (status = 400, description = "Missing columns or unparseable timestamps")
    )
)]
pub async fn format_climate(Json(request): Json<ClimateFormatRequest>) -> impl IntoResponse {
    match climate_import::format_climate_rows(&request.rows) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            warn!("Rejected climate table: {}", e);
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// GET /api/defaults
#[utoipa::path(
    get,
    path = "/api/defaults",
    responses(
        (status = 200, description = "Configured parameter defaults", body = ParameterDefaults)
    )
)]
pub async fn get_defaults(State(config): State<Config>) -> impl IntoResponse {
    Json(config.defaults).into_response()
}

/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        simulations_run: state.simulations_run(),
    })
    .into_response()
}
