use utoipa::OpenApi;
use crate::controllers::simulation_controller;
use crate::models::lighting;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        simulation_controller::simulate_led,
        simulation_controller::simulate_hybrid,
        simulation_controller::format_climate,
        simulation_controller::get_defaults,
        simulation_controller::get_health
    ),
    components(
        schemas(
            lighting::HourlyWeatherRecord,
            lighting::CommonParameters,
            lighting::FixtureSpec,
            lighting::LedParameters,
            lighting::HybridParameters,
            lighting::MonthlySummary,
            lighting::LightingSystem,
            lighting::SimulationResponse,
            config::ParameterDefaults
        )
    ),
    tags(
        (name = "greenhouse-lighting-sim", description = "Greenhouse Supplemental Lighting Simulation API")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_simulation_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/simulations/led"));
        assert!(doc.paths.paths.contains_key("/api/simulations/hybrid"));
    }
}
