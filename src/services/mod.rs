pub mod aggregation;
pub mod canopy_light;
pub mod climate_import;
pub mod daily_needs;
pub mod hybrid_engine;
pub mod led_engine;
pub mod window;
