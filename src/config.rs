use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::lighting::{HybridParameters, LedParameters};

fn default_port() -> u16 { 8080 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub defaults: ParameterDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Grower parameters used when a simulation request carries none.
#[derive(Debug, Default, Deserialize, Serialize, Clone, ToSchema)]
pub struct ParameterDefaults {
    #[serde(default)]
    pub led: LedParameters,
    #[serde(default)]
    pub hybrid: HybridParameters,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
