use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Hourly weather input ────────────────────────────────────────────────────

/// One row of the cleaned hourly weather table.
///
/// Column names follow the climate export the growers upload, so the JSON
/// form is `{"Year":2021,"Month":1,"Day":1,"Hour":0,"Temp":-2.5,"Isun":0.0}`.
/// Temperature and irradiance may be absent (`null` or omitted).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HourlyWeatherRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    /// Calendar month (1-12)
    #[serde(rename = "Month")]
    pub month: u32,
    /// Day of month (1-31)
    #[serde(rename = "Day")]
    pub day: u32,
    /// Hour of day (0-23)
    #[serde(rename = "Hour")]
    pub hour: u32,
    /// Ambient temperature (°C)
    #[serde(rename = "Temp", default)]
    pub temp: Option<f64>,
    /// Global solar irradiance (W/m²)
    #[serde(rename = "Isun", default)]
    pub isun: Option<f64>,
}

impl HourlyWeatherRecord {
    pub fn day_key(&self) -> DayKey {
        DayKey {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

/// (Year, Month, Day) grouping key. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// (Year, Month) grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

// ─── Grower parameters ───────────────────────────────────────────────────────

/// Parameters shared by both lighting systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CommonParameters {
    /// Shade fraction [0..1]
    pub shade: f64,
    /// First hour of the lighting window (0-23)
    pub window_start: u32,
    /// Window duration (h). The window is inclusive at both ends.
    pub window_duration: u32,
    /// Lights stay off while shaded irradiance reaches this value (W/m²)
    pub radiation_setpoint_w_m2: f64,
    /// Target daily light integral (mol/m²/day)
    pub dli_target: f64,
}

impl Default for CommonParameters {
    fn default() -> Self {
        Self {
            shade: 0.33,
            window_start: 5,
            window_duration: 16,
            radiation_setpoint_w_m2: 300.0,
            dli_target: 30.0,
        }
    }
}

/// Photometric characteristics of one fixture type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FixtureSpec {
    /// Photon flux delivered at canopy (µmol/m²/s)
    pub intensity: f64,
    /// Photon efficacy (µmol/J)
    pub efficacy: f64,
}

impl Default for FixtureSpec {
    fn default() -> Self {
        Self {
            intensity: 200.0,
            efficacy: 3.2,
        }
    }
}

impl FixtureSpec {
    /// PAR delivered by one hour of operation (mol/m²/h).
    pub fn par_per_hour(&self) -> f64 {
        self.intensity * 3600.0 / 1_000_000.0
    }

    /// Electricity drawn by one hour of operation (kWh/m²).
    pub fn energy_per_hour(&self) -> f64 {
        self.intensity / self.efficacy / 1000.0
    }
}

/// Single-fixture ("LED") configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct LedParameters {
    pub common: CommonParameters,
    /// Greenhouse temperature setpoint (°C)
    pub temp_setpoint_c: f64,
    pub fixture: FixtureSpec,
}

impl Default for LedParameters {
    fn default() -> Self {
        Self {
            common: CommonParameters::default(),
            temp_setpoint_c: 22.0,
            fixture: FixtureSpec::default(),
        }
    }
}

/// Dual-fixture ("Hybrid") configuration: LED is fixture-A, HPS is fixture-B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct HybridParameters {
    pub common: CommonParameters,
    pub day_temp_setpoint_c: f64,
    pub night_temp_setpoint_c: f64,
    /// Desired supplemental intensity at canopy (µmol/m²/s)
    pub target_intensity: f64,
    pub led: FixtureSpec,
    pub hps: FixtureSpec,
}

impl Default for HybridParameters {
    fn default() -> Self {
        Self {
            common: CommonParameters::default(),
            day_temp_setpoint_c: 22.0,
            night_temp_setpoint_c: 16.0,
            target_intensity: 200.0,
            led: FixtureSpec {
                intensity: 100.0,
                efficacy: 3.2,
            },
            hps: FixtureSpec {
                intensity: 100.0,
                efficacy: 1.8,
            },
        }
    }
}

// ─── Derived values ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Fixture {
    #[serde(rename = "LED")]
    Led,
    #[serde(rename = "HPS")]
    Hps,
}

/// Per-day roll-up of the single-fixture engine.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub key: DayKey,
    /// Sum of canopy PAR over the day (mol/m²/day)
    pub natural_dli: f64,
    pub max_al_hours: u32,
    pub par_needed: f64,
    pub actual_al_hours: f64,
    pub dli_al: f64,
    pub dli_total: f64,
    pub elec_cons_kwh_m2: f64,
}

/// One hour of the dual-fixture engine, enriched with its day's values.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridHour {
    pub record: HourlyWeatherRecord,
    pub canopy_par: f64,
    pub eligible: bool,
    pub natural_dli: f64,
    pub max_al_hours: u32,
    pub actual_al_hours: f64,
    pub primary: Option<Fixture>,
    pub secondary: Option<Fixture>,
    pub primary_par: Option<f64>,
    pub secondary_par: Option<f64>,
    pub primary_elec: Option<f64>,
    pub secondary_elec: Option<f64>,
}

impl HybridHour {
    /// Supplemental PAR over both slots (mol/m²/h).
    pub fn al_par(&self) -> f64 {
        self.primary_par.unwrap_or(0.0) + self.secondary_par.unwrap_or(0.0)
    }

    /// Electricity over both slots (kWh/m²).
    pub fn elec(&self) -> f64 {
        self.primary_elec.unwrap_or(0.0) + self.secondary_elec.unwrap_or(0.0)
    }
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// One calendar month of the simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySummary {
    #[serde(rename = "Month")]
    pub month: u32,
    /// Mean daily natural DLI (mol/m²/day)
    #[serde(rename = "DLI Solar")]
    pub dli_solar: f64,
    /// Mean daily supplemental DLI (mol/m²/day)
    #[serde(rename = "DLI AL")]
    pub dli_al: f64,
    /// Sample standard deviation of total DLI; absent below two samples
    #[serde(rename = "DLI Total Stdev")]
    pub dli_total_stdev: Option<f64>,
    /// Supplemental lighting electricity (kWh/m²)
    #[serde(rename = "Elec Cons (kWh/m2)")]
    pub elec_cons_kwh_m2: f64,
}

impl MonthlySummary {
    /// Rounds to the precision shown to growers: one decimal for DLI
    /// columns, two for electricity.
    pub fn rounded_for_display(&self) -> Self {
        Self {
            month: self.month,
            dli_solar: round_to(self.dli_solar, 1),
            dli_al: round_to(self.dli_al, 1),
            dli_total_stdev: self.dli_total_stdev.map(|v| round_to(v, 1)),
            elec_cons_kwh_m2: round_to(self.elec_cons_kwh_m2, 2),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ─── REST API types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LightingSystem {
    #[serde(rename = "LED")]
    Led,
    Hybrid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LedSimulationRequest {
    pub weather: Vec<HourlyWeatherRecord>,
    /// Falls back to the configured defaults when omitted
    #[serde(default)]
    pub parameters: Option<LedParameters>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HybridSimulationRequest {
    pub weather: Vec<HourlyWeatherRecord>,
    /// Falls back to the configured defaults when omitted
    #[serde(default)]
    pub parameters: Option<HybridParameters>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SimulationResponse {
    pub run_id: Uuid,
    pub system: LightingSystem,
    pub generated_at: DateTime<Utc>,
    pub monthly: Vec<MonthlySummary>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClimateFormatRequest {
    /// Raw export rows keyed by column header
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub simulations_run: u64,
}
