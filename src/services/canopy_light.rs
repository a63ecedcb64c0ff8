/// Greenhouse cover transmissivity
const TRANSMISSIVITY: f64 = 0.8;
/// Share of global radiation inside the PAR band
const PAR_FRACTION: f64 = 0.5;
/// Photon yield of sunlight (µmol/J)
const SUNLIGHT_UMOL_PER_J: f64 = 4.6;

/// Irradiance under the cover and shade screens (W/m²).
///
/// Absent irradiance stays absent: the caller decides what a missing sample
/// means for its comparison.
pub fn shaded_irradiance(shade: f64, isun: Option<f64>) -> Option<f64> {
    isun.map(|g| TRANSMISSIVITY * (1.0 - shade) * g)
}

/// PAR reaching the canopy over one hour (mol/m²/h).
///
/// Missing irradiance counts as darkness here and only here.
pub fn canopy_par(shade: f64, isun: Option<f64>) -> f64 {
    let k = TRANSMISSIVITY * (1.0 - shade) * PAR_FRACTION * SUNLIGHT_UMOL_PER_J * 3600.0
        / 1_000_000.0;
    k * isun.unwrap_or(0.0)
}
