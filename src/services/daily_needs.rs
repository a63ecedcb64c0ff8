use crate::models::lighting::FixtureSpec;

/// How much supplemental light one day needs and can actually get.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyNeeds {
    /// Shortfall against the DLI target, never negative (mol/m²/day)
    pub par_needed: f64,
    pub hours_needed: f64,
    /// `hours_needed` clipped to `[0, max eligible hours]`
    pub actual_hours: f64,
    /// Supplemental DLI delivered in `actual_hours` (mol/m²/day)
    pub dli_al: f64,
}

/// `intensity` is the flux the lights deliver while on (µmol/m²/s).
///
/// A day with no eligible hour gets no light whatever its shortfall; the
/// unmet need is not reported.
pub fn daily_needs(
    natural_dli: f64,
    max_eligible_hours: u32,
    dli_target: f64,
    intensity: f64,
) -> DailyNeeds {
    let par_needed = (dli_target - natural_dli).max(0.0);
    let hours_needed = par_needed * 1_000_000.0 / intensity / 3600.0;
    let actual_hours = hours_needed.clamp(0.0, f64::from(max_eligible_hours));
    let dli_al = intensity * 3600.0 / 1_000_000.0 * actual_hours;

    DailyNeeds {
        par_needed,
        hours_needed,
        actual_hours,
        dli_al,
    }
}

/// Electricity drawn by a single fixture type over `actual_hours` (kWh/m²).
pub fn fixture_energy(fixture: &FixtureSpec, actual_hours: f64) -> f64 {
    fixture.intensity / fixture.efficacy / 1000.0 * actual_hours
}
