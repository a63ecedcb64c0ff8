//! Dual-fixture engine (LED + HPS).
//!
//! Works at hourly grain end to end. Daily values are computed in a first
//! pass and joined back onto every hour of their day, then a chronological
//! fold hands out each day's hour budget to the primary fixture slot, and an
//! independent pass decides the secondary slot.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::lighting::{
    DayKey, Fixture, FixtureSpec, HourlyWeatherRecord, HybridHour, HybridParameters,
    MonthlySummary,
};
use crate::services::aggregation;
use crate::services::canopy_light::{canopy_par, shaded_irradiance};
use crate::services::daily_needs::daily_needs;
use crate::services::window::EligibilityRule;

pub fn hybrid_usage(
    weather: &[HourlyWeatherRecord],
    params: &HybridParameters,
) -> Vec<MonthlySummary> {
    let hours = hybrid_hours(weather, params);
    debug!(hours = hours.len(), "Hybrid hourly table complete");
    aggregation::monthly_from_hours(&hours)
}

/// Day/night temperature setpoints. Night is an hour with exactly zero
/// shaded irradiance; a missing irradiance sample counts as day.
#[derive(Debug, Clone, Copy)]
pub struct ThermalSetpoints {
    pub day_c: f64,
    pub night_c: f64,
}

impl ThermalSetpoints {
    pub fn for_hour(&self, shaded: Option<f64>) -> f64 {
        if shaded == Some(0.0) {
            self.night_c
        } else {
            self.day_c
        }
    }

    /// Ambient below the applicable setpoint. False when temperature is absent.
    pub fn is_cold(&self, temp: Option<f64>, shaded: Option<f64>) -> bool {
        let setpoint = self.for_hour(shaded);
        temp.is_some_and(|t| t < setpoint)
    }
}

/// HPS when its radiant heat is welcome, LED otherwise.
pub fn primary_fixture(
    temp: Option<f64>,
    shaded: Option<f64>,
    setpoints: &ThermalSetpoints,
) -> Fixture {
    if setpoints.is_cold(temp, shaded) {
        Fixture::Hps
    } else {
        Fixture::Led
    }
}

/// Second fixture to close the gap to the target intensity.
pub fn secondary_fixture(
    primary: Option<Fixture>,
    temp: Option<f64>,
    shaded: Option<f64>,
    params: &HybridParameters,
    setpoints: &ThermalSetpoints,
) -> Option<Fixture> {
    match primary {
        None => None,
        Some(Fixture::Hps) => {
            (params.hps.intensity < params.target_intensity).then_some(Fixture::Led)
        }
        Some(Fixture::Led) => (params.led.intensity < params.target_intensity
            && setpoints.is_cold(temp, shaded))
        .then_some(Fixture::Hps),
    }
}

/// Running state of the primary-slot fold.
#[derive(Debug, Default)]
struct DayBudget {
    current_day: Option<DayKey>,
    hours_used: u32,
}

impl DayBudget {
    fn assign(
        &mut self,
        hour: &HybridHour,
        shaded: Option<f64>,
        setpoints: &ThermalSetpoints,
    ) -> Option<Fixture> {
        let key = hour.record.day_key();
        if self.current_day != Some(key) {
            if self.current_day.is_some_and(|previous| key < previous) {
                warn!(?key, "weather records out of chronological order");
            }
            self.current_day = Some(key);
            self.hours_used = 0;
        }

        let budget = day_budget(hour.actual_al_hours);
        if hour.eligible && self.hours_used < budget {
            self.hours_used += 1;
            Some(primary_fixture(hour.record.temp, shaded, setpoints))
        } else {
            None
        }
    }
}

/// Whole lighting hours available for the day, rounding half to even.
fn day_budget(actual_hours: f64) -> u32 {
    actual_hours.round_ties_even() as u32
}

fn slot_values(fixture: Option<Fixture>, params: &HybridParameters) -> (Option<f64>, Option<f64>) {
    let spec: Option<&FixtureSpec> = fixture.map(|f| match f {
        Fixture::Led => &params.led,
        Fixture::Hps => &params.hps,
    });
    (
        spec.map(FixtureSpec::par_per_hour),
        spec.map(FixtureSpec::energy_per_hour),
    )
}

/// The enriched hourly table, in input order.
pub fn hybrid_hours(weather: &[HourlyWeatherRecord], params: &HybridParameters) -> Vec<HybridHour> {
    let shade = params.common.shade;
    let rule = EligibilityRule::new(&params.common, params.day_temp_setpoint_c);
    let setpoints = ThermalSetpoints {
        day_c: params.day_temp_setpoint_c,
        night_c: params.night_temp_setpoint_c,
    };
    let shaded: Vec<Option<f64>> = weather
        .iter()
        .map(|r| shaded_irradiance(shade, r.isun))
        .collect();

    // Pass 1: per-hour canopy PAR and eligibility.
    let mut hours: Vec<HybridHour> = weather
        .iter()
        .zip(&shaded)
        .map(|(record, s)| HybridHour {
            record: *record,
            canopy_par: canopy_par(shade, record.isun),
            eligible: rule.is_eligible(record.hour, record.temp, *s),
            natural_dli: 0.0,
            max_al_hours: 0,
            actual_al_hours: 0.0,
            primary: None,
            secondary: None,
            primary_par: None,
            secondary_par: None,
            primary_elec: None,
            secondary_elec: None,
        })
        .collect();

    // Pass 2: day-key → (natural DLI, eligible hours, actual hours), joined
    // back onto every hour of the day.
    let mut totals: BTreeMap<DayKey, (f64, u32)> = BTreeMap::new();
    for hour in &hours {
        let entry = totals.entry(hour.record.day_key()).or_insert((0.0, 0));
        entry.0 += hour.canopy_par;
        if hour.eligible {
            entry.1 += 1;
        }
    }
    let daily: BTreeMap<DayKey, (f64, u32, f64)> = totals
        .into_iter()
        .map(|(key, (natural_dli, max_hours))| {
            let needs = daily_needs(
                natural_dli,
                max_hours,
                params.common.dli_target,
                params.target_intensity,
            );

            #[cfg(feature = "verbose_log")]
            debug!(
                ?key,
                natural_dli, max_hours, actual_hours = needs.actual_hours, "Hybrid day"
            );

            (key, (natural_dli, max_hours, needs.actual_hours))
        })
        .collect();
    for hour in &mut hours {
        if let Some(&(natural_dli, max_hours, actual_hours)) = daily.get(&hour.record.day_key()) {
            hour.natural_dli = natural_dli;
            hour.max_al_hours = max_hours;
            hour.actual_al_hours = actual_hours;
        }
    }

    // Pass 3: chronological fold over the primary slot.
    let primaries: Vec<Option<Fixture>> = hours
        .iter()
        .zip(&shaded)
        .scan(DayBudget::default(), |budget, (hour, s)| {
            Some(budget.assign(hour, *s, &setpoints))
        })
        .collect();

    // Pass 4: secondary slot and per-slot contributions.
    for ((hour, primary), s) in hours.iter_mut().zip(primaries).zip(&shaded) {
        let secondary = secondary_fixture(primary, hour.record.temp, *s, params, &setpoints);
        (hour.primary_par, hour.primary_elec) = slot_values(primary, params);
        (hour.secondary_par, hour.secondary_elec) = slot_values(secondary, params);
        hour.primary = primary;
        hour.secondary = secondary;
    }

    hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lighting::CommonParameters;
    use is_close::is_close;

    fn night_day(year: i32, month: u32, day: u32, temp: f64) -> Vec<HourlyWeatherRecord> {
        (0..24)
            .map(|hour| HourlyWeatherRecord {
                year,
                month,
                day,
                hour,
                temp: Some(temp),
                isun: Some(0.0),
            })
            .collect()
    }

    /// Dark weather, hours 0..=4 open, 2.5 h of light needed.
    fn params() -> HybridParameters {
        HybridParameters {
            common: CommonParameters {
                shade: 0.0,
                window_start: 0,
                window_duration: 4,
                radiation_setpoint_w_m2: 300.0,
                dli_target: 9.0,
            },
            day_temp_setpoint_c: 22.0,
            night_temp_setpoint_c: 16.0,
            target_intensity: 1000.0,
            led: FixtureSpec { intensity: 100.0, efficacy: 3.2 },
            hps: FixtureSpec { intensity: 100.0, efficacy: 1.8 },
        }
    }

    fn setpoints() -> ThermalSetpoints {
        ThermalSetpoints { day_c: 22.0, night_c: 16.0 }
    }

    #[test]
    fn test_night_primary_follows_night_setpoint() {
        let sp = setpoints();
        assert_eq!(primary_fixture(Some(12.0), Some(0.0), &sp), Fixture::Hps);
        assert_eq!(primary_fixture(Some(16.0), Some(0.0), &sp), Fixture::Led);
        assert_eq!(primary_fixture(Some(18.0), Some(0.0), &sp), Fixture::Led);
        // Same temperature by day compares against the day setpoint
        assert_eq!(primary_fixture(Some(18.0), Some(40.0), &sp), Fixture::Hps);
    }

    #[test]
    fn test_missing_temperature_prefers_led() {
        assert_eq!(primary_fixture(None, Some(0.0), &setpoints()), Fixture::Led);
    }

    #[test]
    fn test_secondary_rules() {
        let sp = setpoints();
        let mut p = params();
        p.target_intensity = 200.0;

        assert_eq!(secondary_fixture(None, Some(0.0), Some(0.0), &p, &sp), None);
        assert_eq!(
            secondary_fixture(Some(Fixture::Hps), Some(30.0), Some(0.0), &p, &sp),
            Some(Fixture::Led)
        );
        assert_eq!(
            secondary_fixture(Some(Fixture::Led), Some(10.0), Some(0.0), &p, &sp),
            Some(Fixture::Hps)
        );
        assert_eq!(
            secondary_fixture(Some(Fixture::Led), Some(20.0), Some(0.0), &p, &sp),
            None
        );

        p.hps.intensity = 200.0;
        assert_eq!(
            secondary_fixture(Some(Fixture::Hps), Some(10.0), Some(0.0), &p, &sp),
            None
        );
    }

    #[test]
    fn test_strong_led_never_gets_secondary() {
        let sp = setpoints();
        let mut p = params();
        p.led.intensity = 250.0;
        p.target_intensity = 250.0;
        for temp in [-20.0, 0.0, 15.9, 30.0] {
            for shaded in [Some(0.0), Some(100.0), None] {
                assert_eq!(
                    secondary_fixture(Some(Fixture::Led), Some(temp), shaded, &p, &sp),
                    None
                );
            }
        }
    }

    #[test]
    fn test_budget_rounds_half_to_even() {
        assert_eq!(day_budget(2.5), 2);
        assert_eq!(day_budget(3.5), 4);
        assert_eq!(day_budget(2.4), 2);
        assert_eq!(day_budget(0.0), 0);
    }

    #[test]
    fn test_budget_limits_primary_hours_per_day() {
        let weather = night_day(2021, 1, 1, 10.0);
        let hours = hybrid_hours(&weather, &params());

        assert_eq!(hours[0].max_al_hours, 5);
        assert_eq!(hours[0].actual_al_hours, 2.5);
        let lit: Vec<u32> = hours
            .iter()
            .filter(|h| h.primary.is_some())
            .map(|h| h.record.hour)
            .collect();
        assert_eq!(lit, vec![0, 1]);
        assert_eq!(hours[0].primary, Some(Fixture::Hps));
        assert_eq!(hours[0].secondary, Some(Fixture::Led));
        assert_eq!(hours[5].primary_par, None);
        assert_eq!(hours[5].elec(), 0.0);
    }

    #[test]
    fn test_counter_resets_each_day() {
        let mut weather = night_day(2021, 1, 1, 10.0);
        weather.extend(night_day(2021, 1, 2, 20.0));
        let hours = hybrid_hours(&weather, &params());

        let lit: Vec<(u32, Option<Fixture>)> = hours
            .iter()
            .filter(|h| h.primary.is_some())
            .map(|h| (h.record.day, h.primary))
            .collect();
        assert_eq!(
            lit,
            vec![
                (1, Some(Fixture::Hps)),
                (1, Some(Fixture::Hps)),
                (2, Some(Fixture::Led)),
                (2, Some(Fixture::Led)),
            ]
        );
    }

    #[test]
    fn test_monthly_values() {
        let weather = night_day(2021, 1, 1, 10.0);
        let monthly = hybrid_usage(&weather, &params());
        assert_eq!(monthly.len(), 1);

        let m = &monthly[0];
        // Two hours of HPS + LED at 100 µmol/m²/s each
        assert_eq!(m.dli_solar, 0.0);
        assert!(is_close!(m.dli_al, 1.44), "got {}", m.dli_al);
        let expected_elec = 2.0 * (100.0 / 1.8 / 1000.0 + 100.0 / 3.2 / 1000.0);
        assert!(is_close!(m.elec_cons_kwh_m2, expected_elec));
        assert!(m.dli_total_stdev.is_some_and(|s| s.abs() < 1e-12));
    }

    #[test]
    fn test_repeated_years_average_electricity() {
        let one_year = night_day(2020, 1, 1, 10.0);
        let mut two_years = night_day(2020, 1, 1, 10.0);
        two_years.extend(night_day(2021, 1, 1, 10.0));

        let a = hybrid_usage(&one_year, &params());
        let b = hybrid_usage(&two_years, &params());
        assert!(is_close!(a[0].elec_cons_kwh_m2, b[0].elec_cons_kwh_m2));
        assert!(is_close!(a[0].dli_al, b[0].dli_al));
    }

    /// Day 2 of `night_day` with four sunny midday hours outside the window.
    fn two_day_month() -> Vec<HourlyWeatherRecord> {
        let mut weather = night_day(2021, 1, 1, 10.0);
        let mut sunny = night_day(2021, 1, 2, 10.0);
        for record in &mut sunny[10..14] {
            record.isun = Some(200.0);
        }
        weather.extend(sunny);
        weather
    }

    #[test]
    fn test_natural_dli_sums_hourly_canopy_par() {
        let hours = hybrid_hours(&two_day_month(), &HybridParameters::default());
        let day_two: Vec<&HybridHour> = hours.iter().filter(|h| h.record.day == 2).collect();

        let summed: f64 = day_two.iter().map(|h| h.canopy_par).sum();
        assert!(is_close!(summed, 4.0 * 1.3248), "got {summed}");
        assert!(day_two.iter().all(|h| h.natural_dli == summed));
        assert!(hours.iter().filter(|h| h.record.day == 1).all(|h| h.natural_dli == 0.0));
    }

    #[test]
    fn test_total_dli_stdev_is_taken_over_hours() {
        let p = HybridParameters {
            common: params().common,
            ..HybridParameters::default()
        };
        let monthly = hybrid_usage(&two_day_month(), &p);
        let m = &monthly[0];

        // Both days light five hours of HPS + LED; only day 2 has sun
        let natural = 4.0 * 1.3248;
        assert!(is_close!(m.dli_al, 3.6), "got {}", m.dli_al);
        let hourly = natural / 2.0 * (48.0_f64 / 47.0).sqrt();
        let daily = natural / 2.0 * 2.0_f64.sqrt();
        let stdev = m.dli_total_stdev.unwrap_or_default();
        assert!(is_close!(stdev, hourly), "got {stdev}");
        assert!(is_close!(stdev, 2.677638876069418));
        assert!(!is_close!(stdev, daily));
    }

    #[test]
    fn test_runs_are_repeatable() {
        let mut weather = night_day(2021, 2, 1, 12.0);
        weather.extend(night_day(2021, 2, 2, 19.0));
        let p = HybridParameters::default();
        assert_eq!(hybrid_usage(&weather, &p), hybrid_usage(&weather, &p));
    }
}
