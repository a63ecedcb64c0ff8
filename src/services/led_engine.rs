//! Single-fixture engine.
//!
//! Hours are reduced to days first; the daily needs and the electricity are
//! computed once per day and the days are then rolled up to months.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::lighting::{
    DailySummary, DayKey, HourlyWeatherRecord, LedParameters, MonthlySummary,
};
use crate::services::aggregation;
use crate::services::canopy_light::{canopy_par, shaded_irradiance};
use crate::services::daily_needs::{daily_needs, fixture_energy};
use crate::services::window::EligibilityRule;

pub fn led_usage(weather: &[HourlyWeatherRecord], params: &LedParameters) -> Vec<MonthlySummary> {
    let days = led_daily(weather, params);
    debug!(days = days.len(), "LED daily roll-up complete");
    aggregation::monthly_from_days(&days)
}

/// Per-day natural light, lighting hours and electricity, in day order.
pub fn led_daily(weather: &[HourlyWeatherRecord], params: &LedParameters) -> Vec<DailySummary> {
    let shade = params.common.shade;
    let rule = EligibilityRule::new(&params.common, params.temp_setpoint_c);

    // (natural DLI, eligible hours)
    let mut totals: BTreeMap<DayKey, (f64, u32)> = BTreeMap::new();
    for record in weather {
        let entry = totals.entry(record.day_key()).or_insert((0.0, 0));
        entry.0 += canopy_par(shade, record.isun);
        let shaded = shaded_irradiance(shade, record.isun);
        if rule.is_eligible(record.hour, record.temp, shaded) {
            entry.1 += 1;
        }
    }

    totals
        .into_iter()
        .map(|(key, (natural_dli, max_al_hours))| {
            let needs = daily_needs(
                natural_dli,
                max_al_hours,
                params.common.dli_target,
                params.fixture.intensity,
            );

            #[cfg(feature = "verbose_log")]
            debug!(
                ?key,
                natural_dli, max_al_hours, actual_hours = needs.actual_hours, "LED day"
            );

            DailySummary {
                key,
                natural_dli,
                max_al_hours,
                par_needed: needs.par_needed,
                actual_al_hours: needs.actual_hours,
                dli_al: needs.dli_al,
                dli_total: natural_dli + needs.dli_al,
                elec_cons_kwh_m2: fixture_energy(&params.fixture, needs.actual_hours),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lighting::{CommonParameters, FixtureSpec};
    use is_close::is_close;

    fn day_of(year: i32, month: u32, day: u32, temp: f64, isun: impl Fn(u32) -> f64) -> Vec<HourlyWeatherRecord> {
        (0..24)
            .map(|hour| HourlyWeatherRecord {
                year,
                month,
                day,
                hour,
                temp: Some(temp),
                isun: Some(isun(hour)),
            })
            .collect()
    }

    fn params(start: u32, duration: u32, rad: f64, target: f64) -> LedParameters {
        LedParameters {
            common: CommonParameters {
                shade: 0.0,
                window_start: start,
                window_duration: duration,
                radiation_setpoint_w_m2: rad,
                dli_target: target,
            },
            temp_setpoint_c: 22.0,
            fixture: FixtureSpec { intensity: 200.0, efficacy: 3.2 },
        }
    }

    #[test]
    fn test_dark_day_with_zero_target() {
        let weather = day_of(2021, 1, 1, 10.0, |_| 0.0);
        let days = led_daily(&weather, &params(0, 23, 1.0, 0.0));
        assert_eq!(days.len(), 1);
        let d = &days[0];
        assert_eq!(d.max_al_hours, 24);
        assert_eq!(d.natural_dli, 0.0);
        assert_eq!(d.par_needed, 0.0);
        assert_eq!(d.actual_al_hours, 0.0);
        assert_eq!(d.dli_al, 0.0);
        assert_eq!(d.elec_cons_kwh_m2, 0.0);

        let monthly = led_usage(&weather, &params(0, 23, 0.0, 0.0));
        assert_eq!(monthly[0].dli_al, 0.0);
        assert_eq!(monthly[0].elec_cons_kwh_m2, 0.0);
    }

    #[test]
    fn test_huge_target_clips_to_eligible_hours() {
        let weather = day_of(2021, 1, 1, 10.0, |_| 0.0);
        // Hours 0..=7 open
        let days = led_daily(&weather, &params(0, 7, 300.0, 1000.0));
        assert_eq!(days[0].max_al_hours, 8);
        assert_eq!(days[0].actual_al_hours, 8.0);
        assert!(is_close!(days[0].elec_cons_kwh_m2, 0.5));
    }

    #[test]
    fn test_monthly_elec_is_sum_of_days() {
        let mut weather = day_of(2021, 3, 1, 10.0, |h| if (8..16).contains(&h) { 150.0 } else { 0.0 });
        weather.extend(day_of(2021, 3, 2, 10.0, |h| if (10..14).contains(&h) { 90.0 } else { 0.0 }));
        weather.extend(day_of(2022, 3, 1, 10.0, |_| 0.0));
        let p = params(5, 16, 300.0, 15.0);

        let days = led_daily(&weather, &p);
        let expected: f64 = days.iter().map(|d| d.elec_cons_kwh_m2).sum();
        let monthly = led_usage(&weather, &p);

        assert_eq!(monthly.len(), 1);
        assert!(is_close!(monthly[0].elec_cons_kwh_m2, expected));
        assert!(monthly[0].dli_total_stdev.is_some());
    }

    #[test]
    fn test_months_in_calendar_order() {
        let mut weather = day_of(2021, 12, 1, 5.0, |_| 0.0);
        weather.extend(day_of(2022, 1, 1, 5.0, |_| 0.0));
        let monthly = led_usage(&weather, &LedParameters::default());
        let months: Vec<u32> = monthly.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![1, 12]);
    }

    #[test]
    fn test_runs_are_repeatable() {
        let weather = day_of(2021, 6, 1, 18.0, |h| if (6..20).contains(&h) { 400.0 } else { 0.0 });
        let p = LedParameters::default();
        assert_eq!(led_usage(&weather, &p), led_usage(&weather, &p));
    }
}
