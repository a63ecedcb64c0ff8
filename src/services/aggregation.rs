use std::collections::BTreeMap;

use crate::models::lighting::{DailySummary, HybridHour, MonthKey, MonthlySummary};

/// Groups `items` by `key`, keeping input order inside each group.
pub fn group_by<'a, T, K, F>(items: &'a [T], key: F) -> BTreeMap<K, Vec<&'a T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n − 1). Absent below two samples.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Day grain → month grain. Electricity is the SUM of the daily figures,
/// so several years of the same month add up.
pub fn monthly_from_days(days: &[DailySummary]) -> Vec<MonthlySummary> {
    group_by(days, |d| d.key.month)
        .into_iter()
        .map(|(month, group)| {
            let natural: Vec<f64> = group.iter().map(|d| d.natural_dli).collect();
            let al: Vec<f64> = group.iter().map(|d| d.dli_al).collect();
            let total: Vec<f64> = group.iter().map(|d| d.dli_total).collect();

            MonthlySummary {
                month,
                dli_solar: mean(&natural),
                dli_al: mean(&al),
                dli_total_stdev: sample_std(&total),
                elec_cons_kwh_m2: group.iter().map(|d| d.elec_cons_kwh_m2).sum(),
            }
        })
        .collect()
}

/// Hour grain → month grain.
///
/// Daily values are carried on every hour of their day, so the DLI means and
/// the standard deviation are taken over hours. Electricity is summed per
/// (year, month) and the per-year totals are then averaged, so several years
/// of the same month give a typical-year figure.
pub fn monthly_from_hours(hours: &[HybridHour]) -> Vec<MonthlySummary> {
    let al_daily: BTreeMap<_, f64> = group_by(hours, |h| h.record.day_key())
        .into_iter()
        .map(|(day, group)| (day, group.iter().map(|h| h.al_par()).sum()))
        .collect();

    let elec_monthly: BTreeMap<MonthKey, f64> = group_by(hours, |h| h.record.month_key())
        .into_iter()
        .map(|(key, group)| (key, group.iter().map(|h| h.elec()).sum()))
        .collect();

    group_by(hours, |h| h.record.month)
        .into_iter()
        .map(|(month, group)| {
            let natural: Vec<f64> = group.iter().map(|h| h.natural_dli).collect();
            let al: Vec<f64> = group
                .iter()
                .map(|h| al_daily.get(&h.record.day_key()).copied().unwrap_or(0.0))
                .collect();
            let total: Vec<f64> = natural.iter().zip(&al).map(|(n, a)| n + a).collect();
            let year_totals: Vec<f64> = elec_monthly
                .iter()
                .filter(|(key, _)| key.month == month)
                .map(|(_, elec)| *elec)
                .collect();

            MonthlySummary {
                month,
                dli_solar: mean(&natural),
                dli_al: mean(&al),
                dli_total_stdev: sample_std(&total),
                elec_cons_kwh_m2: mean(&year_totals),
            }
        })
        .collect()
}
