//! Turns a raw climate export (one object per row, keyed by column header)
//! into the cleaned hourly weather table the engines consume.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::lighting::HourlyWeatherRecord;

pub const LOCAL_TIME: &str = "Local Time";
pub const TEMPERATURE: &str = "Temperature (C)";
pub const SOLAR_RADIATION: &str = "Solar Radiation (W/m²)";

const REQUIRED_COLUMNS: [&str; 3] = [LOCAL_TIME, TEMPERATURE, SOLAR_RADIATION];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Error, PartialEq)]
pub enum ClimateImportError {
    #[error("climate table has no rows")]
    Empty,
    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("row {row}: '{value}' could not be parsed as a local date-time")]
    UnparseableTimestamp { row: usize, value: String },
}

pub fn format_climate_rows(
    rows: &[Map<String, Value>],
) -> Result<Vec<HourlyWeatherRecord>, ClimateImportError> {
    if rows.is_empty() {
        return Err(ClimateImportError::Empty);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !rows.iter().any(|row| row.contains_key(**column)))
        .map(|column| (*column).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ClimateImportError::MissingColumns(missing));
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let raw_time = row.get(LOCAL_TIME).unwrap_or(&Value::Null);
            let timestamp = parse_local_time(raw_time).ok_or_else(|| {
                ClimateImportError::UnparseableTimestamp {
                    row: index,
                    value: raw_time.to_string(),
                }
            })?;

            Ok(HourlyWeatherRecord {
                year: timestamp.year(),
                month: timestamp.month(),
                day: timestamp.day(),
                hour: timestamp.hour(),
                temp: row.get(TEMPERATURE).and_then(numeric),
                isun: row.get(SOLAR_RADIATION).and_then(numeric),
            })
        })
        .collect()
}

fn parse_local_time(value: &Value) -> Option<NaiveDateTime> {
    let text = value.as_str()?.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Numbers and numeric strings; anything else is an absent sample.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
