//! CSV ingest for the two bike-sharing datasets.
//!
//! This module turns the raw `day.csv` / `hour.csv` files into typed rows with
//! the category codes still in their integer form (recoding happens later, in
//! `data::normalize`).
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Fatal row errors**: a malformed row aborts the whole load; the render
//!   never sees a partial dataset
//! - **Deterministic behavior** (no hidden fallbacks)

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::RecordExtras;
use crate::error::AppError;

/// A raw daily row: category codes not yet recoded.
#[derive(Debug, Clone)]
pub struct RawDailyRow {
    pub date: NaiveDate,
    pub yr: i64,
    pub season_code: i64,
    pub weather_code: i64,
    pub temp: f64,
    pub count: i64,
    pub extras: RecordExtras,
}

/// A raw hourly row: category codes not yet recoded, hour still 0-23.
#[derive(Debug, Clone)]
pub struct RawHourlyRow {
    pub date: NaiveDate,
    pub yr: i64,
    pub season_code: i64,
    pub weather_code: i64,
    pub working_day_code: i64,
    /// Hour of day as stored in the CSV (0-23).
    pub hour: u8,
    pub temp: f64,
    pub count: i64,
    pub extras: RecordExtras,
}

const DAILY_REQUIRED: [&str; 6] = ["dteday", "yr", "season", "weathersit", "temp", "cnt"];
const HOURLY_REQUIRED: [&str; 8] = [
    "dteday",
    "yr",
    "season",
    "weathersit",
    "temp",
    "cnt",
    "hr",
    "workingday",
];

/// Read and parse the daily CSV, stopping after `limit` rows when given.
pub fn read_daily_csv(path: &Path, limit: Option<usize>) -> Result<Vec<RawDailyRow>, AppError> {
    let reader = open_reader(path)?;
    parse_daily(reader, &path.display().to_string(), limit)
}

/// Read and parse the hourly CSV, stopping after `limit` rows when given.
pub fn read_hourly_csv(path: &Path, limit: Option<usize>) -> Result<Vec<RawHourlyRow>, AppError> {
    let reader = open_reader(path)?;
    parse_hourly(reader, &path.display().to_string(), limit)
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

/// Parse the daily dataset from any CSV reader (file or in-memory).
pub fn parse_daily<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    source: &str,
    limit: Option<usize>,
) -> Result<Vec<RawDailyRow>, AppError> {
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns_exist(&DAILY_REQUIRED, &header_map, source)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        if let Some(limit) = limit {
            if rows.len() >= limit {
                break;
            }
        }

        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(2, format!("{source}:{line}: CSV parse error: {e}")))?;

        let row = parse_daily_row(&record, &header_map)
            .map_err(|msg| AppError::new(2, format!("{source}:{line}: {msg}")))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Parse the hourly dataset from any CSV reader (file or in-memory).
pub fn parse_hourly<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    source: &str,
    limit: Option<usize>,
) -> Result<Vec<RawHourlyRow>, AppError> {
    let header_map = read_header_map(&mut reader, source)?;
    ensure_columns_exist(&HOURLY_REQUIRED, &header_map, source)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        if let Some(limit) = limit {
            if rows.len() >= limit {
                break;
            }
        }

        let line = idx + 2;
        let record = result
            .map_err(|e| AppError::new(2, format!("{source}:{line}: CSV parse error: {e}")))?;

        let row = parse_hourly_row(&record, &header_map)
            .map_err(|msg| AppError::new(2, format!("{source}:{line}: {msg}")))?;
        rows.push(row);
    }

    Ok(rows)
}

fn read_header_map<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    source: &str,
) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("{source}: failed to read CSV headers: {e}")))?
        .clone();
    Ok(build_header_map(&headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿instant"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_columns_exist(
    required: &[&str],
    header_map: &HashMap<String, usize>,
    source: &str,
) -> Result<(), AppError> {
    for name in required {
        if !header_map.contains_key(*name) {
            return Err(AppError::new(
                2,
                format!("{source}: missing required column: `{name}`"),
            ));
        }
    }
    Ok(())
}

fn parse_daily_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<RawDailyRow, String> {
    Ok(RawDailyRow {
        date: parse_date(get_required(record, header_map, "dteday")?)?,
        yr: parse_i64(get_required(record, header_map, "yr")?, "yr")?,
        season_code: parse_i64(get_required(record, header_map, "season")?, "season")?,
        weather_code: parse_i64(get_required(record, header_map, "weathersit")?, "weathersit")?,
        temp: parse_f64(get_required(record, header_map, "temp")?, "temp")?,
        count: parse_i64(get_required(record, header_map, "cnt")?, "cnt")?,
        extras: parse_extras(record, header_map),
    })
}

fn parse_hourly_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<RawHourlyRow, String> {
    let hour_raw = parse_i64(get_required(record, header_map, "hr")?, "hr")?;
    if !(0..=23).contains(&hour_raw) {
        return Err(format!("Invalid `hr` value {hour_raw} (expected 0-23)."));
    }

    Ok(RawHourlyRow {
        date: parse_date(get_required(record, header_map, "dteday")?)?,
        yr: parse_i64(get_required(record, header_map, "yr")?, "yr")?,
        season_code: parse_i64(get_required(record, header_map, "season")?, "season")?,
        weather_code: parse_i64(get_required(record, header_map, "weathersit")?, "weathersit")?,
        working_day_code: parse_i64(get_required(record, header_map, "workingday")?, "workingday")?,
        hour: hour_raw as u8,
        temp: parse_f64(get_required(record, header_map, "temp")?, "temp")?,
        count: parse_i64(get_required(record, header_map, "cnt")?, "cnt")?,
        extras: parse_extras(record, header_map),
    })
}

fn parse_extras(record: &StringRecord, header_map: &HashMap<String, usize>) -> RecordExtras {
    RecordExtras {
        holiday: parse_opt_i64(get_optional(record, header_map, "holiday")),
        weekday: parse_opt_i64(get_optional(record, header_map, "weekday")),
        month: parse_opt_i64(get_optional(record, header_map, "mnth")),
        atemp: parse_opt_f64(get_optional(record, header_map, "atemp")),
        hum: parse_opt_f64(get_optional(record, header_map, "hum")),
        windspeed: parse_opt_f64(get_optional(record, header_map, "windspeed")),
        casual: parse_opt_i64(get_optional(record, header_map, "casual")),
        registered: parse_opt_i64(get_optional(record, header_map, "registered")),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // The published datasets use ISO dates, but re-exports through spreadsheet
    // tools often rewrite them. Accept a small set of common formats to reduce
    // friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn parse_i64(s: &str, name: &str) -> Result<i64, String> {
    s.parse::<i64>()
        .map_err(|_| format!("Invalid integer for `{name}`: '{s}'"))
}

fn parse_f64(s: &str, name: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid number for `{name}`: '{s}'"))?;
    if !v.is_finite() {
        return Err(format!("Non-finite number for `{name}`: '{s}'"));
    }
    Ok(v)
}

fn parse_opt_i64(s: Option<&str>) -> Option<i64> {
    s?.parse::<i64>().ok()
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_from(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes())
    }

    const DAILY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801
";

    const HOURLY_CSV: &str = "\
instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0.0,3,13,16
2,2011-01-01,1,0,1,1,0,6,0,1,0.22,0.2727,0.80,0.0,8,32,40
";

    #[test]
    fn parses_daily_rows() {
        let rows = parse_daily(reader_from(DAILY_CSV), "day.csv", None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(rows[0].season_code, 1);
        assert_eq!(rows[0].weather_code, 2);
        assert_eq!(rows[0].count, 985);
        assert!((rows[0].temp - 0.344167).abs() < 1e-12);
        assert_eq!(rows[0].extras.casual, Some(331));
        assert_eq!(rows[0].extras.registered, Some(654));
    }

    #[test]
    fn parses_hourly_rows() {
        let rows = parse_hourly(reader_from(HOURLY_CSV), "hour.csv", None).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].hour, 0);
        assert_eq!(rows[1].hour, 1);
        assert_eq!(rows[0].working_day_code, 0);
        assert_eq!(rows[1].count, 40);
    }

    #[test]
    fn limit_caps_rows_read() {
        let rows = parse_daily(reader_from(DAILY_CSV), "day.csv", Some(1)).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "dteday,season,yr\n2011-01-01,1,0\n";
        let err = parse_daily(reader_from(csv), "day.csv", None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("weathersit"));
    }

    #[test]
    fn malformed_row_is_fatal_with_line_number() {
        let csv = "\
dteday,season,yr,weathersit,temp,cnt
2011-01-01,1,0,1,0.3,985
2011-01-02,1,0,1,not-a-number,801
";
        let err = parse_daily(reader_from(csv), "day.csv", None).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("day.csv:3"));
        assert!(err.to_string().contains("temp"));
    }

    #[test]
    fn hour_out_of_range_is_fatal() {
        let csv = "\
dteday,season,yr,weathersit,temp,cnt,hr,workingday
2011-01-01,1,0,1,0.3,16,24,0
";
        let err = parse_hourly(reader_from(csv), "hour.csv", None).unwrap_err();
        assert!(err.to_string().contains("hr"));
    }

    #[test]
    fn bom_header_is_tolerated() {
        let csv = "\u{feff}dteday,season,yr,weathersit,temp,cnt\n2011-01-01,1,0,1,0.3,985\n";
        let rows = parse_daily(reader_from(csv), "day.csv", None).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
