//! Categorical normalization.
//!
//! Applied exactly once, at load time:
//!
//! - `season` {1,2,3,4} -> {Winter, Spring, Summer, Fall}
//! - `weathersit` {1,2,3,4} -> {Clear/Cloudy, Mist, Light Rain/Snow, Heavy Rain/Snow}
//! - `workingday` {0,1} -> {Non Working Day, Working Day} (hourly only)
//! - `hr` shifted by +1 so values range 1-24 instead of 0-23 (hourly only)
//!
//! Codes outside the known sets pass through as `Coded::Raw`; they still group
//! and display, just without a label. Render passes only read the normalized
//! records and never re-derive them.

use crate::domain::{Coded, DailyRecord, HourlyRecord};
use crate::io::ingest::{RawDailyRow, RawHourlyRow};

/// Shift a raw CSV hour (0-23) to the display hour (1-24).
pub fn shift_hour(raw: u8) -> u8 {
    raw + 1
}

/// Recode one raw daily row into its normalized form.
pub fn normalize_daily_row(row: RawDailyRow) -> DailyRecord {
    DailyRecord {
        date: row.date,
        yr: row.yr,
        season: Coded::from_code(row.season_code),
        weather: Coded::from_code(row.weather_code),
        temp: row.temp,
        count: row.count,
        extras: row.extras,
    }
}

/// Recode one raw hourly row into its normalized form.
pub fn normalize_hourly_row(row: RawHourlyRow) -> HourlyRecord {
    HourlyRecord {
        date: row.date,
        yr: row.yr,
        season: Coded::from_code(row.season_code),
        weather: Coded::from_code(row.weather_code),
        working_day: Coded::from_code(row.working_day_code),
        hour: shift_hour(row.hour),
        temp: row.temp,
        count: row.count,
        extras: row.extras,
    }
}

pub fn normalize_daily(rows: Vec<RawDailyRow>) -> Vec<DailyRecord> {
    rows.into_iter().map(normalize_daily_row).collect()
}

pub fn normalize_hourly(rows: Vec<RawHourlyRow>) -> Vec<HourlyRecord> {
    rows.into_iter().map(normalize_hourly_row).collect()
}
