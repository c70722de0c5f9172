//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON
//! - reused by both the text report and the TUI

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A category whose raw CSV representation is a small integer code.
pub trait Category: Sized + Copy {
    /// Map a raw integer code to a category, if the code is in the known set.
    fn from_code(code: i64) -> Option<Self>;
    /// The raw integer code this category was mapped from.
    fn code(&self) -> i64;
    /// Human-readable label used in tables, metrics, and chart axes.
    fn label(&self) -> &'static str;
}

/// A categorical cell that keeps unmapped codes intact.
///
/// The recode tables are total over the *known* code sets; anything outside
/// them passes through as its original numeric value rather than failing.
/// Pass-through cells still participate in grouping (they form their own
/// groups) and display as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coded<T> {
    Label(T),
    Raw(i64),
}

impl<T: Category> Coded<T> {
    pub fn from_code(code: i64) -> Self {
        match T::from_code(code) {
            Some(label) => Coded::Label(label),
            None => Coded::Raw(code),
        }
    }

    /// Re-apply the recode table.
    ///
    /// Labels are already mapped and stay untouched, so recoding is idempotent;
    /// a raw cell is mapped only if its code is in the known set.
    pub fn recode(self) -> Self {
        match self {
            Coded::Raw(code) => Self::from_code(code),
            label => label,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Coded::Label(label) => label.label().to_string(),
            Coded::Raw(code) => code.to_string(),
        }
    }

    /// Deterministic ordering key: labelled categories in code order first,
    /// pass-through codes after them.
    pub fn sort_rank(&self) -> (u8, i64) {
        match self {
            Coded::Label(label) => (0, label.code()),
            Coded::Raw(code) => (1, *code),
        }
    }
}

/// Season of the year, recoded from {1,2,3,4}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn next(self) -> Self {
        match self {
            Season::Winter => Season::Spring,
            Season::Spring => Season::Summer,
            Season::Summer => Season::Fall,
            Season::Fall => Season::Winter,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Season::Winter => Season::Fall,
            Season::Spring => Season::Winter,
            Season::Summer => Season::Spring,
            Season::Fall => Season::Summer,
        }
    }
}

impl Category for Season {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Season::Winter),
            2 => Some(Season::Spring),
            3 => Some(Season::Summer),
            4 => Some(Season::Fall),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            Season::Winter => 1,
            Season::Spring => 2,
            Season::Summer => 3,
            Season::Fall => 4,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// Weather situation, recoded from {1,2,3,4}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    ClearCloudy,
    Mist,
    LightRainSnow,
    HeavyRainSnow,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::ClearCloudy,
        Weather::Mist,
        Weather::LightRainSnow,
        Weather::HeavyRainSnow,
    ];
}

impl Category for Weather {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weather::ClearCloudy),
            2 => Some(Weather::Mist),
            3 => Some(Weather::LightRainSnow),
            4 => Some(Weather::HeavyRainSnow),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            Weather::ClearCloudy => 1,
            Weather::Mist => 2,
            Weather::LightRainSnow => 3,
            Weather::HeavyRainSnow => 4,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Weather::ClearCloudy => "Clear/Cloudy",
            Weather::Mist => "Mist",
            Weather::LightRainSnow => "Light Rain/Snow",
            Weather::HeavyRainSnow => "Heavy Rain/Snow",
        }
    }
}

/// Working-day flag, recoded from {0,1}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkingDay {
    NonWorking,
    Working,
}

impl Category for WorkingDay {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(WorkingDay::NonWorking),
            1 => Some(WorkingDay::Working),
            _ => None,
        }
    }

    fn code(&self) -> i64 {
        match self {
            WorkingDay::NonWorking => 0,
            WorkingDay::Working => 1,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            WorkingDay::NonWorking => "Non Working Day",
            WorkingDay::Working => "Working Day",
        }
    }
}

/// Calendar year covered by the datasets.
///
/// The CSVs store a 0/1 year index; the user-facing selection is the calendar
/// year, converted back to the index before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Year {
    #[serde(rename = "2011")]
    #[value(name = "2011")]
    Y2011,
    #[serde(rename = "2012")]
    #[value(name = "2012")]
    Y2012,
}

impl Year {
    pub const ALL: [Year; 2] = [Year::Y2011, Year::Y2012];

    /// The 0/1 index stored in the `yr` column.
    pub fn index(self) -> i64 {
        match self {
            Year::Y2011 => 0,
            Year::Y2012 => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Year::Y2011 => "2011",
            Year::Y2012 => "2012",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Year::Y2011 => Year::Y2012,
            Year::Y2012 => Year::Y2011,
        }
    }

    pub fn prev(self) -> Self {
        self.next()
    }
}

/// Pass-through columns of the bike-sharing schema.
///
/// Nothing in the aggregate queries consumes these; they are parsed when
/// present and carried so exports can reproduce the source rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordExtras {
    pub holiday: Option<i64>,
    pub weekday: Option<i64>,
    pub month: Option<i64>,
    pub atemp: Option<f64>,
    pub hum: Option<f64>,
    pub windspeed: Option<f64>,
    pub casual: Option<i64>,
    pub registered: Option<i64>,
}

/// One normalized row of the daily dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Year index as stored in the CSV (0 = 2011, 1 = 2012).
    pub yr: i64,
    pub season: Coded<Season>,
    pub weather: Coded<Weather>,
    /// Normalized temperature in [0, 1] per the dataset's documented scaling.
    pub temp: f64,
    /// Total rental count for the day.
    pub count: i64,
    pub extras: RecordExtras,
}

/// One normalized row of the hourly dataset.
#[derive(Debug, Clone, Serialize)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub yr: i64,
    pub season: Coded<Season>,
    pub weather: Coded<Weather>,
    pub working_day: Coded<WorkingDay>,
    /// Hour of day, 1-24 after normalization (the raw CSV uses 0-23).
    pub hour: u8,
    pub temp: f64,
    pub count: i64,
    pub extras: RecordExtras,
}

/// Summary stats about one loaded dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub count_min: Option<i64>,
    pub count_max: Option<i64>,
}

/// The user-controlled filter triple scoping every aggregate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub year: Year,
    /// Display hour in 1-24 (matches the normalized `hour` column).
    pub hour: u8,
    pub season: Season,
}

impl Selection {
    pub fn year_index(&self) -> i64 {
        self.year.index()
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub daily_path: PathBuf,
    pub hourly_path: PathBuf,
    /// Optional row cap applied at load time (part of the memoization key).
    pub limit: Option<usize>,
    pub selection: Selection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_codes_roundtrip() {
        for (code, season) in [(1, Season::Winter), (2, Season::Spring), (3, Season::Summer), (4, Season::Fall)] {
            assert_eq!(Season::from_code(code), Some(season));
        }
        assert_eq!(Season::from_code(0), None);
        assert_eq!(Season::from_code(5), None);
    }

    #[test]
    fn weather_labels() {
        assert_eq!(Weather::ClearCloudy.label(), "Clear/Cloudy");
        assert_eq!(Weather::HeavyRainSnow.label(), "Heavy Rain/Snow");
        assert_eq!(Weather::from_code(99), None);
    }

    #[test]
    fn coded_passthrough_displays_raw_code() {
        let cell: Coded<Season> = Coded::from_code(7);
        assert_eq!(cell, Coded::Raw(7));
        assert_eq!(cell.display(), "7");
    }

    #[test]
    fn recode_is_idempotent() {
        let mapped: Coded<Season> = Coded::from_code(2);
        assert_eq!(mapped.recode(), mapped);
        assert_eq!(mapped.recode().recode(), mapped);

        let raw: Coded<Season> = Coded::Raw(9);
        assert_eq!(raw.recode(), raw);
    }

    #[test]
    fn year_index_matches_selection_arithmetic() {
        // 2011 - 2011 = 0, 2012 - 2011 = 1.
        assert_eq!(Year::Y2011.index(), 0);
        assert_eq!(Year::Y2012.index(), 1);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Year::Y2012.next(), Year::Y2011);
        assert_eq!(Season::Fall.next(), Season::Winter);
        assert_eq!(Season::Winter.prev(), Season::Fall);
    }
}
