//! Shared "view pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (memoized) -> read selection -> run the aggregate queries -> view model
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! `build_view` is pure and cheap; it is recomputed in full on every filter
//! change, with caching happening only at the load boundary.

use serde::Serialize;

use crate::agg::{
    CategoryMean, Extremes, HourMean, SeasonRankRow, WeatherOccurrences, day_extremes,
    hour_extremes, hour_means, season_ranking, total_season, total_year, weather_means,
    weather_occurrences, working_day_means,
};
use crate::data::store::Datasets;
use crate::domain::{DatasetStats, Selection, Weather, WorkingDay};

/// Everything a render pass displays, computed from one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub selection: Selection,
    pub daily_stats: DatasetStats,
    pub hourly_stats: DatasetStats,

    /// "Best Season" ranking table (daily, year scope).
    pub season_ranking: Vec<SeasonRankRow>,
    /// Weather-based bar chart (hourly, year+season scope).
    pub weather_means: Vec<CategoryMean<Weather>>,
    /// Hour-based bar chart (hourly, year+season scope).
    pub hour_means: Vec<HourMean>,
    /// "Total Year" metric (daily, year scope).
    pub total_year: i64,
    /// "Total Season" metric (daily, year+season scope).
    pub total_season: i64,
    /// "Peak/Lowest Day" metrics (daily, year scope).
    pub day_extremes: Extremes,
    /// "Peak/Lowest Hour" metrics (hourly, year scope).
    pub hour_extremes: Extremes,
    /// Four weather-occurrence metrics (hourly, year+season+hour scope).
    pub weather_occurrences: WeatherOccurrences,
    /// Working-day comparison chart (hourly, year+season+hour scope).
    pub working_day_means: Vec<CategoryMean<WorkingDay>>,
}

/// Run all aggregate queries for one selection.
pub fn build_view(datasets: &Datasets, selection: Selection) -> ViewModel {
    let daily = &datasets.daily.records;
    let hourly = &datasets.hourly.records;
    let sel = &selection;

    ViewModel {
        selection,
        daily_stats: datasets.daily.stats.clone(),
        hourly_stats: datasets.hourly.stats.clone(),
        season_ranking: season_ranking(daily, sel),
        weather_means: weather_means(hourly, sel),
        hour_means: hour_means(hourly, sel),
        total_year: total_year(daily, sel),
        total_season: total_season(daily, sel),
        day_extremes: day_extremes(daily, sel),
        hour_extremes: hour_extremes(hourly, sel),
        weather_occurrences: weather_occurrences(hourly, sel),
        working_day_means: working_day_means(hourly, sel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::store::{DailyDataset, HourlyDataset};
    use crate::domain::{Coded, DailyRecord, HourlyRecord, RecordExtras, Season, Year};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn datasets() -> Datasets {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let daily = vec![
            DailyRecord {
                date,
                yr: 0,
                season: Coded::from_code(1),
                weather: Coded::from_code(1),
                temp: 0.5,
                count: 100,
                extras: RecordExtras::default(),
            },
            DailyRecord {
                date,
                yr: 0,
                season: Coded::from_code(1),
                weather: Coded::from_code(2),
                temp: 0.7,
                count: 200,
                extras: RecordExtras::default(),
            },
        ];
        let hourly = vec![HourlyRecord {
            date,
            yr: 0,
            season: Coded::from_code(1),
            weather: Coded::from_code(1),
            working_day: Coded::from_code(1),
            hour: 5,
            temp: 0.5,
            count: 40,
            extras: RecordExtras::default(),
        }];

        let daily_stats = crate::domain::DatasetStats {
            rows: daily.len(),
            first_date: Some(date),
            last_date: Some(date),
            count_min: Some(100),
            count_max: Some(200),
        };
        let hourly_stats = crate::domain::DatasetStats {
            rows: hourly.len(),
            first_date: Some(date),
            last_date: Some(date),
            count_min: Some(40),
            count_max: Some(40),
        };

        Datasets {
            daily: Arc::new(DailyDataset {
                records: daily,
                stats: daily_stats,
            }),
            hourly: Arc::new(HourlyDataset {
                records: hourly,
                stats: hourly_stats,
            }),
        }
    }

    #[test]
    fn build_view_assembles_all_queries() {
        let datasets = datasets();
        let selection = Selection {
            year: Year::Y2011,
            hour: 5,
            season: Season::Winter,
        };

        let view = build_view(&datasets, selection);
        assert_eq!(view.total_year, 300);
        assert_eq!(view.total_season, 300);
        assert_eq!(view.season_ranking.len(), 1);
        assert!((view.season_ranking[0].mean_count - 150.0).abs() < 1e-9);
        assert!((view.season_ranking[0].mean_temp_display - 15.4).abs() < 1e-9);
        assert_eq!(view.day_extremes.max, Some(200));
        assert_eq!(view.hour_extremes.max, Some(40));
        assert_eq!(view.weather_occurrences.clear_cloudy, 1);
        assert_eq!(view.working_day_means.len(), 1);
        assert_eq!(view.daily_stats.rows, 2);
    }

    #[test]
    fn build_view_on_unmatched_selection_renders_empty() {
        let datasets = datasets();
        let selection = Selection {
            year: Year::Y2012,
            hour: 12,
            season: Season::Fall,
        };

        let view = build_view(&datasets, selection);
        assert_eq!(view.total_year, 0);
        assert!(view.season_ranking.is_empty());
        assert!(view.hour_means.is_empty());
        assert_eq!(view.day_extremes.max, None);
        assert_eq!(view.weather_occurrences.total(), 0);
    }
}
