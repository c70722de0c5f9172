//! The named aggregate queries behind the dashboard widgets.
//!
//! Each query is a pure function of (records, selection). Filters:
//!
//! - year scope: `yr == selection.year_index()`
//! - season scope: the year scope plus `season == selection.season`
//! - hour scope: the season scope plus `hour == selection.hour`
//!
//! Empty filtered subsets degrade per the usual numeric conventions (sum = 0,
//! max/min = none); no query fails on an empty subset.

use serde::Serialize;

use crate::agg::group::{MeanAcc, group_fold, group_mean};
use crate::domain::{Coded, DailyRecord, HourlyRecord, Season, Selection, Weather, WorkingDay};

/// One row of the "Best Season" ranking table.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonRankRow {
    pub season: Coded<Season>,
    /// Average daily rental count across the season's days.
    pub mean_count: f64,
    /// Average temperature, already rescaled for display.
    pub mean_temp_display: f64,
}

/// Mean rental count for one category group.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryMean<T> {
    pub category: Coded<T>,
    pub mean_count: f64,
}

/// Mean rental count for one display hour (1-24).
#[derive(Debug, Clone, Serialize)]
pub struct HourMean {
    pub hour: u8,
    pub mean_count: f64,
}

/// Max/min rental count over a filtered subset; `None` when the subset is empty.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Extremes {
    pub max: Option<i64>,
    pub min: Option<i64>,
}

/// Row counts per weather category at a fixed (year, season, hour).
///
/// All four categories are always present, zero-filled where no rows matched.
/// Pass-through weather codes are outside the four metrics and do not
/// contribute.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct WeatherOccurrences {
    pub clear_cloudy: u64,
    pub mist: u64,
    pub light_rain_snow: u64,
    pub heavy_rain_snow: u64,
}

impl WeatherOccurrences {
    pub fn get(&self, weather: Weather) -> u64 {
        match weather {
            Weather::ClearCloudy => self.clear_cloudy,
            Weather::Mist => self.mist,
            Weather::LightRainSnow => self.light_rain_snow,
            Weather::HeavyRainSnow => self.heavy_rain_snow,
        }
    }

    pub fn total(&self) -> u64 {
        self.clear_cloudy + self.mist + self.light_rain_snow + self.heavy_rain_snow
    }

    /// All four categories in code order, zero-filled where absent.
    pub fn iter(&self) -> impl Iterator<Item = (Weather, u64)> + '_ {
        Weather::ALL.into_iter().map(|w| (w, self.get(w)))
    }
}

fn daily_year<'a>(
    daily: &'a [DailyRecord],
    sel: &'a Selection,
) -> impl Iterator<Item = &'a DailyRecord> {
    let year = sel.year_index();
    daily.iter().filter(move |r| r.yr == year)
}

fn hourly_year<'a>(
    hourly: &'a [HourlyRecord],
    sel: &'a Selection,
) -> impl Iterator<Item = &'a HourlyRecord> {
    let year = sel.year_index();
    hourly.iter().filter(move |r| r.yr == year)
}

fn hourly_year_season<'a>(
    hourly: &'a [HourlyRecord],
    sel: &'a Selection,
) -> impl Iterator<Item = &'a HourlyRecord> {
    let season = Coded::Label(sel.season);
    hourly_year(hourly, sel).filter(move |r| r.season == season)
}

fn hourly_year_season_hour<'a>(
    hourly: &'a [HourlyRecord],
    sel: &'a Selection,
) -> impl Iterator<Item = &'a HourlyRecord> {
    hourly_year_season(hourly, sel).filter(move |r| r.hour == sel.hour)
}

/// Season ranking (daily, year scope): per-season mean count and mean
/// temperature, sorted descending by mean count. Ties keep first-appearance
/// group order (the sort is stable).
pub fn season_ranking(daily: &[DailyRecord], sel: &Selection) -> Vec<SeasonRankRow> {
    #[derive(Default)]
    struct Accs {
        count: MeanAcc,
        temp: MeanAcc,
    }

    let groups = group_fold::<_, _, Accs>(
        daily_year(daily, sel),
        |r| r.season,
        |acc, r| {
            acc.count.push(r.count as f64);
            acc.temp.push(r.temp);
        },
    );

    let mut rows: Vec<SeasonRankRow> = groups
        .into_iter()
        .filter_map(|(season, accs)| {
            let mean_count = accs.count.mean()?;
            let mean_temp = accs.temp.mean()?;
            Some(SeasonRankRow {
                season,
                mean_count,
                // Display scaling is `t * 39 - 8`, not the dataset's documented
                // `t * 47 - 8` denormalization. Kept deliberately so the table
                // matches the dashboard's published numbers.
                mean_temp_display: mean_temp * 39.0 - 8.0,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.mean_count
            .partial_cmp(&a.mean_count)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

/// Weather-based hourly average (hourly, year+season scope).
pub fn weather_means(hourly: &[HourlyRecord], sel: &Selection) -> Vec<CategoryMean<Weather>> {
    let mut means: Vec<CategoryMean<Weather>> =
        group_mean(hourly_year_season(hourly, sel), |r| r.weather, |r| {
            r.count as f64
        })
        .into_iter()
        .map(|(category, mean_count)| CategoryMean {
            category,
            mean_count,
        })
        .collect();

    means.sort_by_key(|m| m.category.sort_rank());
    means
}

/// Hour-based hourly average (hourly, year+season scope), ascending by hour.
pub fn hour_means(hourly: &[HourlyRecord], sel: &Selection) -> Vec<HourMean> {
    let mut means: Vec<HourMean> =
        group_mean(hourly_year_season(hourly, sel), |r| r.hour, |r| {
            r.count as f64
        })
        .into_iter()
        .map(|(hour, mean_count)| HourMean { hour, mean_count })
        .collect();

    means.sort_by_key(|m| m.hour);
    means
}

/// Total rentals for the selected year (daily scope). Empty subset sums to 0.
pub fn total_year(daily: &[DailyRecord], sel: &Selection) -> i64 {
    daily_year(daily, sel).map(|r| r.count).sum()
}

/// Total rentals for the selected year and season (daily scope).
pub fn total_season(daily: &[DailyRecord], sel: &Selection) -> i64 {
    let season = Coded::Label(sel.season);
    daily_year(daily, sel)
        .filter(|r| r.season == season)
        .map(|r| r.count)
        .sum()
}

/// Peak/low daily count for the selected year.
pub fn day_extremes(daily: &[DailyRecord], sel: &Selection) -> Extremes {
    extremes(daily_year(daily, sel).map(|r| r.count))
}

/// Peak/low hourly count for the selected year.
pub fn hour_extremes(hourly: &[HourlyRecord], sel: &Selection) -> Extremes {
    extremes(hourly_year(hourly, sel).map(|r| r.count))
}

fn extremes(counts: impl Iterator<Item = i64>) -> Extremes {
    let mut out = Extremes::default();
    for count in counts {
        out.max = Some(out.max.map_or(count, |m| m.max(count)));
        out.min = Some(out.min.map_or(count, |m| m.min(count)));
    }
    out
}

/// Weather occurrence counts at the selected (year, season, hour).
pub fn weather_occurrences(hourly: &[HourlyRecord], sel: &Selection) -> WeatherOccurrences {
    let mut out = WeatherOccurrences::default();
    for r in hourly_year_season_hour(hourly, sel) {
        match r.weather {
            Coded::Label(Weather::ClearCloudy) => out.clear_cloudy += 1,
            Coded::Label(Weather::Mist) => out.mist += 1,
            Coded::Label(Weather::LightRainSnow) => out.light_rain_snow += 1,
            Coded::Label(Weather::HeavyRainSnow) => out.heavy_rain_snow += 1,
            Coded::Raw(_) => {}
        }
    }
    out
}

/// Working-day comparison at the selected (year, season, hour).
pub fn working_day_means(
    hourly: &[HourlyRecord],
    sel: &Selection,
) -> Vec<CategoryMean<WorkingDay>> {
    let mut means: Vec<CategoryMean<WorkingDay>> =
        group_mean(hourly_year_season_hour(hourly, sel), |r| r.working_day, |r| {
            r.count as f64
        })
        .into_iter()
        .map(|(category, mean_count)| CategoryMean {
            category,
            mean_count,
        })
        .collect();

    means.sort_by_key(|m| m.category.sort_rank());
    means
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordExtras, Year};
    use chrono::NaiveDate;

    fn day(yr: i64, season: i64, temp: f64, count: i64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2011 + yr as i32, 1, 1).unwrap(),
            yr,
            season: Coded::from_code(season),
            weather: Coded::from_code(1),
            temp,
            count,
            extras: RecordExtras::default(),
        }
    }

    fn hour_rec(yr: i64, season: i64, weather: i64, working: i64, hour: u8, count: i64) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(2011 + yr as i32, 1, 1).unwrap(),
            yr,
            season: Coded::from_code(season),
            weather: Coded::from_code(weather),
            working_day: Coded::from_code(working),
            hour,
            temp: 0.5,
            count,
            extras: RecordExtras::default(),
        }
    }

    fn sel(year: Year, hour: u8, season: Season) -> Selection {
        Selection { year, hour, season }
    }

    #[test]
    fn season_ranking_means_and_temp_scaling() {
        // year=2011, season=Winter: counts 100/200, temps 0.5/0.7.
        let daily = vec![
            day(0, 1, 0.5, 100),
            day(0, 1, 0.7, 200),
            day(1, 1, 0.9, 9999), // other year, excluded
        ];
        let rows = season_ranking(&daily, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].season, Coded::Label(Season::Winter));
        assert!((rows[0].mean_count - 150.0).abs() < 1e-9);
        // 0.6 * 39 - 8 = 15.4
        assert!((rows[0].mean_temp_display - 15.4).abs() < 1e-9);
    }

    #[test]
    fn season_ranking_sorts_descending_by_mean_count() {
        let daily = vec![
            day(0, 1, 0.3, 100),
            day(0, 3, 0.8, 500),
            day(0, 2, 0.5, 300),
        ];
        let rows = season_ranking(&daily, &sel(Year::Y2011, 1, Season::Winter));
        let order: Vec<Coded<Season>> = rows.iter().map(|r| r.season).collect();
        assert_eq!(
            order,
            vec![
                Coded::Label(Season::Summer),
                Coded::Label(Season::Spring),
                Coded::Label(Season::Winter),
            ]
        );
    }

    #[test]
    fn season_ranking_ties_keep_first_appearance_order() {
        let daily = vec![day(0, 2, 0.5, 100), day(0, 1, 0.5, 100)];
        let rows = season_ranking(&daily, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(rows[0].season, Coded::Label(Season::Spring));
        assert_eq!(rows[1].season, Coded::Label(Season::Winter));
    }

    #[test]
    fn season_ranking_groups_passthrough_codes() {
        let daily = vec![day(0, 9, 0.5, 100)];
        let rows = season_ranking(&daily, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(rows[0].season, Coded::Raw(9));
    }

    #[test]
    fn weather_means_scope_and_grouping() {
        let hourly = vec![
            hour_rec(0, 1, 1, 1, 5, 10),
            hour_rec(0, 1, 1, 1, 6, 30),
            hour_rec(0, 1, 2, 1, 5, 50),
            hour_rec(0, 2, 1, 1, 5, 999), // other season, excluded
            hour_rec(1, 1, 1, 1, 5, 999), // other year, excluded
        ];
        let means = weather_means(&hourly, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].category, Coded::Label(Weather::ClearCloudy));
        assert!((means[0].mean_count - 20.0).abs() < 1e-9);
        assert_eq!(means[1].category, Coded::Label(Weather::Mist));
        assert!((means[1].mean_count - 50.0).abs() < 1e-9);
    }

    #[test]
    fn hour_means_ascending() {
        let hourly = vec![
            hour_rec(0, 1, 1, 1, 7, 10),
            hour_rec(0, 1, 1, 1, 2, 20),
            hour_rec(0, 1, 1, 1, 7, 30),
        ];
        let means = hour_means(&hourly, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].hour, 2);
        assert_eq!(means[1].hour, 7);
        assert!((means[1].mean_count - 20.0).abs() < 1e-9);
    }

    #[test]
    fn totals_sum_counts() {
        let daily = vec![day(0, 1, 0.5, 100), day(0, 2, 0.5, 200), day(1, 1, 0.5, 400)];
        let s = sel(Year::Y2011, 1, Season::Winter);
        assert_eq!(total_year(&daily, &s), 300);
        assert_eq!(total_season(&daily, &s), 100);

        // Empty subsets sum to zero, not an error.
        let s2012 = sel(Year::Y2012, 1, Season::Fall);
        assert_eq!(total_season(&daily, &s2012), 0);
    }

    #[test]
    fn extremes_on_empty_subset_are_none() {
        let daily: Vec<DailyRecord> = vec![];
        let e = day_extremes(&daily, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(e.max, None);
        assert_eq!(e.min, None);
    }

    #[test]
    fn extremes_track_max_and_min() {
        let hourly = vec![
            hour_rec(0, 1, 1, 1, 5, 3),
            hour_rec(0, 2, 1, 1, 9, 70),
            hour_rec(0, 3, 1, 1, 9, 41),
        ];
        let e = hour_extremes(&hourly, &sel(Year::Y2011, 1, Season::Winter));
        assert_eq!(e.max, Some(70));
        assert_eq!(e.min, Some(3));
    }

    #[test]
    fn weather_occurrences_zero_fill_and_sum() {
        let hourly = vec![
            hour_rec(1, 3, 1, 1, 5, 10),
            hour_rec(1, 3, 1, 1, 5, 20),
            hour_rec(1, 3, 3, 1, 5, 30),
            hour_rec(1, 3, 2, 1, 6, 999), // other hour, excluded
        ];
        let s = sel(Year::Y2012, 5, Season::Summer);
        let occ = weather_occurrences(&hourly, &s);
        assert_eq!(occ.clear_cloudy, 2);
        assert_eq!(occ.mist, 0); // zero matching rows still reports 0
        assert_eq!(occ.light_rain_snow, 1);
        assert_eq!(occ.heavy_rain_snow, 0);
        assert_eq!(occ.iter().count(), 4);

        // Counts sum to the number of matching (year, season, hour) rows.
        let matched = hourly
            .iter()
            .filter(|r| r.yr == 1 && r.season == Coded::Label(Season::Summer) && r.hour == 5)
            .count() as u64;
        assert_eq!(occ.total(), matched);
    }

    #[test]
    fn working_day_means_split() {
        let hourly = vec![
            hour_rec(0, 1, 1, 1, 5, 100),
            hour_rec(0, 1, 1, 0, 5, 40),
            hour_rec(0, 1, 1, 1, 5, 200),
        ];
        let means = working_day_means(&hourly, &sel(Year::Y2011, 5, Season::Winter));
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].category, Coded::Label(WorkingDay::NonWorking));
        assert!((means[0].mean_count - 40.0).abs() < 1e-9);
        assert_eq!(means[1].category, Coded::Label(WorkingDay::Working));
        assert!((means[1].mean_count - 150.0).abs() < 1e-9);
    }
}
