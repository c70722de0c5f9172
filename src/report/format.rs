//! Text rendering of a `ViewModel`.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! The bar charts are rendered as scaled `#` bars so `bikedash report` remains
//! useful over plain stdout (pipes, CI logs) where the TUI is unavailable.

use crate::agg::{CategoryMean, Extremes, HourMean};
use crate::app::pipeline::ViewModel;
use crate::domain::{Category, DatasetStats};

const BAR_WIDTH: usize = 40;

/// Format the whole dashboard as plain text.
pub fn format_dashboard(view: &ViewModel) -> String {
    let mut out = String::new();
    let sel = &view.selection;

    out.push_str("=== Bike Sharing Dashboard ===\n");
    out.push_str(&format!(
        "Selection: year={} | hour={} | season={}\n",
        sel.year.label(),
        sel.hour,
        sel.season.label(),
    ));
    out.push_str(&format!("Daily:  {}\n", fmt_stats(&view.daily_stats)));
    out.push_str(&format!("Hourly: {}\n", fmt_stats(&view.hourly_stats)));

    out.push_str("\nBest Season\n");
    out.push_str(&format_season_table(view));

    out.push_str("\nWeather Based (avg hourly count)\n");
    out.push_str(&format_category_bars(&view.weather_means));

    out.push_str("\nHour Based (avg hourly count)\n");
    out.push_str(&format_hour_bars(&view.hour_means));

    out.push_str("\nTotal Bike Shared\n");
    out.push_str(&format!(
        "  Total Year:   {}\n  Total Season: {}\n",
        fmt_total_year(view.total_year),
        fmt_total_season(view.total_season),
    ));

    out.push_str("\nPeak & Low\n");
    out.push_str(&format!(
        "  Peak Day: {}  Lowest Day: {}  Peak Hour: {}  Lowest Hour: {}\n",
        fmt_extreme(view.day_extremes, Extreme::Max),
        fmt_extreme(view.day_extremes, Extreme::Min),
        fmt_extreme(view.hour_extremes, Extreme::Max),
        fmt_extreme(view.hour_extremes, Extreme::Min),
    ));

    out.push_str("\nWeather Occurrences\n");
    for (weather, count) in view.weather_occurrences.iter() {
        out.push_str(&format!("  {:<16} {count}\n", weather.label()));
    }

    out.push_str("\nWorking Day (avg count)\n");
    out.push_str(&format_category_bars(&view.working_day_means));

    out
}

/// "Total Year" metric: always rendered in millions.
pub fn fmt_total_year(total: i64) -> String {
    format!("{:.1}M", total as f64 / 1_000_000.0)
}

/// "Total Season" metric: always rendered in thousands.
pub fn fmt_total_season(total: i64) -> String {
    format!("{:.1}K", total as f64 / 1_000.0)
}

enum Extreme {
    Max,
    Min,
}

fn fmt_extreme(extremes: Extremes, which: Extreme) -> String {
    let value = match which {
        Extreme::Max => extremes.max,
        Extreme::Min => extremes.min,
    };
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn fmt_stats(stats: &DatasetStats) -> String {
    let range = match (stats.first_date, stats.last_date) {
        (Some(first), Some(last)) => format!("{first} .. {last}"),
        _ => "-".to_string(),
    };
    format!("rows={} | dates={range}", stats.rows)
}

fn format_season_table(view: &ViewModel) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<8} {:>12} {:>12}\n",
        "Season", "Avg Count", "Avg Temp"
    ));
    for row in &view.season_ranking {
        out.push_str(&format!(
            "  {:<8} {:>12.2} {:>12.2}\n",
            row.season.display(),
            row.mean_count,
            row.mean_temp_display,
        ));
    }
    if view.season_ranking.is_empty() {
        out.push_str("  (no matching days)\n");
    }
    out
}

fn format_category_bars<T: Category + Copy>(means: &[CategoryMean<T>]) -> String {
    let max = means.iter().map(|m| m.mean_count).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for m in means {
        out.push_str(&format!(
            "  {:<16} {} {:.2}\n",
            m.category.display(),
            bar(m.mean_count, max),
            m.mean_count,
        ));
    }
    if means.is_empty() {
        out.push_str("  (no matching hours)\n");
    }
    out
}

fn format_hour_bars(means: &[HourMean]) -> String {
    let max = means.iter().map(|m| m.mean_count).fold(0.0_f64, f64::max);
    let mut out = String::new();
    for m in means {
        out.push_str(&format!(
            "  {:>2} {} {:.2}\n",
            m.hour,
            bar(m.mean_count, max),
            m.mean_count,
        ));
    }
    if means.is_empty() {
        out.push_str("  (no matching hours)\n");
    }
    out
}

fn bar(value: f64, max: f64) -> String {
    if !(max > 0.0) || !value.is_finite() {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(cells.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_year_is_always_millions() {
        assert_eq!(fmt_total_year(2_500_000), "2.5M");
        assert_eq!(fmt_total_year(0), "0.0M");
        assert_eq!(fmt_total_year(1_234_567), "1.2M");
    }

    #[test]
    fn total_season_is_always_thousands() {
        assert_eq!(fmt_total_season(45_000), "45.0K");
        assert_eq!(fmt_total_season(0), "0.0K");
        assert_eq!(fmt_total_season(999), "1.0K");
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.0, 10.0), "");
        assert_eq!(bar(1.0, 0.0), "");
    }

    #[test]
    fn empty_extremes_render_as_dash() {
        let e = Extremes::default();
        assert_eq!(fmt_extreme(e, Extreme::Max), "-");
        let e = Extremes {
            max: Some(70),
            min: Some(3),
        };
        assert_eq!(fmt_extreme(e, Extreme::Max), "70");
        assert_eq!(fmt_extreme(e, Extreme::Min), "3");
    }
}
