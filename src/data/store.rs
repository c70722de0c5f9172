//! Memoized dataset store.
//!
//! Every render pass re-reads the user's filter selection, but the datasets
//! themselves are static files. The store loads each `(path, row-limit)` pair
//! once per process, normalizes it, and hands out `Arc`-shared immutable
//! datasets on every subsequent request.
//!
//! The store is single-threaded by design (the whole dashboard is); no locking
//! is needed because there is no concurrent mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::normalize::{normalize_daily, normalize_hourly};
use crate::domain::{DailyRecord, DatasetStats, HourlyRecord, ViewConfig};
use crate::error::AppError;
use crate::io::ingest::{read_daily_csv, read_hourly_csv};

/// A loaded, normalized daily dataset plus its summary stats.
#[derive(Debug)]
pub struct DailyDataset {
    pub records: Vec<DailyRecord>,
    pub stats: DatasetStats,
}

/// A loaded, normalized hourly dataset plus its summary stats.
#[derive(Debug)]
pub struct HourlyDataset {
    pub records: Vec<HourlyRecord>,
    pub stats: DatasetStats,
}

/// The pair of datasets a render pass works from.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub daily: Arc<DailyDataset>,
    pub hourly: Arc<HourlyDataset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StoreKey {
    path: PathBuf,
    limit: Option<usize>,
}

/// Memoized loader keyed by `(path, row-limit)`.
#[derive(Debug, Default)]
pub struct DataStore {
    daily: HashMap<StoreKey, Arc<DailyDataset>>,
    hourly: HashMap<StoreKey, Arc<HourlyDataset>>,
    file_reads: usize,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actual file reads performed (cache misses).
    pub fn file_reads(&self) -> usize {
        self.file_reads
    }

    /// Drop all cached datasets; the next load re-reads from disk.
    pub fn clear(&mut self) {
        self.daily.clear();
        self.hourly.clear();
    }

    pub fn load_daily(
        &mut self,
        path: &Path,
        limit: Option<usize>,
    ) -> Result<Arc<DailyDataset>, AppError> {
        let key = StoreKey {
            path: path.to_path_buf(),
            limit,
        };
        if let Some(dataset) = self.daily.get(&key) {
            return Ok(Arc::clone(dataset));
        }

        self.file_reads += 1;
        let records = normalize_daily(read_daily_csv(path, limit)?);
        let stats = daily_stats(&records);
        let dataset = Arc::new(DailyDataset { records, stats });
        self.daily.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn load_hourly(
        &mut self,
        path: &Path,
        limit: Option<usize>,
    ) -> Result<Arc<HourlyDataset>, AppError> {
        let key = StoreKey {
            path: path.to_path_buf(),
            limit,
        };
        if let Some(dataset) = self.hourly.get(&key) {
            return Ok(Arc::clone(dataset));
        }

        self.file_reads += 1;
        let records = normalize_hourly(read_hourly_csv(path, limit)?);
        let stats = hourly_stats(&records);
        let dataset = Arc::new(HourlyDataset { records, stats });
        self.hourly.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Load both datasets named by the run configuration.
    pub fn load_datasets(&mut self, config: &ViewConfig) -> Result<Datasets, AppError> {
        let daily = self.load_daily(&config.daily_path, config.limit)?;
        let hourly = self.load_hourly(&config.hourly_path, config.limit)?;
        Ok(Datasets { daily, hourly })
    }
}

fn daily_stats(records: &[DailyRecord]) -> DatasetStats {
    stats_over(records.iter().map(|r| (r.date, r.count)))
}

fn hourly_stats(records: &[HourlyRecord]) -> DatasetStats {
    stats_over(records.iter().map(|r| (r.date, r.count)))
}

fn stats_over(rows: impl Iterator<Item = (chrono::NaiveDate, i64)>) -> DatasetStats {
    let mut stats = DatasetStats {
        rows: 0,
        first_date: None,
        last_date: None,
        count_min: None,
        count_max: None,
    };

    for (date, count) in rows {
        stats.rows += 1;
        stats.first_date = Some(stats.first_date.map_or(date, |d| d.min(date)));
        stats.last_date = Some(stats.last_date.map_or(date, |d| d.max(date)));
        stats.count_min = Some(stats.count_min.map_or(count, |c| c.min(count)));
        stats.count_max = Some(stats.count_max.map_or(count, |c| c.max(count)));
    }

    stats
}
