//! Command-line parsing for the bike-sharing dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the data/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{Season, Year};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bikedash", version, about = "Bike Sharing Dashboard (terminal)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying view pipeline as `bikedash report`, but
    /// renders the dashboard in a terminal UI using Ratatui.
    Tui(ViewArgs),
    /// Print the dashboard (tables, charts, metrics) as plain text.
    Report(ViewArgs),
    /// Compute the dashboard view and write it to a JSON file.
    Export(ExportArgs),
}

/// Dataset paths plus the three filter selections.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// Path to the daily dataset CSV.
    #[arg(long, default_value = "dataset/day.csv")]
    pub daily: PathBuf,

    /// Path to the hourly dataset CSV.
    #[arg(long, default_value = "dataset/hour.csv")]
    pub hourly: PathBuf,

    /// Load at most N data rows from each file.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Year selection.
    #[arg(short = 'y', long, value_enum, default_value_t = Year::Y2011)]
    pub year: Year,

    /// Hour selection (1-24, matching the shifted hour column).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=24))]
    pub hour: u8,

    /// Season selection.
    #[arg(short = 's', long, value_enum, default_value_t = Season::Winter)]
    pub season: Season,
}

/// Options for the JSON export.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output path for the view JSON.
    #[arg(short = 'o', long, default_value = "dashboard_view.json")]
    pub out: PathBuf,
}
