//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the two datasets (memoized)
//! - computes the dashboard view model
//! - prints the report / launches the TUI / writes exports

use clap::Parser;

use crate::cli::{Command, ExportArgs, ViewArgs};
use crate::data::store::DataStore;
use crate::domain::{Selection, ViewConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `bikedash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `bikedash` and `bikedash -y 2012` to behave like `bikedash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(args),
        Command::Report(args) => handle_report(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_report(args: ViewArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args);
    let mut store = DataStore::new();
    let datasets = store.load_datasets(&config)?;
    let view = pipeline::build_view(&datasets, config.selection);

    println!("{}", crate::report::format_dashboard(&view));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args.view);
    let mut store = DataStore::new();
    let datasets = store.load_datasets(&config)?;
    let view = pipeline::build_view(&datasets, config.selection);

    crate::io::export::write_view_json(&args.out, &view)?;
    println!("Wrote view JSON: {}", args.out.display());
    Ok(())
}

pub fn view_config_from_args(args: &ViewArgs) -> ViewConfig {
    ViewConfig {
        daily_path: args.daily.clone(),
        hourly_path: args.hourly.clone(),
        limit: args.limit,
        selection: Selection {
            year: args.year,
            hour: args.hour,
            season: args.season,
        },
    }
}

/// Rewrite argv so `bikedash` defaults to `bikedash tui`.
///
/// Rules:
/// - `bikedash`                    -> `bikedash tui`
/// - `bikedash -y 2012 ...`        -> `bikedash tui -y 2012 ...`
/// - `bikedash --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["bikedash"])), argv(&["bikedash", "tui"]));
    }

    #[test]
    fn leading_flag_routes_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["bikedash", "-y", "2012"])),
            argv(&["bikedash", "tui", "-y", "2012"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["bikedash", "report"])),
            argv(&["bikedash", "report"])
        );
        assert_eq!(
            rewrite_args(argv(&["bikedash", "--help"])),
            argv(&["bikedash", "--help"])
        );
    }
}
