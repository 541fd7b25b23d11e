//! Photo Sorter - un-nest a photo directory and sort it by day
//!
//! Flattens nested subdirectories, then moves photos into date-named
//! folders based on their EXIF capture date.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use photo_sorter::metadata::exif::read_tags;
use photo_sorter::{Cli, PhotoSorter, RunSummary};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// CLI Output Module
mod cli_output {
    //! Colour and layout helpers for console output.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colours
    pub struct CliTheme;

    impl CliTheme {
        pub const SUCCESS: Color = Color::Green;
        pub const WARNING: Color = Color::Yellow;
        pub const ERROR: Color = Color::Red;
        pub const HINT: Color = Color::DarkGrey;
        pub const ACCENT: Color = Color::Cyan;
    }

    pub fn print_separator() {
        let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
    }

    /// Print a centred title
    pub fn print_title(title: &str) {
        let padding = 60usize.saturating_sub(title.len()) / 2;
        let left_pad = " ".repeat(padding);
        let _ = stdout().execute(Print(format!("{}{}\n", left_pad, title.bold())));
    }

    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a key/value pair, value bold unless coloured
    pub fn print_key_value(key: &str, value: &str, value_color: Option<Color>) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = match value_color {
            Some(color) => style(value).with(color),
            None => style(value).bold(),
        };
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    pub fn print_stat(key: &str, value: &str, color: Color) {
        print_key_value(key, value, Some(color));
    }

    pub fn print_item(msg: &str) {
        let _ = stdout().execute(Print(format!("    - {}\n", msg)));
    }

    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_path = cli.log_dir.as_deref().map(get_log_path);
    let _guard = setup_logging(&cli, log_path.as_deref())?;

    info!(version = env!("CARGO_PKG_VERSION"), "Photo Sorter starting");

    if let Some(ref image) = cli.inspect {
        inspect(image)?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(config) = cli.to_config() else {
        anyhow::bail!("No directory given");
    };

    if config.verbose {
        info!(?config, "Configuration loaded");
    }

    let json_summary = config.json_summary;
    let sorter = PhotoSorter::new(config);

    match sorter.run() {
        Ok(summary) => {
            if json_summary {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
            if let Some(ref path) = log_path {
                info!(log_file = %path.display(), "Log saved to");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // return rather than exit so the log guard flushes on drop
            error!(error = %e, "Sorting failed");
            eprintln!("Error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print every EXIF tag of one image
fn inspect(image: &Path) -> Result<()> {
    for (tag, value) in read_tags(image)? {
        println!("Key: {}, Value: {}", tag, value);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    use cli_output::*;

    let counters = &summary.flatten.counters;

    print_separator();
    print_title("Photo sorting complete");
    print_separator();

    print_blank();
    print_hint("Un-nesting");
    print_stat("Files un-nested", &counters.moved.to_string(), CliTheme::SUCCESS);
    print_stat("Empty folders deleted", &counters.deleted.to_string(), CliTheme::SUCCESS);
    print_stat("Files not moved", &counters.failed_moves.to_string(), CliTheme::ERROR);
    print_stat("Folders left unempty", &counters.failed_deletes.to_string(), CliTheme::WARNING);
    for failed in &summary.flatten.failures {
        print_item(&format!("{}: {}", failed.source.display(), failed.reason));
    }

    print_blank();
    print_hint("Indexing");
    print_key_value("Photos found", &summary.photos_found.to_string(), None);
    print_key_value("Different days", &summary.distinct_dates.to_string(), None);

    print_blank();
    print_hint("Sorting");
    print_stat("Photos sorted", &summary.files_sorted().to_string(), CliTheme::SUCCESS);
    print_stat("Folders created", &summary.folders_created().to_string(), CliTheme::ACCENT);
    for failed in &summary.folderize.failures {
        print_item(&format!("{}: {}", failed.source.display(), failed.reason));
    }

    if !summary.folderize.skipped.is_empty() {
        print_blank();
        print_warning(&format!(
            "Skipped days with fewer photos than the threshold of {}:",
            summary.threshold
        ));
        for tally in &summary.folderize.skipped {
            print_item(&tally.to_string());
        }
    }

    if !summary.skipped_files.is_empty() {
        print_blank();
        print_warning("Skipped files with a missing or bad date:");
        for path in &summary.skipped_files {
            print_item(&path.display().to_string());
        }
    }

    print_blank();
    print_key_value(
        "Elapsed",
        &format!("{:.3}s", summary.elapsed.as_secs_f64()),
        None,
    );
    print_separator();
}

/// Timestamped log file path inside `log_dir`
fn get_log_path(log_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("PhotoSort_{}.log", timestamp))
}

/// Setup logging (console, plus file when a log path is given)
fn setup_logging(cli: &Cli, log_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    let Some(log_path) = log_path else {
        subscriber.init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .init();
    }

    Ok(Some(guard))
}
