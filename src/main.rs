/*!
 * Command-line interface for bulkpaste
 */

use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn};

use bulkpaste::config::{Args, Config, MAX_PAUSE_MS};
use bulkpaste::report::{ReportFormat, Reporter};
use bulkpaste::{run, BulkPasteError, SystemClipboard};

/// Exit code when nothing could be copied
const EXIT_NOTHING_COPIED: u8 = 2;
/// Exit code when the clipboard write failed
const EXIT_CLIPBOARD_FAILED: u8 = 3;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args = Args::parse();

    if args.paths.is_empty() {
        println!("bulkpaste {}", bulkpaste::VERSION);
        println!("No files provided.");
        // Printing help only fails if stdout is gone
        let _ = Args::command().print_help();
        thread::sleep(Duration::from_millis(args.pause_ms.min(MAX_PAUSE_MS)));
        return ExitCode::SUCCESS;
    }

    let config = match Config::from_args(args).and_then(|c| c.validate().map(|()| c)) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.set_prefix("📋 Collecting");
    let progress = Arc::new(progress);

    let (report, result) = run(&config, &SystemClipboard, Arc::clone(&progress));
    progress.finish_and_clear();

    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(BulkPasteError::NothingToCopy) => {
            warn!("{}", BulkPasteError::NothingToCopy);
            ExitCode::from(EXIT_NOTHING_COPIED)
        }
        Err(e) => {
            error!("Failed to update clipboard: {}", e);
            ExitCode::from(EXIT_CLIPBOARD_FAILED)
        }
    };

    if config.show_report {
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    if !config.pause.is_zero() {
        thread::sleep(config.pause);
    }

    code
}
