/*!
 * bulkpaste - Copy the contents of many text files to the clipboard
 *
 * Input paths are expanded into candidate files, each text file is wrapped
 * with configurable pre/post messages and the joined result is written to
 * the system clipboard in a single call.
 */

pub mod aggregator;
pub mod classifier;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod pattern;
pub mod report;
pub mod types;
pub mod utils;
pub mod walker;


use std::sync::Arc;
use std::time::Instant;

use indicatif::ProgressBar;
use log::info;

pub use aggregator::{build_output, Aggregator, Bundle, Template, MAX_FILE_SIZE};
pub use clipboard::{ClipboardSink, MemoryClipboard, SystemClipboard};
pub use config::{Args, Config, Settings};
pub use error::{BulkPasteError, Result, SkipReason, Skipped};
pub use pattern::{matches, IgnoreSet};
pub use report::{ReportFormat, Reporter, RunReport};
pub use types::{CandidateFile, FileBlock, FileOutcome, SkipKind};
pub use walker::{Collection, PathWalker, MAX_FILE_COUNT};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Collect, aggregate and copy in one pass.
///
/// The clipboard is written once, and only when at least one file made it
/// into the output. The returned report covers the run either way.
pub fn run(
    config: &Config,
    sink: &dyn ClipboardSink,
    progress: Arc<ProgressBar>,
) -> (RunReport, Result<()>) {
    let start = Instant::now();

    let walker = PathWalker::new(config.ignore.clone(), Arc::clone(&progress));
    let collection = walker.collect(&config.inputs);

    progress.set_length(collection.candidates.len() as u64);
    let aggregator = Aggregator::new(
        config.pre_template.clone(),
        config.post_template.clone(),
        Arc::clone(&progress),
    );
    let bundle = aggregator.aggregate(&collection.candidates);
    let combined = bundle.combined();

    let mut report = RunReport::new(
        &bundle.blocks,
        collection.skipped.iter().chain(&bundle.skipped),
        collection.candidates.len(),
        combined.as_ref().map_or(0, String::len),
        start.elapsed(),
    );
    report.limit_reached = collection.limit_reached;

    let result = match combined {
        None => Err(BulkPasteError::NothingToCopy),
        Some(text) => sink
            .copy_to_clipboard(&text)
            .map(|()| progress.suspend(|| info!("Clipboard updated successfully.")))
            .map_err(BulkPasteError::from),
    };

    (report, result)
}
