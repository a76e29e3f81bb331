/*!
 * Reporting functionality for bulkpaste
 *
 * Renders the end-of-run summary with the tabled library.
 */

use std::time::Duration;

use strum::IntoEnumIterator;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::Skipped;
use crate::types::{FileBlock, SkipKind};
use crate::utils::{format_file_size, truncate_display};

/// Information about an included file
#[derive(Debug, Clone, Default)]
pub struct FileReportInfo {
    /// Path as discovered
    pub path: String,
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Time taken to collect and aggregate
    pub duration: Duration,
    /// Candidates found by the walker
    pub candidates: usize,
    /// Total number of lines copied
    pub total_lines: usize,
    /// Total number of characters copied
    pub total_chars: usize,
    /// Size of the combined text in bytes
    pub output_bytes: usize,
    /// Details for each included file, in output order
    pub file_details: Vec<FileReportInfo>,
    /// Skip counts per kind (only non-zero kinds)
    pub skipped: Vec<(SkipKind, usize)>,
    /// Whether the file-count cap was hit
    pub limit_reached: bool,
}

impl RunReport {
    /// Assemble a report from the blocks and all skips of the run
    pub fn new<'a>(
        blocks: &[FileBlock],
        skipped: impl IntoIterator<Item = &'a Skipped>,
        candidates: usize,
        output_bytes: usize,
        duration: Duration,
    ) -> Self {
        let file_details: Vec<FileReportInfo> = blocks
            .iter()
            .map(|b| FileReportInfo {
                path: b.path.to_string_lossy().to_string(),
                lines: b.lines,
                chars: b.chars,
            })
            .collect();

        let kinds: Vec<SkipKind> = skipped
            .into_iter()
            .map(|s| SkipKind::from(&s.reason))
            .collect();
        let skipped = SkipKind::iter()
            .map(|kind| (kind, kinds.iter().filter(|&&k| k == kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect();

        Self {
            duration,
            candidates,
            total_lines: file_details.iter().map(|f| f.lines).sum(),
            total_chars: file_details.iter().map(|f| f.chars).sum(),
            output_bytes,
            file_details,
            skipped,
            limit_reached: false,
        }
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.iter().map(|(_, n)| n).sum()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &RunReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &RunReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn styled(mut table: Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    fn create_summary_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🔎 Candidates".to_string(),
                value: if report.limit_reached {
                    format!("{} (limit reached)", self.format_number(report.candidates))
                } else {
                    self.format_number(report.candidates)
                },
            },
            SummaryRow {
                key: "📄 Files Copied".to_string(),
                value: self.format_number(report.file_details.len()),
            },
            SummaryRow {
                key: "⏭️ Files Skipped".to_string(),
                value: self.format_number(report.skipped_total()),
            },
        ];

        for (kind, count) in &report.skipped {
            rows.push(SummaryRow {
                key: format!("   {}", kind),
                value: self.format_number(*count),
            });
        }

        rows.push(SummaryRow {
            key: "📝 Total Lines".to_string(),
            value: self.format_number(report.total_lines),
        });
        rows.push(SummaryRow {
            key: "🔤 Total Chars".to_string(),
            value: self.format_number(report.total_chars),
        });
        rows.push(SummaryRow {
            key: "📋 Clipboard Size".to_string(),
            value: format_file_size(report.output_bytes as u64),
        });

        Self::styled(Table::new(rows))
    }

    fn create_files_table(&self, report: &RunReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|a, b| b.chars.cmp(&a.chars));

        let shown = if files.len() > 15 { &files[..10] } else { &files[..] };

        let rows: Vec<FileRow> = shown
            .iter()
            .map(|info| FileRow {
                path: truncate_display(&info.path, 60),
                lines: self.format_number(info.lines),
                chars: self.format_number(info.chars),
            })
            .collect();

        Self::styled(Table::new(rows))
    }

    fn generate_console_report(&self, report: &RunReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  COPIED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, "✅  SUMMARY", summary_table
        )
    }
}
