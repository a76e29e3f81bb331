/*!
 * Turns candidate files into formatted blocks and joins them
 */

use std::fs;
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{info, warn};

use crate::classifier::{read_text, sniff_file};
use crate::error::{BulkPasteError, Result, SkipReason, Skipped};
use crate::types::{CandidateFile, FileBlock, FileOutcome};
use crate::utils::{format_file_size, truncate_display};

/// Largest file, in bytes, that will be included
pub const MAX_FILE_SIZE: u64 = 500 * 1024;

/// Header/footer text with `<CR>`, `<FILENAME>` and `<FILEPATH>` placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Substitute placeholders for one file
    pub fn render(&self, file_name: &str, file_dir: &str) -> String {
        if self.0.is_empty() {
            return String::new();
        }

        self.0
            .replace("<CR>", "\n")
            .replace("<FILENAME>", file_name)
            .replace("<FILEPATH>", file_dir)
    }
}

/// Blocks and skips produced from a candidate list
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub blocks: Vec<FileBlock>,
    pub skipped: Vec<Skipped>,
}

impl Bundle {
    /// Join every block with a single newline, or `None` when there are none
    pub fn combined(&self) -> Option<String> {
        if self.blocks.is_empty() {
            return None;
        }

        let texts: Vec<&str> = self.blocks.iter().map(|b| b.text.as_str()).collect();
        Some(texts.join("\n"))
    }
}

/// Reads, classifies and formats candidate files
pub struct Aggregator {
    pre: Template,
    post: Template,
    max_file_size: u64,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Aggregator {
    pub fn new(pre: Template, post: Template, progress: Arc<ProgressBar>) -> Self {
        Self {
            pre,
            post,
            max_file_size: MAX_FILE_SIZE,
            progress,
        }
    }

    /// Process every candidate in order
    pub fn aggregate(&self, candidates: &[CandidateFile]) -> Bundle {
        let mut bundle = Bundle::default();

        for candidate in candidates {
            self.progress.inc(1);
            self.progress.set_message(format!(
                "Current file: {}",
                truncate_display(&candidate.file_name(), 40)
            ));

            match self.process(candidate) {
                FileOutcome::Included(block) => {
                    self.progress
                        .suspend(|| info!("Added '{}'", candidate.path.display()));
                    bundle.blocks.push(block);
                }
                FileOutcome::Skipped(skipped) => {
                    self.progress.suspend(|| {
                        warn!(
                            "Skipping '{}' - {}",
                            skipped.path.display(),
                            skipped.reason
                        )
                    });
                    bundle.skipped.push(skipped);
                }
            }
        }

        bundle
    }

    /// Build the combined clipboard text
    pub fn build_output(&self, candidates: &[CandidateFile]) -> Result<String> {
        self.aggregate(candidates)
            .combined()
            .ok_or(BulkPasteError::NothingToCopy)
    }

    /// Include or skip one candidate
    pub fn process(&self, candidate: &CandidateFile) -> FileOutcome {
        match self.try_process(candidate) {
            Ok(block) => FileOutcome::Included(block),
            Err(reason) => FileOutcome::Skipped(Skipped {
                path: candidate.path.clone(),
                reason,
            }),
        }
    }

    fn try_process(&self, candidate: &CandidateFile) -> std::result::Result<FileBlock, SkipReason> {
        let path = candidate.path();

        // The file may have vanished since discovery
        let metadata = match fs::metadata(path) {
            Ok(m) if m.is_file() => m,
            _ => return Err(SkipReason::NotFound),
        };

        if metadata.len() > self.max_file_size {
            return Err(SkipReason::TooLarge {
                size: format_file_size(metadata.len()),
                limit: format_file_size(self.max_file_size),
            });
        }

        if sniff_file(path)? {
            return Err(SkipReason::Binary);
        }

        let content = read_text(path)?;
        Ok(self.format_block(candidate, content))
    }

    /// Wrap decoded content with the rendered templates
    pub fn format_block(&self, candidate: &CandidateFile, content: String) -> FileBlock {
        let name = candidate.file_name();
        let dir = candidate.parent_dir();

        let lines = content.lines().count();
        let chars = content.chars().count();

        let mut text = self.pre.render(&name, &dir);
        text.push_str(&content);
        text.push_str(&self.post.render(&name, &dir));

        FileBlock {
            path: candidate.path.clone(),
            text,
            lines,
            chars,
        }
    }
}

/// Build the combined text for `candidates` with the given templates
pub fn build_output(
    candidates: &[CandidateFile],
    pre: &Template,
    post: &Template,
) -> Result<String> {
    Aggregator::new(pre.clone(), post.clone(), Arc::new(ProgressBar::hidden()))
        .build_output(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn aggregator(pre: &str, post: &str) -> Aggregator {
        Aggregator::new(
            Template::new(pre),
            Template::new(post),
            Arc::new(ProgressBar::hidden()),
        )
    }

    fn write_file(path: &Path, bytes: &[u8]) -> CandidateFile {
        let mut file = File::create(path).unwrap();
        file.write_all(bytes).unwrap();
        CandidateFile::new(path)
    }

    #[test]
    fn test_template_render() {
        let template = Template::new("(<FILEPATH>/<FILENAME>)<CR><CR>");
        assert_eq!(template.render("a.txt", "src"), "(src/a.txt)\n\n");
        assert_eq!(Template::default().render("a.txt", "src"), "");
    }

    #[test]
    fn test_format_block() {
        let agg = aggregator("<FILENAME>:<CR>", "<CR>end");
        let block = agg.format_block(&CandidateFile::new("a.txt"), "hi".to_string());
        assert_eq!(block.text, "a.txt:\nhi\nend");
        assert_eq!(block.lines, 1);
        assert_eq!(block.chars, 2);
    }

    #[test]
    fn test_size_limit_boundary() {
        let dir = tempdir().unwrap();
        let exact = write_file(
            &dir.path().join("exact.txt"),
            &vec![b'a'; MAX_FILE_SIZE as usize],
        );
        let over = write_file(
            &dir.path().join("over.txt"),
            &vec![b'a'; MAX_FILE_SIZE as usize + 1],
        );

        let agg = aggregator("", "");
        assert!(matches!(agg.process(&exact), FileOutcome::Included(_)));
        match agg.process(&over) {
            FileOutcome::Skipped(s) => {
                assert!(matches!(s.reason, SkipReason::TooLarge { .. }))
            }
            other => panic!("expected skip, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_and_missing_are_skipped() {
        let dir = tempdir().unwrap();
        let bin = write_file(&dir.path().join("x.bin"), b"MZ\0\0\x01");
        let gone = CandidateFile::new(dir.path().join("gone.txt"));

        let agg = aggregator("", "");
        let bundle = agg.aggregate(&[bin, gone]);
        assert!(bundle.blocks.is_empty());
        assert_eq!(bundle.skipped[0].reason, SkipReason::Binary);
        assert_eq!(bundle.skipped[1].reason, SkipReason::NotFound);
        assert!(bundle.combined().is_none());
    }

    #[test]
    fn test_nothing_to_copy() {
        let err = build_output(&[], &Template::default(), &Template::default()).unwrap_err();
        assert!(matches!(err, BulkPasteError::NothingToCopy));
    }

    #[test]
    fn test_blocks_joined_in_order() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir.path().join("a.txt"), b"alpha");
        // UTF-16LE without zero bytes, so it is not mistaken for binary
        let b = write_file(&dir.path().join("b.txt"), b"\xFF\xFE\xB2\x03\xB7\x03");
        let c = write_file(&dir.path().join("c.txt"), b"\xEF\xBB\xBFgamma");

        let output = build_output(
            &[c, a, b],
            &Template::new("[<FILENAME>]"),
            &Template::default(),
        )
        .unwrap();
        assert_eq!(output, "[c.txt]gamma\n[a.txt]alpha\n[b.txt]βη");
    }

    #[test]
    fn test_filepath_placeholder_uses_parent_dir() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir.path().join("a.txt"), b"x");
        let output =
            build_output(&[a], &Template::new("<FILEPATH>|"), &Template::default()).unwrap();
        assert_eq!(output, format!("{}|x", dir.path().display()));
    }
}
