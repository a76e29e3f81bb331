/*!
 * Core types shared by the walker and the aggregator
 */

use std::path::{Path, PathBuf};

use strum::{Display, EnumIter};

use crate::error::{SkipReason, Skipped};

/// A file selected during traversal, pending validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Path as discovered (relative inputs stay relative)
    pub path: PathBuf,
}

impl CandidateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bare file name
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// Containing directory, empty when the path has none
    pub fn parent_dir(&self) -> String {
        self.path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Formatted output for one included file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlock {
    /// Source file
    pub path: PathBuf,
    /// Pre-message, decoded content and post-message
    pub text: String,
    /// Number of lines in the decoded content
    pub lines: usize,
    /// Number of characters in the decoded content
    pub chars: usize,
}

/// Result of processing a single candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// File read, decoded and formatted
    Included(FileBlock),
    /// File left out
    Skipped(Skipped),
}

/// Coarse grouping of skip reasons for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum SkipKind {
    #[strum(to_string = "Ignored")]
    Ignored,
    #[strum(to_string = "Already visited")]
    Visited,
    #[strum(to_string = "Invalid path")]
    Invalid,
    #[strum(to_string = "Too large")]
    TooLarge,
    #[strum(to_string = "Binary")]
    Binary,
    #[strum(to_string = "Access/read error")]
    Access,
}

impl From<&SkipReason> for SkipKind {
    fn from(reason: &SkipReason) -> Self {
        match reason {
            SkipReason::IgnoredByPattern => Self::Ignored,
            SkipReason::AlreadyVisited => Self::Visited,
            SkipReason::NotFileOrDirectory | SkipReason::NotFound => Self::Invalid,
            SkipReason::TooLarge { .. } => Self::TooLarge,
            SkipReason::Binary => Self::Binary,
            SkipReason::AccessDenied(_)
            | SkipReason::Unreadable(_)
            | SkipReason::Truncated { .. }
            | SkipReason::Enumeration(_) => Self::Access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_name_and_parent() {
        let candidate = CandidateFile::new("src/nested/main.rs");
        assert_eq!(candidate.file_name(), "main.rs");
        assert_eq!(candidate.parent_dir(), "src/nested");

        let bare = CandidateFile::new("main.rs");
        assert_eq!(bare.parent_dir(), "");
    }

    #[test]
    fn test_skip_kind_grouping() {
        assert_eq!(SkipKind::from(&SkipReason::Binary), SkipKind::Binary);
        assert_eq!(
            SkipKind::from(&SkipReason::Unreadable("locked".into())),
            SkipKind::Access
        );
        assert_eq!(SkipKind::Access.to_string(), "Access/read error");
    }
}
