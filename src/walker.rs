/*!
 * Recursive expansion of input paths into candidate files
 */

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{SkipReason, Skipped};
use crate::pattern::IgnoreSet;
use crate::types::CandidateFile;

/// Upper bound on candidate files collected in one run
pub const MAX_FILE_COUNT: usize = 10_000;

/// Mutable state of a single traversal
#[derive(Debug, Default)]
pub struct TraversalContext {
    /// Canonical directory paths already expanded
    visited: HashSet<String>,
    /// Files selected so far, in discovery order
    candidates: Vec<CandidateFile>,
    /// Paths left out, with reasons
    skipped: Vec<Skipped>,
    /// Cap on `candidates`
    limit: usize,
}

impl TraversalContext {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn file_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_full(&self) -> bool {
        self.candidates.len() >= self.limit
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Record a directory; false if it had been seen before
    fn mark_visited(&mut self, key: String) -> bool {
        self.visited.insert(key)
    }

    fn push(&mut self, candidate: CandidateFile) {
        self.candidates.push(candidate);
    }

    fn skip(&mut self, path: &Path, reason: SkipReason) {
        self.skipped.push(Skipped {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Outcome of a traversal
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Files to hand to the aggregator
    pub candidates: Vec<CandidateFile>,
    /// Paths skipped during traversal
    pub skipped: Vec<Skipped>,
    /// Whether the file-count cap was hit
    pub limit_reached: bool,
}

/// Walks input paths, applying ignore patterns and cycle detection
pub struct PathWalker {
    ignore: IgnoreSet,
    limit: usize,
    /// Progress indicator
    pub progress: Arc<ProgressBar>,
}

impl PathWalker {
    /// Create a walker with the default file-count cap
    pub fn new(ignore: IgnoreSet, progress: Arc<ProgressBar>) -> Self {
        Self {
            ignore,
            limit: MAX_FILE_COUNT,
            progress,
        }
    }

    /// Override the file-count cap
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Expand every input path into candidate files
    pub fn collect<S: AsRef<str>>(&self, inputs: &[S]) -> Collection {
        let mut ctx = TraversalContext::new(self.limit);

        for input in inputs {
            self.visit(&mut ctx, Path::new(input.as_ref()));
            if ctx.is_full() {
                self.progress.suspend(|| {
                    warn!(
                        "File limit reached ({}). Stopping further processing.",
                        self.limit
                    )
                });
                break;
            }
        }

        Collection {
            limit_reached: ctx.is_full(),
            candidates: ctx.candidates,
            skipped: ctx.skipped,
        }
    }

    /// Process one path, recursing into directories
    pub fn visit(&self, ctx: &mut TraversalContext, path: &Path) {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return;
        }

        if path.is_dir() {
            self.visit_directory(ctx, path);
        } else if path.is_file() {
            self.visit_file(ctx, path);
        } else {
            self.skip(ctx, path, SkipReason::NotFileOrDirectory);
        }
    }

    fn visit_directory(&self, ctx: &mut TraversalContext, dir: &Path) {
        if self.ignore.is_path_ignored(dir) {
            self.skip(ctx, dir, SkipReason::IgnoredByPattern);
            return;
        }

        let key = match visit_key(dir) {
            Ok(key) => key,
            Err(e) => {
                self.skip(ctx, dir, SkipReason::Enumeration(e.to_string()));
                return;
            }
        };
        if !ctx.mark_visited(key) {
            self.skip(ctx, dir, SkipReason::AlreadyVisited);
            return;
        }

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            if ctx.is_full() {
                debug!("File limit reached, dropping rest of '{}'", dir.display());
                break;
            }

            match entry {
                Ok(entry) => self.visit(ctx, entry.path()),
                Err(e) => {
                    let at = e.path().unwrap_or(dir).to_path_buf();
                    self.skip(ctx, &at, SkipReason::Enumeration(e.to_string()));
                }
            }
        }
    }

    fn visit_file(&self, ctx: &mut TraversalContext, file: &Path) {
        if self.ignore.is_path_ignored(file) {
            self.skip(ctx, file, SkipReason::IgnoredByPattern);
            return;
        }

        if ctx.is_full() {
            debug!("File limit reached, not adding '{}'", file.display());
            return;
        }

        ctx.push(CandidateFile::new(file));
        self.progress
            .set_message(format!("🔎 Found {} files", ctx.file_count()));
        self.progress.tick();
    }

    fn skip(&self, ctx: &mut TraversalContext, path: &Path, reason: SkipReason) {
        self.progress
            .suspend(|| warn!("Skipping '{}' - {}", path.display(), reason));
        ctx.skip(path, reason);
    }
}

/// Absolute form of a directory used for cycle detection, case-folded where
/// the filesystem is case-insensitive
fn visit_key(dir: &Path) -> io::Result<String> {
    let absolute = fs::canonicalize(dir).or_else(|_| std::path::absolute(dir))?;
    let key = absolute.to_string_lossy();
    if cfg!(any(windows, target_os = "macos")) {
        Ok(key.to_lowercase())
    } else {
        Ok(key.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn walker(patterns: &[&str]) -> PathWalker {
        PathWalker::new(
            IgnoreSet::new(patterns.iter().copied()),
            Arc::new(ProgressBar::hidden()),
        )
    }

    fn touch(path: &Path) {
        File::create(path).unwrap();
    }

    fn names(collection: &Collection) -> Vec<String> {
        let mut names: Vec<String> = collection
            .candidates
            .iter()
            .map(CandidateFile::file_name)
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_collects_nested_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        touch(&dir.path().join("top.txt"));
        touch(&dir.path().join("a/mid.txt"));
        touch(&dir.path().join("a/b/deep.txt"));

        let collection = walker(&[]).collect(&[dir.path().to_string_lossy()]);
        assert_eq!(names(&collection), ["deep.txt", "mid.txt", "top.txt"]);
        assert!(!collection.limit_reached);
    }

    #[test]
    fn test_blank_inputs_are_ignored_silently() {
        let collection = walker(&[]).collect(&["", "   ", "\t"]);
        assert!(collection.candidates.is_empty());
        assert!(collection.skipped.is_empty());
    }

    #[test]
    fn test_missing_path_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let collection = walker(&[]).collect(&[missing.to_string_lossy()]);
        assert!(collection.candidates.is_empty());
        assert_eq!(collection.skipped.len(), 1);
        assert_eq!(
            collection.skipped[0].reason,
            SkipReason::NotFileOrDirectory
        );
    }

    #[test]
    fn test_ignored_directory_skips_subtree() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        touch(&dir.path().join("node_modules/pkg/index.js"));
        touch(&dir.path().join("keep.js"));
        touch(&dir.path().join("debug.log"));

        let collection =
            walker(&["node_modules", "*.log"]).collect(&[dir.path().to_string_lossy()]);
        assert_eq!(names(&collection), ["keep.js"]);
        let ignored = collection
            .skipped
            .iter()
            .filter(|s| s.reason == SkipReason::IgnoredByPattern)
            .count();
        assert_eq!(ignored, 2);
    }

    #[test]
    fn test_ignored_file_given_directly() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("secret.env");
        touch(&file);
        let collection = walker(&["*.env"]).collect(&[file.to_string_lossy()]);
        assert!(collection.candidates.is_empty());
    }

    #[test]
    fn test_same_directory_twice_is_expanded_once() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("one.txt"));
        let input = dir.path().to_string_lossy().to_string();
        let dotted = dir.path().join(".").to_string_lossy().to_string();

        let collection = walker(&[]).collect(&[input, dotted]);
        assert_eq!(collection.candidates.len(), 1);
        assert!(collection
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::AlreadyVisited));
    }

    #[cfg(unix)]
    #[test]
    fn test_self_referential_link_terminates() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        touch(&root.join("file.txt"));
        std::os::unix::fs::symlink(&root, root.join("loop")).unwrap();

        let w = walker(&[]);
        let mut ctx = TraversalContext::new(MAX_FILE_COUNT);
        w.visit(&mut ctx, &root);

        assert_eq!(ctx.file_count(), 1);
        assert_eq!(ctx.visited_count(), 1);
        assert!(ctx
            .skipped
            .iter()
            .any(|s| s.reason == SkipReason::AlreadyVisited && s.path.ends_with("loop")));
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_does_not_stop_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        let open = dir.path().join("open");
        fs::create_dir(&locked).unwrap();
        fs::create_dir(&open).unwrap();
        touch(&locked.join("hidden.txt"));
        touch(&open.join("visible.txt"));
        let later = tempdir().unwrap();
        touch(&later.path().join("later.txt"));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Root ignores permission bits, so the denial cannot be produced
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let collection = walker(&[])
            .collect(&[dir.path().to_string_lossy(), later.path().to_string_lossy()]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(names(&collection), ["later.txt", "visible.txt"]);
        assert!(collection
            .skipped
            .iter()
            .any(|s| matches!(s.reason, SkipReason::Enumeration(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_directories_differing_by_case_are_distinct() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("Src")).unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        touch(&dir.path().join("Src/upper.rs"));
        touch(&dir.path().join("src/lower.rs"));

        let collection = walker(&[]).collect(&[dir.path().to_string_lossy()]);
        assert_eq!(names(&collection), ["lower.rs", "upper.rs"]);
        assert!(collection.skipped.is_empty());
    }

    #[test]
    fn test_limit_truncates_mid_directory() {
        let dir = tempdir().unwrap();
        for i in 0..10 {
            touch(&dir.path().join(format!("f{}.txt", i)));
        }
        let extra = tempdir().unwrap();
        touch(&extra.path().join("never.txt"));

        let collection = walker(&[])
            .with_limit(4)
            .collect(&[dir.path().to_string_lossy(), extra.path().to_string_lossy()]);
        assert_eq!(collection.candidates.len(), 4);
        assert!(collection.limit_reached);
        assert!(!names(&collection).contains(&"never.txt".to_string()));
    }

    #[test]
    fn test_default_cap_is_enforced() {
        let dir = tempdir().unwrap();
        for i in 0..MAX_FILE_COUNT + 5 {
            touch(&dir.path().join(format!("{}.txt", i)));
        }

        let collection = walker(&[]).collect(&[dir.path().to_string_lossy()]);
        assert_eq!(collection.candidates.len(), MAX_FILE_COUNT);
        assert!(collection.limit_reached);
    }
}
