/*!
 * Wildcard matching for ignore patterns
 *
 * Patterns are tested against a bare file or directory name, never a full
 * path. `*` matches any run of characters (including none), `?` matches
 * exactly one character, everything else matches itself. There is no escape
 * syntax.
 */

use std::path::Path;

/// Match `name` against a wildcard `pattern`, consuming the entire name
pub fn matches(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut n, mut p) = (0, 0);
    // Position of the last `*` seen and the name index it is currently covering up to
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, n));
                p += 1;
            }
            Some('?') => {
                n += 1;
                p += 1;
            }
            Some(&c) if c == name[n] => {
                n += 1;
                p += 1;
            }
            _ => match star {
                // Let the last star swallow one more character and retry
                Some((star_p, star_n)) => {
                    star = Some((star_p, star_n + 1));
                    p = star_p + 1;
                    n = star_n + 1;
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Immutable set of ignore patterns loaded at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    patterns: Vec<String>,
}

impl IgnoreSet {
    /// Create a set from explicit patterns
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a space/tab separated pattern list, as stored in `ignore_patterns`
    pub fn from_whitespace_list(list: &str) -> Self {
        Self::new(
            list.split([' ', '\t'])
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        )
    }

    /// Add patterns after the ones already present
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any pattern matches the bare name
    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|pattern| matches(name, pattern))
    }

    /// Check the final segment of `path`
    pub fn is_path_ignored(&self, path: &Path) -> bool {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        self.is_ignored(&name)
    }
}
