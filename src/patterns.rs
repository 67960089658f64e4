//! Include/exclude deployment patterns
//!
//! Decides whether an artifact's repository-relative path conflicts with the
//! configured deployment policy. A path conflicts when it matches any exclude
//! rule, or when include rules exist and none of them match it.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Errors for pattern compilation
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Glob pattern error: {0}")]
    Glob(#[from] globset::Error),
}

/// Compiled include/exclude rule sets
///
/// `*` matches within one path segment, `**` matches across segments.
/// Matching is case-sensitive and evaluated against the artifact's
/// repository-relative path, never a filesystem path.
#[derive(Debug)]
pub struct IncludeExcludePatterns {
    includes: GlobSet,
    excludes: GlobSet,
}

impl IncludeExcludePatterns {
    /// Compile rule sets from glob pattern strings
    pub fn new<S: AsRef<str>>(includes: &[S], excludes: &[S]) -> Result<Self, PatternError> {
        Ok(Self {
            includes: build_glob_set(includes)?,
            excludes: build_glob_set(excludes)?,
        })
    }

    /// Patterns that match nothing and exclude nothing
    pub fn empty() -> Self {
        Self {
            includes: GlobSet::empty(),
            excludes: GlobSet::empty(),
        }
    }

    /// Check whether a repository-relative path conflicts with the policy
    ///
    /// An exclude match always wins. With a non-empty include set, paths
    /// matching no include rule conflict as well. Empty rule sets on both
    /// sides never conflict.
    pub fn path_conflicts(&self, relative_path: &str) -> bool {
        if self.excludes.is_match(relative_path) {
            return true;
        }
        !self.includes.is_empty() && !self.includes.is_match(relative_path)
    }
}

fn build_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, PatternError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        // literal_separator keeps `*` inside one segment; `**` still
        // crosses segment boundaries
        builder.add(
            GlobBuilder::new(pattern.as_ref())
                .literal_separator(true)
                .build()?,
        );
    }
    Ok(builder.build()?)
}
