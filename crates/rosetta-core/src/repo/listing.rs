//! Directory listing relative to an example root, and exclusion filtering

use super::host::{RemoteFile, RepositoryHost};
use crate::error::RosettaError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Join two repository paths with `/`, treating empty parts as identity
pub fn join_path(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    match (base.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{}/{}", base, name),
    }
}

/// List `root/sub_path` and compute each entry's path relative to `root`
///
/// Relative paths are anchored at the example root rather than the queried
/// subdirectory, so nested entries compare against top-level globs.
pub async fn list_directory<H: RepositoryHost>(
    host: &H,
    repo: &str,
    root: &str,
    sub_path: &str,
) -> Result<Vec<RemoteFile>, RosettaError> {
    let mut files = host.list_directory(repo, &join_path(root, sub_path)).await?;
    for file in &mut files {
        file.set_rel_path(root)?;
    }
    Ok(files)
}

/// Compiled exclusion globs
///
/// Patterns use shell semantics against the whole relative path: `*` and `?`
/// never cross a `/`, and character classes are supported. Braces are
/// literal characters, not `{a,b}` alternation.
///
/// A pattern of the form `dir/*` (or `dir/**`) excludes every child of `dir`,
/// so a directory entry matching `dir` is pruned as a whole.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    matcher: GlobSet,
    dir_matcher: GlobSet,
}

/// Wrap `{` and `}` outside character classes in a class so globset reads them literally
fn literal_braces(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
                // A leading `!`, `^` or `]` belongs to the class body
                if let Some(&next) = chars.peek() {
                    if next == '!' || next == '^' {
                        out.push(next);
                        chars.next();
                    }
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '{' | '}' if !in_class => {
                out.push('[');
                out.push(c);
                out.push(']');
            }
            _ => out.push(c),
        }
    }
    out
}

fn compile(pattern: &str) -> Result<globset::Glob, RosettaError> {
    GlobBuilder::new(&literal_braces(pattern))
        .literal_separator(true)
        .build()
        .map_err(|e| {
            RosettaError::Configuration(format!(
                "invalid exclusion glob '{}': {}",
                pattern,
                e.kind()
            ))
        })
}

impl ExclusionSet {
    /// Compile the patterns; a malformed pattern is a catalog error
    pub fn new<I, S>(patterns: I) -> Result<Self, RosettaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut dir_builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder.add(compile(pattern)?);

            let parent = pattern
                .strip_suffix("/**")
                .or_else(|| pattern.strip_suffix("/*"))
                .filter(|p| !p.is_empty());
            if let Some(parent) = parent {
                dir_builder.add(compile(parent)?);
            }

            kept.push(pattern.to_string());
        }

        let build_error = |e: globset::Error| {
            RosettaError::Configuration(format!("failed to build exclusion matcher: {}", e))
        };

        Ok(Self {
            patterns: kept,
            matcher: builder.build().map_err(build_error)?,
            dir_matcher: dir_builder.build().map_err(build_error)?,
        })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: GlobSet::empty(),
            dir_matcher: GlobSet::empty(),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether a relative path matches one of the patterns
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }

    /// Whether a listing entry is dropped, pruning directories whose children are all excluded
    pub fn excludes(&self, file: &RemoteFile) -> bool {
        self.is_excluded(&file.rel_path)
            || (file.is_dir() && self.dir_matcher.is_match(&file.rel_path))
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for ExclusionSet {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

/// Keep the entries whose relative path matches no exclusion glob, in order
///
/// Directory entries are filtered too, so an excluded subtree is never listed.
pub fn filter_files(files: Vec<RemoteFile>, exclusions: &ExclusionSet) -> Vec<RemoteFile> {
    files
        .into_iter()
        .filter(|file| !exclusions.excludes(file))
        .collect()
}
