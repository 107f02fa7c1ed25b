//! Glob expansion and bundler entry discovery.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::asset_paths::{entry_key, is_private_path};
use crate::error::DiscoveryError;
use crate::models::EntryPair;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Expand `pattern` against the filesystem and return the matching files.
///
/// Patterns use `/` separators and support `*`, `?`, `[...]`, `{a,b}` alternation and `**`.
/// Only the directory prefix preceding the first wildcard is walked. Directories are visited
/// in file name order and dot-prefixed entries are never matched, so the result is stable
/// between runs. A missing base directory yields an empty list.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    walk_matches(pattern, |entry| entry.file_type().is_file())
}

/// Like [`expand_glob`], but directories matching the pattern are returned as well.
pub fn expand_glob_with_dirs(pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
    walk_matches(pattern, |entry| entry.depth() > 0)
}

fn walk_matches<F>(pattern: &str, accept: F) -> Result<Vec<PathBuf>, DiscoveryError>
where
    F: Fn(&DirEntry) -> bool,
{
    let pattern = pattern.replace('\\', "/");
    let matcher = compile(&pattern)?;
    let base = glob_base(&pattern);

    if !base.exists() {
        debug!(base = %base.display(), "glob base does not exist");
        return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    let walker = WalkDir::new(&base)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if accept(&entry) && matcher.is_match(entry.path()) {
            matches.push(entry.into_path());
        }
    }

    Ok(matches)
}

/// Discover bundler entries under `root` matching `pattern`.
///
/// Keys are paths relative to `root`. Anything inside an underscore-prefixed segment below the
/// first one is dropped. Order follows [`expand_glob`].
pub fn discover(root: &Path, pattern: &str) -> Result<Vec<EntryPair>, DiscoveryError> {
    discover_filtered(root, pattern, is_private_path)
}

/// Like [`discover`], but entries whose key satisfies `skip` are dropped instead.
pub fn discover_filtered<F>(root: &Path, pattern: &str, skip: F) -> Result<Vec<EntryPair>, DiscoveryError>
where
    F: Fn(&str) -> bool,
{
    let mut entries = Vec::new();

    for file in expand_glob(pattern)? {
        let key = entry_key(root, &file);
        if skip(&key) {
            debug!(entry = %key, "excluding entry");
            continue;
        }

        let path = std::path::absolute(&file).map_err(|source| DiscoveryError::Resolve {
            path: file.clone(),
            source,
        })?;
        entries.push((key, path));
    }

    Ok(entries)
}

fn compile(pattern: &str) -> Result<GlobMatcher, DiscoveryError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| DiscoveryError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Longest leading run of path segments free of glob syntax.
fn glob_base(pattern: &str) -> PathBuf {
    let literal: Vec<&str> = pattern
        .split('/')
        .take_while(|segment| !segment.contains(GLOB_META))
        .collect();

    let base = literal.join("/");
    if !base.is_empty() {
        PathBuf::from(base)
    } else if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::from(".")
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
