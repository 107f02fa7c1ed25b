use std::path::{Path, PathBuf};

/// Produce the bundler entry name for `path` relative to `root`.
///
/// The key keeps the file extension and always uses forward slashes so that the entry map is
/// identical on every platform. Paths outside `root` keep their full form.
pub fn entry_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.to_string_lossy().replace('\\', "/")
}

/// Split a file path into its directory, base name without extension, and extension.
///
/// Only the last extension is removed, so `hero.min.png` yields `hero.min` and `png`.
pub fn split_file_name(path: &Path) -> (PathBuf, String, Option<String>) {
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    (dir, stem, extension)
}
