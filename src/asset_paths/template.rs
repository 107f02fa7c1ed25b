use std::path::{Path, PathBuf};

use super::keys::split_file_name;

/// Placeholder replaced with the source image's directory and base name.
pub const NAME_TOKEN: &str = "%NAME%";

/// Compute where the variant described by `template` is written for `source`.
///
/// The first `%NAME%` is replaced with `<source dir>/<source base name>`; the template itself
/// provides the extension. Templates without the placeholder, or whose substitution is still
/// relative, are placed in the source image's directory.
pub fn render_variant_path(template: &str, source: &Path) -> PathBuf {
    let (dir, stem, _) = split_file_name(source);

    if !template.contains(NAME_TOKEN) {
        return dir.join(template);
    }

    let base = dir.join(stem);
    let rendered = PathBuf::from(template.replacen(NAME_TOKEN, &base.to_string_lossy(), 1));
    if rendered.is_absolute() || !dir.is_absolute() {
        rendered
    } else {
        dir.join(rendered)
    }
}
