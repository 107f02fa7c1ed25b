//! Copy files from the static resources directory into the public assets directory.

use std::fs;
use std::path::{Path, PathBuf};

use same_file::is_same_file;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::discovery::expand_glob_with_dirs;
use crate::error::CopyError;
use crate::models::{PluginOptions, StaticCopyTarget};

/// Source glob and destination for the static copy step: `<static>/*` into the assets directory.
pub fn static_copy_target(options: &PluginOptions) -> StaticCopyTarget {
    StaticCopyTarget {
        src: format!(
            "{}/*",
            options.static_dir_abs.to_string_lossy().replace('\\', "/")
        ),
        dest: options.assets_dir_abs.clone(),
    }
}

/// Copy every top-level match of `target.src` into `target.dest`.
///
/// Matched files keep their name; matched directories are copied recursively. Returns the
/// destination path of every installed file.
pub fn copy_static_assets(target: &StaticCopyTarget) -> Result<Vec<PathBuf>, CopyError> {
    let mut installed = Vec::new();

    for source in expand_glob_with_dirs(&target.src)? {
        let Some(name) = source.file_name() else {
            continue;
        };
        let destination = target.dest.join(name);

        if source.is_dir() {
            copy_tree(&source, &destination, &mut installed)?;
        } else {
            install_static_file(&source, &destination)?;
            installed.push(destination);
        }
    }

    info!(
        files = installed.len(),
        dest = %target.dest.display(),
        "copied static files"
    );
    Ok(installed)
}

fn copy_tree(source: &Path, destination: &Path, installed: &mut Vec<PathBuf>) -> Result<(), CopyError> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|err| CopyError::Walk {
            path: source.to_path_buf(),
            source: err,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);
        install_static_file(entry.path(), &target)?;
        installed.push(target);
    }
    Ok(())
}

fn install_static_file(source: &Path, destination: &Path) -> Result<(), CopyError> {
    if destination.exists() && is_same_file(source, destination).map_err(io_error(destination))? {
        debug!(path = %destination.display(), "static file already in place");
        return Ok(());
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }

    fs::copy(source, destination).map_err(io_error(source))?;
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CopyError {
    let path = path.to_path_buf();
    move |source| CopyError::Io { path, source }
}
