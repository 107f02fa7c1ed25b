//! Build-start clearing of the public assets directory.

use std::fs;
use std::io::ErrorKind;

use tracing::info;

use crate::error::LifecycleError;
use crate::models::PluginOptions;

/// Remove the public assets directory when `empty_assets_dir` is enabled.
///
/// Returns `Ok(true)` when a removal was attempted. A directory that does not exist counts as
/// already emptied. Must run before static files are copied or variants are generated.
pub fn empty_assets_dir(options: &PluginOptions) -> Result<bool, LifecycleError> {
    if !options.empty_assets_dir {
        return Ok(false);
    }

    let target = &options.assets_dir_abs;
    info!(path = %target.display(), "emptying assets directory");

    match fs::remove_dir_all(target) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(LifecycleError::Remove {
                path: target.clone(),
                source,
            });
        }
    }

    info!("assets directory emptied");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    use crate::config::parse_options;

    #[test]
    fn removes_existing_assets() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let options = parse_options(&serde_json::Value::Null, temp.path())?;
        fs::create_dir_all(options.assets_dir_abs.join("images"))?;
        fs::write(options.assets_dir_abs.join("images/old.png"), b"stale")?;

        assert!(empty_assets_dir(&options)?);
        assert!(!options.assets_dir_abs.exists());
        assert!(options.public_dir_abs.exists());
        Ok(())
    }

    #[test]
    fn missing_directory_is_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let options = parse_options(&serde_json::Value::Null, temp.path())?;

        assert!(empty_assets_dir(&options)?);
        assert!(empty_assets_dir(&options)?);
        Ok(())
    }

    #[test]
    fn disabled_flag_leaves_files_alone() -> Result<(), Box<dyn std::error::Error>> {
        let temp = tempdir()?;
        let options = parse_options(&json!({ "emptyAssetsDir": false }), temp.path())?;
        fs::create_dir_all(&options.assets_dir_abs)?;
        fs::write(options.assets_dir_abs.join("keep.css"), b"body{}")?;

        assert!(!empty_assets_dir(&options)?);
        assert!(options.assets_dir_abs.join("keep.css").exists());
        Ok(())
    }
}
