//! Projection of resolved options onto the bundler's build description.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::asset_paths::should_skip_script;
use crate::discovery::{discover, discover_filtered};
use crate::error::DiscoveryError;
use crate::models::{BuildDescription, BuildOutput, EntryPair, PluginOptions, RollupOptions};

/// Glob selecting script entries below the JavaScript directory.
pub fn script_pattern(options: &PluginOptions) -> String {
  format!("{}/**/*.{{js,ts}}", forward_slashes(&options.js_dir_abs))
}

/// Glob selecting stylesheet entries below the styles directory.
pub fn style_pattern(options: &PluginOptions) -> String {
  format!("{}/**/*.css", forward_slashes(&options.styles_dir_abs))
}

/// Build the bundler configuration for the current state of the resources directory.
///
/// Entries are rediscovered on every call; nothing is cached or written.
pub fn project_build_config(options: &PluginOptions) -> Result<BuildDescription, DiscoveryError> {
  let root = &options.resources_dir_abs;
  let scripts = discover_filtered(root, &script_pattern(options), should_skip_script)?;
  let styles = discover(root, &style_pattern(options))?;
  debug!(scripts = scripts.len(), styles = styles.len(), "discovered entries");

  Ok(BuildDescription {
    root: root.clone(),
    public_dir: false,
    build: BuildOutput {
      out_dir: options.public_dir_abs.clone(),
      assets_dir: options.assets_dir.clone(),
      manifest: options.manifest.clone(),
      rollup_options: RollupOptions {
        input: merge_entries([scripts, styles]),
      },
    },
  })
}

/// Merge entry lists into a key-unique map.
///
/// A later entry with an already seen key replaces the earlier path while keeping its
/// position. Collisions are logged, not rejected.
pub fn merge_entries<I>(groups: I) -> IndexMap<String, PathBuf>
where
  I: IntoIterator<Item = Vec<EntryPair>>,
{
  let mut input = IndexMap::new();
  for (key, path) in groups.into_iter().flatten() {
    if let Some(previous) = input.insert(key.clone(), path) {
      warn!(
        entry = %key,
        replaced = %previous.display(),
        "duplicate entry key, keeping the later source"
      );
    }
  }
  input
}

fn forward_slashes(path: &std::path::Path) -> String {
  path.to_string_lossy().replace('\\', "/")
}
