//! Lifecycle hooks exposed to the host bundler.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info_span;

use crate::bundle::{copy_static_assets, empty_assets_dir, static_copy_target};
use crate::config::parse_options;
use crate::error::{ConfigError, CopyError, DiscoveryError, LifecycleError, PluginError};
use crate::models::{BuildDescription, HookMode, PluginOptions, StaticCopyTarget};
use crate::project::project_build_config;
use crate::variants::{GenerationReport, ImageResizer, generate_variants};

/// Name of the hook providing the bundler configuration.
pub const CONFIG_HOOK: &str = "codeigniter";
/// Name of the hook emptying the assets directory.
pub const EMPTY_ASSETS_HOOK: &str = "codeigniter:empty-assets-dir";
/// Name of the hook generating image variants.
pub const IMAGE_VARIANTS_HOOK: &str = "codeigniter:optimize-images";

/// Resolved options plus the hooks a bundler calls during a build.
///
/// Options are validated once at construction and only read afterwards.
#[derive(Debug, Clone)]
pub struct CodeIgniterPlugin {
  options: PluginOptions,
}

impl CodeIgniterPlugin {
  /// Validate `input` and resolve its directories against `cwd`.
  pub fn new(input: &Value, cwd: &Path) -> Result<Self, ConfigError> {
    Ok(Self::from_options(parse_options(input, cwd)?))
  }

  /// Wrap already resolved options.
  pub fn from_options(options: PluginOptions) -> Self {
    Self { options }
  }

  /// The resolved options.
  pub fn options(&self) -> &PluginOptions {
    &self.options
  }

  /// Provide the bundler configuration. Safe to call any number of times.
  pub fn config(&self) -> Result<BuildDescription, DiscoveryError> {
    let _span = info_span!("hook", hook = CONFIG_HOOK).entered();
    project_build_config(&self.options)
  }

  /// Source and destination for the static copy collaborator.
  pub fn static_copy_target(&self) -> StaticCopyTarget {
    static_copy_target(&self.options)
  }

  /// Build-start hook: empty the assets directory when enabled.
  ///
  /// Returns whether a removal was attempted. Skipped outside of builds.
  pub fn build_start(&self, mode: HookMode) -> Result<bool, LifecycleError> {
    if mode != HookMode::Build {
      return Ok(false);
    }
    let _span = info_span!("hook", hook = EMPTY_ASSETS_HOOK).entered();
    empty_assets_dir(&self.options)
  }

  /// Copy static files into the assets directory. Must follow [`Self::build_start`].
  pub fn copy_static(&self) -> Result<Vec<PathBuf>, CopyError> {
    copy_static_assets(&self.static_copy_target())
  }

  /// Build-start hook followed by the static copy, as run before the bundler writes output.
  ///
  /// Returns the number of static files copied.
  pub fn prepare(&self, mode: HookMode) -> Result<usize, PluginError> {
    if mode != HookMode::Build {
      return Ok(0);
    }
    self.build_start(mode)?;
    Ok(self.copy_static()?.len())
  }

  /// Bundle-closed hook: generate every configured image variant.
  ///
  /// Skipped outside of builds. The report lists per-variant failures; use
  /// [`GenerationReport::into_result`] to fail the step when any occurred.
  pub fn close_bundle(
    &self,
    mode: HookMode,
    resizer: &dyn ImageResizer,
  ) -> Result<GenerationReport, DiscoveryError> {
    if mode != HookMode::Build {
      return Ok(GenerationReport::default());
    }
    let _span = info_span!("hook", hook = IMAGE_VARIANTS_HOOK).entered();
    generate_variants(&self.options, resizer)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  use image::{Rgba, RgbaImage};
  use serde_json::json;
  use tempfile::tempdir;

  use crate::variants::ImageCrateResizer;

  #[test]
  fn rejects_invalid_options_before_touching_disk() {
    let temp = tempdir().unwrap();
    let result = CodeIgniterPlugin::new(&json!({ "assetsDir": "" }), temp.path());

    assert!(matches!(result, Err(ConfigError::Schema(_))));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
  }

  #[test]
  fn serve_mode_skips_build_hooks() {
    let temp = tempdir().unwrap();
    let plugin = CodeIgniterPlugin::new(&Value::Null, temp.path()).unwrap();
    let assets = &plugin.options().assets_dir_abs;
    fs::create_dir_all(assets).unwrap();
    fs::write(assets.join("app.js"), b"").unwrap();

    assert!(!plugin.build_start(HookMode::Serve).unwrap());
    assert!(assets.join("app.js").exists());
    let report = plugin
      .close_bundle(HookMode::Serve, &ImageCrateResizer::default())
      .unwrap();
    assert_eq!(report.attempted(), 0);
  }

  #[test]
  fn runs_a_full_build_cycle() {
    let temp = tempdir().unwrap();
    let cwd = temp.path();
    let plugin = CodeIgniterPlugin::new(
      &json!({
        "imageVariants": [{ "src": "images/*.png", "sizes": { "%NAME%-thumb.png": 6 } }]
      }),
      cwd,
    )
    .unwrap();

    fs::create_dir_all(cwd.join("resources/js")).unwrap();
    fs::write(cwd.join("resources/js/app.js"), b"console.log(1)").unwrap();
    fs::create_dir_all(cwd.join("resources/static/images")).unwrap();
    RgbaImage::from_pixel(12, 6, Rgba([0, 0, 0, 255]))
      .save(cwd.join("resources/static/images/logo.png"))
      .unwrap();
    fs::create_dir_all(cwd.join("public/assets")).unwrap();
    fs::write(cwd.join("public/assets/stale.js"), b"").unwrap();

    let description = plugin.config().unwrap();
    assert_eq!(
      description.build.rollup_options.input["js/app.js"],
      cwd.join("resources/js/app.js")
    );

    assert!(plugin.build_start(HookMode::Build).unwrap());
    assert!(!cwd.join("public/assets/stale.js").exists());
    fs::write(cwd.join("public/assets/stale.js"), b"").unwrap();
    assert_eq!(plugin.prepare(HookMode::Build).unwrap(), 1);
    assert!(!cwd.join("public/assets/stale.js").exists());

    let copied = plugin.copy_static().unwrap();
    assert_eq!(copied, vec![cwd.join("public/assets/images/logo.png")]);
    assert_eq!(plugin.prepare(HookMode::Serve).unwrap(), 0);

    let written = plugin
      .close_bundle(HookMode::Build, &ImageCrateResizer::default())
      .unwrap()
      .into_result()
      .unwrap();
    assert_eq!(written, vec![cwd.join("public/assets/images/logo-thumb.png")]);

    let thumb = image::open(&written[0]).unwrap();
    assert_eq!((thumb.width(), thumb.height()), (6, 3));
  }
}
