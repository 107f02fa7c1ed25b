//! Data structures shared between option resolution, discovery, and the build hooks.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

/// Declarative rule describing a family of resized images derived from static sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageVariantSpec {
  /// Glob pattern relative to the public assets directory.
  pub src: String,
  /// Output name template mapped to the target width, in declaration order.
  pub sizes: IndexMap<String, f64>,
}

/// Fully resolved plugin options with absolute paths derived from the working directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginOptions {
  /// Empty the public assets directory before building.
  pub empty_assets_dir: bool,
  /// Framework public directory.
  pub public_dir: String,
  /// Public subdirectory receiving compiled assets.
  pub assets_dir: String,
  /// Directory holding source files.
  pub resources_dir: String,
  /// Resources subdirectory holding JavaScript and TypeScript sources.
  pub js_dir: String,
  /// Resources subdirectory holding CSS sources.
  pub styles_dir: String,
  /// Resources subdirectory holding files copied verbatim into the assets directory.
  pub static_dir: String,
  /// Manifest location inside the public directory.
  pub manifest: String,
  /// Image variants generated once the bundle is written.
  pub image_variants: Vec<ImageVariantSpec>,
  /// `<cwd>/<public_dir>`.
  pub public_dir_abs: PathBuf,
  /// `<cwd>/<public_dir>/<assets_dir>`.
  pub assets_dir_abs: PathBuf,
  /// `<cwd>/<resources_dir>`.
  pub resources_dir_abs: PathBuf,
  /// `<cwd>/<resources_dir>/<static_dir>`.
  pub static_dir_abs: PathBuf,
  /// `<cwd>/<resources_dir>/<js_dir>`.
  pub js_dir_abs: PathBuf,
  /// `<cwd>/<resources_dir>/<styles_dir>`.
  pub styles_dir_abs: PathBuf,
}

/// Bundler entry name paired with the absolute path of its source file.
pub type EntryPair = (String, PathBuf);

/// A single planned resize: one source image, one size entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeOperation {
  /// Matched source image.
  pub source_path: PathBuf,
  /// Destination derived from the size template.
  pub output_path: PathBuf,
  /// Target width in pixels; height follows the source aspect ratio.
  pub target_width: u32,
}

/// Build description handed to the bundler when it asks for configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescription {
  /// Project root for module resolution (the resources directory).
  pub root: PathBuf,
  /// Always `false`: the bundler's own public directory handling is disabled.
  pub public_dir: bool,
  /// Output settings.
  pub build: BuildOutput,
}

/// Output half of the [`BuildDescription`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
  /// Directory receiving the build output (the public directory).
  pub out_dir: PathBuf,
  /// Subdirectory of `out_dir` receiving emitted assets.
  pub assets_dir: String,
  /// Manifest location relative to `out_dir`.
  pub manifest: String,
  /// Input selection.
  pub rollup_options: RollupOptions,
}

/// Entry points keyed by their logical name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupOptions {
  /// Entry name to absolute source path, in discovery order.
  pub input: IndexMap<String, PathBuf>,
}

/// Source glob and destination directory for the static copy collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticCopyTarget {
  /// Absolute glob selecting the files to copy.
  pub src: String,
  /// Absolute destination directory.
  pub dest: PathBuf,
}

/// Which host command the hooks run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookMode {
  /// Production build; every hook applies.
  #[default]
  Build,
  /// Development server; build-only hooks are skipped.
  Serve,
}
