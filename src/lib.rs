#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod asset_paths;
pub mod bundle;
pub mod config;
pub mod discovery;
pub mod error;
pub mod models;
pub mod plugin;
pub mod project;
pub mod variants;

pub use config::{ValidatedOptions, parse_options, resolve_options, validate_options};
pub use discovery::{discover, discover_filtered, expand_glob};
pub use error::{
    ConfigError, CopyError, DiscoveryError, GenerationError, GenerationFailed, LifecycleError,
    PluginError, SchemaIssue, SchemaValidationError,
};
pub use models::{
    BuildDescription, EntryPair, HookMode, ImageVariantSpec, PluginOptions, ResizeOperation,
    StaticCopyTarget,
};
pub use plugin::CodeIgniterPlugin;
pub use project::project_build_config;
pub use variants::{GenerationReport, ImageCrateResizer, ImageResizer, generate_variants};
