//! Helpers for naming and filtering asset paths.
//!
//! The responsibilities are split into focused submodules so that entry filtering, entry key
//! construction, and variant name templating can be tested independently. Discovery and the
//! variant planner share them.

mod filters;
mod keys;
mod template;

pub use filters::{is_declaration_file, is_private_path, should_skip_script};
pub use keys::{entry_key, split_file_name};
pub use template::{NAME_TOKEN, render_variant_path};
