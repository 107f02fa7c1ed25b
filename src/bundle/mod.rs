//! Filesystem steps run around the bundler's own output.

pub mod assets_dir;
pub mod static_copy;

pub use assets_dir::empty_assets_dir;
pub use static_copy::{copy_static_assets, static_copy_target};
