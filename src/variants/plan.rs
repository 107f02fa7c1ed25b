use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::asset_paths::render_variant_path;
use crate::discovery::expand_glob;
use crate::error::DiscoveryError;
use crate::models::{ImageVariantSpec, ResizeOperation};

/// Expand variant specs into concrete resize operations.
///
/// Specs are processed in order, then matched images in glob order, then size entries in
/// declaration order. Each `src` pattern is resolved below `assets_dir`.
///
/// Output paths are unique in the result. When several operations render to the same path,
/// the last one in plan order is kept at the position of the first.
pub fn plan_variants(
    specs: &[ImageVariantSpec],
    assets_dir: &Path,
) -> Result<Vec<ResizeOperation>, DiscoveryError> {
    let assets_root = assets_dir.to_string_lossy().replace('\\', "/");
    let mut operations: IndexMap<PathBuf, ResizeOperation> = IndexMap::new();

    for spec in specs {
        let pattern = format!("{}/{}", assets_root.trim_end_matches('/'), spec.src);
        let sources = expand_glob(&pattern)?;
        debug!(pattern = %pattern, matches = sources.len(), "expanded variant source");

        for source in sources {
            for (template, width) in &spec.sizes {
                let output_path = render_variant_path(template, &source);
                let operation = ResizeOperation {
                    output_path: output_path.clone(),
                    source_path: source.clone(),
                    target_width: pixel_width(*width),
                };
                if let Some(previous) = operations.insert(output_path, operation) {
                    warn!(
                        output = %previous.output_path.display(),
                        replaced = %previous.source_path.display(),
                        "variant output planned twice, keeping the later source"
                    );
                }
            }
        }
    }

    Ok(operations.into_values().collect())
}

fn pixel_width(width: f64) -> u32 {
    width.round().clamp(1.0, f64::from(u32::MAX)) as u32
}
