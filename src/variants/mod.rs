//! Responsive image variants generated after the bundle has been written.
//!
//! Planning is a pure expansion of the configured specs into [`ResizeOperation`]s. Execution
//! fans the operations out over the rayon pool and only returns once every one of them has
//! finished, so a completed pass means every successful variant is on disk. Failures are kept
//! per operation and never cancel their siblings.

mod plan;
mod resize;

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{DiscoveryError, GenerationError, GenerationFailed};
use crate::models::{PluginOptions, ResizeOperation};

pub use plan::plan_variants;
pub use resize::{ImageCrateResizer, ImageResizer, scaled_height};

/// Outcome of one generation pass.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Output paths written successfully, in plan order.
    pub written: Vec<PathBuf>,
    /// Operations that failed, in plan order.
    pub failures: Vec<GenerationError>,
}

impl GenerationReport {
    /// Number of operations attempted.
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    /// Returns `true` when no operation failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fail the pass as a whole when any single operation failed.
    pub fn into_result(self) -> Result<Vec<PathBuf>, GenerationFailed> {
        if self.failures.is_empty() {
            Ok(self.written)
        } else {
            Err(GenerationFailed {
                attempted: self.attempted(),
                failures: self.failures,
            })
        }
    }
}

/// Plan and run every configured image variant.
///
/// An empty variant list is reported and skipped. Glob errors abort before any image is
/// touched; resize errors are collected in the returned report.
pub fn generate_variants(
    options: &PluginOptions,
    resizer: &dyn ImageResizer,
) -> Result<GenerationReport, DiscoveryError> {
    if options.image_variants.is_empty() {
        info!("no image variants defined, skipping generation");
        return Ok(GenerationReport::default());
    }

    info!("generating image variants");
    let operations = plan_variants(&options.image_variants, &options.assets_dir_abs)?;
    Ok(run_operations(&operations, resizer))
}

/// Run `operations` concurrently and wait for all of them to settle.
pub fn run_operations(operations: &[ResizeOperation], resizer: &dyn ImageResizer) -> GenerationReport {
    let outcomes: Vec<Result<PathBuf, GenerationError>> = operations
        .par_iter()
        .map(|operation| {
            resizer
                .resize(operation)
                .map(|()| operation.output_path.clone())
        })
        .collect();

    let mut report = GenerationReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(path) => {
                info!(variant = %path.display(), "wrote image variant");
                report.written.push(path);
            }
            Err(err) => {
                warn!(error = %err, "image variant failed");
                report.failures.push(err);
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    use image::{Rgba, RgbaImage};
    use serde_json::json;
    use tempfile::tempdir;

    use crate::config::parse_options;

    fn write_png(path: &Path, width: u32, height: u32) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(width, height, Rgba([10, 120, 200, 255]))
            .save(path)
            .unwrap();
    }

    #[derive(Default)]
    struct RecordingResizer {
        seen: Mutex<Vec<ResizeOperation>>,
    }

    impl ImageResizer for RecordingResizer {
        fn resize(&self, operation: &ResizeOperation) -> Result<(), GenerationError> {
            self.seen.lock().unwrap().push(operation.clone());
            Ok(())
        }
    }

    #[test]
    fn empty_variant_list_is_a_no_op() {
        let options = parse_options(&serde_json::Value::Null, Path::new("/srv/app")).unwrap();
        let resizer = RecordingResizer::default();

        let report = generate_variants(&options, &resizer).unwrap();

        assert_eq!(report.attempted(), 0);
        assert!(report.is_success());
        assert!(resizer.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn every_planned_operation_reaches_the_resizer() {
        let temp = tempdir().unwrap();
        let options = parse_options(
            &json!({ "imageVariants": [
                { "src": "img/*.png", "sizes": { "%NAME%-sm.png": 10, "%NAME%-md.png": 20 } }
            ]}),
            temp.path(),
        )
        .unwrap();
        fs::create_dir_all(options.assets_dir_abs.join("img")).unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            fs::write(options.assets_dir_abs.join("img").join(name), b"").unwrap();
        }
        let resizer = RecordingResizer::default();

        let report = generate_variants(&options, &resizer).unwrap();

        assert_eq!(report.attempted(), 6);
        assert_eq!(report.written[0], options.assets_dir_abs.join("img/a-sm.png"));
        assert_eq!(report.written[5], options.assets_dir_abs.join("img/c-md.png"));
        assert_eq!(resizer.seen.lock().unwrap().len(), 6);
    }

    #[test]
    fn corrupt_source_does_not_stop_siblings() {
        let temp = tempdir().unwrap();
        let options = parse_options(
            &json!({ "imageVariants": [
                { "src": "broken/*.png", "sizes": { "%NAME%-sm.png": 4 } },
                { "src": "photos/*.png", "sizes": { "%NAME%-sm.png": 8, "%NAME%-xs.png": 4 } }
            ]}),
            temp.path(),
        )
        .unwrap();
        let assets = &options.assets_dir_abs;
        fs::create_dir_all(assets.join("broken")).unwrap();
        fs::write(assets.join("broken/bad.png"), b"not an image").unwrap();
        write_png(&assets.join("photos/beach.png"), 16, 8);

        let report = generate_variants(&options, &ImageCrateResizer::default()).unwrap();

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path(), assets.join("broken/bad.png").as_path());
        assert!(assets.join("photos/beach-sm.png").exists());
        assert!(assets.join("photos/beach-xs.png").exists());

        let failed = report.into_result().unwrap_err();
        assert_eq!(failed.attempted, 3);
        assert_eq!(failed.failures.len(), 1);
    }

    #[test]
    fn successful_pass_returns_written_paths() {
        let temp = tempdir().unwrap();
        let options = parse_options(
            &json!({ "imageVariants": [
                { "src": "*.png", "sizes": { "%NAME%-sm.png": 100 } }
            ]}),
            temp.path(),
        )
        .unwrap();
        write_png(&options.assets_dir_abs.join("hero.png"), 200, 100);

        let written = generate_variants(&options, &ImageCrateResizer::default())
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(written, vec![options.assets_dir_abs.join("hero-sm.png")]);
        let variant = image::open(&written[0]).unwrap();
        assert_eq!((variant.width(), variant.height()), (100, 50));
    }
}
