use std::fs;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::GenerationError;
use crate::models::ResizeOperation;

/// Image processing capability the variant generator delegates to.
///
/// Implementations must be shareable across worker threads: operations of one generation pass
/// run concurrently, each with its own output path.
pub trait ImageResizer: Sync {
    /// Write `operation.source_path` scaled to `operation.target_width` at `operation.output_path`.
    fn resize(&self, operation: &ResizeOperation) -> Result<(), GenerationError>;
}

/// [`ImageResizer`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateResizer {
    filter: FilterType,
}

impl ImageCrateResizer {
    /// Create a resizer using the given resampling filter.
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for ImageCrateResizer {
    fn default() -> Self {
        Self::new(FilterType::Lanczos3)
    }
}

impl ImageResizer for ImageCrateResizer {
    fn resize(&self, operation: &ResizeOperation) -> Result<(), GenerationError> {
        let source = &operation.source_path;
        let output = &operation.output_path;

        let image = image::open(source).map_err(|err| GenerationError::Decode {
            path: source.clone(),
            source: err,
        })?;
        let format = ImageFormat::from_path(output).map_err(|err| GenerationError::Encode {
            path: output.clone(),
            source: err,
        })?;

        let width = operation.target_width;
        let height = scaled_height(image.width(), image.height(), width);
        let resized = encodable(image.resize_exact(width, height, self.filter), format);

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|err| GenerationError::Io {
                path: output.clone(),
                source: err,
            })?;
        }

        resized
            .save_with_format(output, format)
            .map_err(|err| GenerationError::Encode {
                path: output.clone(),
                source: err,
            })
    }
}

/// Height keeping the source aspect ratio at `target_width`, never below one pixel.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height.max(1);
    }
    let scaled = f64::from(height) * f64::from(target_width) / f64::from(width);
    scaled.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

// JPEG has no alpha channel and the WebP encoder only takes 8-bit RGB(A).
fn encodable(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        ImageFormat::WebP => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::Path;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn keeps_aspect_ratio() {
        assert_eq!(scaled_height(400, 300, 100), 75);
        assert_eq!(scaled_height(3, 1, 1), 1);
        assert_eq!(scaled_height(100, 50, 300), 150);
    }

    #[test]
    fn writes_resized_png() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("hero.png");
        write_png(&source, 40, 20);

        let operation = ResizeOperation {
            source_path: source,
            output_path: temp.path().join("hero-sm.png"),
            target_width: 10,
        };
        ImageCrateResizer::default().resize(&operation).unwrap();

        let written = image::open(&operation.output_path).unwrap();
        assert_eq!((written.width(), written.height()), (10, 5));
    }

    #[test]
    fn converts_alpha_for_jpeg_outputs() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("logo.png");
        write_png(&source, 8, 8);

        let operation = ResizeOperation {
            source_path: source,
            output_path: temp.path().join("variants/logo-sm.jpg"),
            target_width: 4,
        };
        ImageCrateResizer::default().resize(&operation).unwrap();

        assert!(operation.output_path.exists());
    }

    #[test]
    fn corrupt_sources_fail_to_decode() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("broken.png");
        fs::write(&source, b"definitely not a png").unwrap();

        let operation = ResizeOperation {
            source_path: source.clone(),
            output_path: temp.path().join("broken-sm.png"),
            target_width: 4,
        };
        let error = ImageCrateResizer::default().resize(&operation).unwrap_err();

        assert!(matches!(error, GenerationError::Decode { .. }));
        assert_eq!(error.path(), source.as_path());
    }

    #[test]
    fn unwritable_destinations_report_the_output_path() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("hero.png");
        write_png(&source, 4, 4);
        let blocker = temp.path().join("blocked");
        fs::write(&blocker, b"a file, not a directory").unwrap();

        let output = blocker.join("hero-sm.png");
        let operation = ResizeOperation {
            source_path: source,
            output_path: output.clone(),
            target_width: 2,
        };
        let error = ImageCrateResizer::default().resize(&operation).unwrap_err();

        assert!(matches!(error, GenerationError::Io { .. }));
        assert_eq!(error.path(), output.as_path());
    }
}
