//! Error taxonomy shared by the configuration, discovery, and build hooks.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A single schema violation reported while validating plugin options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// Dotted path of the offending field, e.g. `imageVariants.0.sizes.%NAME%.png`.
    pub path: String,
    /// Human readable description of the violated constraint.
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every issue found while validating an options object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid plugin options: {}", render_issues(.issues))]
pub struct SchemaValidationError {
    /// Issues in the order they were encountered.
    pub issues: Vec<SchemaIssue>,
}

impl SchemaValidationError {
    /// Returns `true` when an issue was reported for `path`.
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

fn render_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures raised while turning user input into resolved plugin options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options object violated the schema.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),
    /// The options file exists but could not be read.
    #[error("failed to read options from {}: {source}", .path.display())]
    Read {
        /// Path of the options file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The options file is not valid JSON.
    #[error("failed to parse options from {}: {source}", .path.display())]
    Parse {
        /// Path of the options file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Failures raised while expanding glob patterns.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The glob pattern itself is malformed.
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern {
        /// Pattern as handed to the expander.
        pattern: String,
        /// Error reported by the glob compiler.
        source: globset::Error,
    },
    /// A match could not be re-resolved into an absolute path.
    #[error("failed to resolve {}: {source}", .path.display())]
    Resolve {
        /// Path that failed to resolve.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Failure of a single resize operation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The source image could not be opened or decoded.
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        /// Source image path.
        path: PathBuf,
        /// Error reported by the image decoder.
        source: image::ImageError,
    },
    /// The resized image could not be encoded or written.
    #[error("failed to write {}: {source}", .path.display())]
    Encode {
        /// Output path of the variant.
        path: PathBuf,
        /// Error reported by the image encoder.
        source: image::ImageError,
    },
    /// Filesystem error around the output path, e.g. an uncreatable directory.
    #[error("failed to prepare {}: {source}", .path.display())]
    Io {
        /// Output path of the variant.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl GenerationError {
    /// Path the failure is attributed to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Decode { path, .. } | Self::Encode { path, .. } | Self::Io { path, .. } => path,
        }
    }
}

/// Summary error for a generation pass in which at least one operation failed.
#[derive(Debug, Error)]
#[error("{} of {attempted} image variant(s) failed", .failures.len())]
pub struct GenerationFailed {
    /// Number of resize operations attempted in the pass.
    pub attempted: usize,
    /// Failures collected from the individual operations.
    pub failures: Vec<GenerationError>,
}

/// Failures raised by the build-start directory lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The assets directory could not be removed.
    #[error("failed to empty assets directory {}: {source}", .path.display())]
    Remove {
        /// Directory that was being removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Failures raised while copying static files into the assets directory.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Reading, linking or copying a file failed.
    #[error("failed to copy {}: {source}", .path.display())]
    Io {
        /// Path that was being processed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Walking a static directory failed.
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        /// Directory that was being walked.
        path: PathBuf,
        /// Error reported by the directory walker.
        source: walkdir::Error,
    },
    /// The source pattern could not be expanded.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Umbrella error for callers driving the plugin hooks.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Invalid options.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Glob expansion failure.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    /// Build-start lifecycle failure.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    /// Static copy failure.
    #[error(transparent)]
    Copy(#[from] CopyError),
    /// One or more image variants failed.
    #[error(transparent)]
    Generation(#[from] GenerationFailed),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_every_issue() {
        let error = SchemaValidationError {
            issues: vec![
                SchemaIssue {
                    path: "publicDir".into(),
                    message: "must not be empty".into(),
                },
                SchemaIssue {
                    path: String::new(),
                    message: "expected an object".into(),
                },
            ],
        };

        let rendered = error.to_string();
        assert!(rendered.contains("publicDir: must not be empty"));
        assert!(rendered.contains("(root): expected an object"));
        assert!(error.has_issue_at("publicDir"));
        assert!(!error.has_issue_at("assetsDir"));
    }

    #[test]
    fn generation_error_reports_its_path() {
        let error = GenerationError::Io {
            path: PathBuf::from("/tmp/out/hero-sm.png"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };

        assert_eq!(error.path(), std::path::Path::new("/tmp/out/hero-sm.png"));
        assert!(error.to_string().contains("hero-sm.png"));
    }
}
