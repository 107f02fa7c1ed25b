//! Plugin option validation, defaulting, and path derivation.
//!
//! Resolution happens in two explicit stages: [`validate_options`] checks a loosely typed
//! JSON value against the option schema and fills in defaults, then [`resolve_options`]
//! derives absolute directories from an explicitly supplied working directory.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ConfigError, SchemaIssue, SchemaValidationError};
use crate::models::{ImageVariantSpec, PluginOptions};

/// Options file looked up in the working directory when none is given explicitly.
pub const DEFAULT_OPTIONS_FILE: &str = "codeigniter.config.json";

const EMPTY_ASSETS_DIR_KEY: &str = "emptyAssetsDir";
const IMAGE_VARIANTS_KEY: &str = "imageVariants";

// Order matches the slots filled in `validate_options`.
const STRING_KEYS: [&str; 7] = [
    "publicDir",
    "assetsDir",
    "resourcesDir",
    "jsDir",
    "stylesDir",
    "staticDir",
    "manifest",
];

fn is_known_key(key: &str) -> bool {
    key == EMPTY_ASSETS_DIR_KEY || key == IMAGE_VARIANTS_KEY || STRING_KEYS.contains(&key)
}

/// Options after schema validation, with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptions {
    /// Empty the public assets directory before building.
    pub empty_assets_dir: bool,
    /// Framework public directory.
    pub public_dir: String,
    /// Public subdirectory where compiled assets are written.
    pub assets_dir: String,
    /// Directory in which source files live.
    pub resources_dir: String,
    /// Resources subdirectory for JavaScript/TypeScript files.
    pub js_dir: String,
    /// Resources subdirectory for CSS files.
    pub styles_dir: String,
    /// Resources subdirectory for files copied as-is.
    pub static_dir: String,
    /// Manifest path inside the public directory.
    pub manifest: String,
    /// Image variants generated after bundling.
    pub image_variants: Vec<ImageVariantSpec>,
}

impl Default for ValidatedOptions {
    fn default() -> Self {
        Self {
            empty_assets_dir: true,
            public_dir: "public".into(),
            assets_dir: "assets".into(),
            resources_dir: "resources".into(),
            js_dir: "js".into(),
            styles_dir: "styles".into(),
            static_dir: "static".into(),
            manifest: ".vite/manifest.json".into(),
            image_variants: Vec::new(),
        }
    }
}

/// Validate a raw options value and apply defaults.
///
/// `null` stands for "no options". Every violation is collected so the caller sees all of
/// them at once; unknown keys are ignored with a warning.
pub fn validate_options(input: &Value) -> Result<ValidatedOptions, SchemaValidationError> {
    let mut options = ValidatedOptions::default();
    let object = match input {
        Value::Null => return Ok(options),
        Value::Object(object) => object,
        other => {
            return Err(SchemaValidationError {
                issues: vec![SchemaIssue {
                    path: String::new(),
                    message: format!("expected an object, received {}", type_name(other)),
                }],
            });
        }
    };

    for key in object.keys() {
        if !is_known_key(key) {
            warn!(key = %key, "ignoring unknown plugin option");
        }
    }

    let mut issues = Vec::new();

    if let Some(value) = object.get(EMPTY_ASSETS_DIR_KEY) {
        match value {
            Value::Bool(flag) => options.empty_assets_dir = *flag,
            other => issues.push(type_issue(EMPTY_ASSETS_DIR_KEY, "boolean", other)),
        }
    }

    let string_slots: [&mut String; 7] = [
        &mut options.public_dir,
        &mut options.assets_dir,
        &mut options.resources_dir,
        &mut options.js_dir,
        &mut options.styles_dir,
        &mut options.static_dir,
        &mut options.manifest,
    ];
    for (key, slot) in STRING_KEYS.into_iter().zip(string_slots) {
        if let Some(value) = object.get(key) {
            if let Some(text) = non_empty_string(key, value, &mut issues) {
                *slot = text;
            }
        }
    }

    if let Some(value) = object.get(IMAGE_VARIANTS_KEY) {
        options.image_variants = image_variants(value, &mut issues);
    }

    if issues.is_empty() {
        Ok(options)
    } else {
        Err(SchemaValidationError { issues })
    }
}

/// Derive absolute directories by joining each relative name onto `cwd`.
///
/// Paths are joined lexically: nothing is canonicalised and the directories need not exist.
pub fn resolve_options(options: ValidatedOptions, cwd: &Path) -> PluginOptions {
    let public_dir_abs = cwd.join(&options.public_dir);
    let assets_dir_abs = public_dir_abs.join(&options.assets_dir);
    let resources_dir_abs = cwd.join(&options.resources_dir);
    let static_dir_abs = resources_dir_abs.join(&options.static_dir);
    let js_dir_abs = resources_dir_abs.join(&options.js_dir);
    let styles_dir_abs = resources_dir_abs.join(&options.styles_dir);

    PluginOptions {
        empty_assets_dir: options.empty_assets_dir,
        public_dir: options.public_dir,
        assets_dir: options.assets_dir,
        resources_dir: options.resources_dir,
        js_dir: options.js_dir,
        styles_dir: options.styles_dir,
        static_dir: options.static_dir,
        manifest: options.manifest,
        image_variants: options.image_variants,
        public_dir_abs,
        assets_dir_abs,
        resources_dir_abs,
        static_dir_abs,
        js_dir_abs,
        styles_dir_abs,
    }
}

/// Validate `input` and resolve it against `cwd` in one call.
pub fn parse_options(input: &Value, cwd: &Path) -> Result<PluginOptions, ConfigError> {
    let validated = validate_options(input)?;
    Ok(resolve_options(validated, cwd))
}

/// Read a raw options value from a JSON file.
pub fn load_options_file(path: &Path) -> Result<Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Look for [`DEFAULT_OPTIONS_FILE`] in `dir`, treating a missing file as empty options.
pub fn discover_options(dir: &Path) -> Result<Value, ConfigError> {
    let candidate = dir.join(DEFAULT_OPTIONS_FILE);
    if !candidate.is_file() {
        return Ok(Value::Null);
    }
    load_options_file(&candidate)
}

/// Location of the options file that [`discover_options`] would read.
pub fn default_options_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_OPTIONS_FILE)
}

fn non_empty_string(path: &str, value: &Value, issues: &mut Vec<SchemaIssue>) -> Option<String> {
    match value {
        Value::String(text) if text.is_empty() => {
            issues.push(SchemaIssue {
                path: path.to_string(),
                message: "must not be empty".into(),
            });
            None
        }
        Value::String(text) => Some(text.clone()),
        other => {
            issues.push(type_issue(path, "string", other));
            None
        }
    }
}

fn image_variants(value: &Value, issues: &mut Vec<SchemaIssue>) -> Vec<ImageVariantSpec> {
    let Value::Array(items) = value else {
        issues.push(type_issue(IMAGE_VARIANTS_KEY, "array", value));
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| image_variant(&format!("{IMAGE_VARIANTS_KEY}.{index}"), item, issues))
        .collect()
}

fn image_variant(
    path: &str,
    value: &Value,
    issues: &mut Vec<SchemaIssue>,
) -> Option<ImageVariantSpec> {
    let Value::Object(object) = value else {
        issues.push(type_issue(path, "object", value));
        return None;
    };

    let src = match object.get("src") {
        Some(Value::String(src)) => Some(src.clone()),
        Some(other) => {
            issues.push(type_issue(&format!("{path}.src"), "string", other));
            None
        }
        None => {
            issues.push(missing_issue(&format!("{path}.src")));
            None
        }
    };

    let sizes = match object.get("sizes") {
        Some(Value::Object(sizes)) => variant_sizes(&format!("{path}.sizes"), sizes, issues),
        Some(other) => {
            issues.push(type_issue(&format!("{path}.sizes"), "object", other));
            None
        }
        None => {
            issues.push(missing_issue(&format!("{path}.sizes")));
            None
        }
    };

    Some(ImageVariantSpec {
        src: src?,
        sizes: sizes?,
    })
}

fn variant_sizes(
    path: &str,
    sizes: &Map<String, Value>,
    issues: &mut Vec<SchemaIssue>,
) -> Option<IndexMap<String, f64>> {
    let before = issues.len();
    let mut widths = IndexMap::with_capacity(sizes.len());

    for (template, width) in sizes {
        let field = format!("{path}.{template}");
        match width.as_f64() {
            Some(width) if width.is_finite() && width > 0.0 => {
                widths.insert(template.clone(), width);
            }
            Some(_) => issues.push(SchemaIssue {
                path: field,
                message: "width must be a positive number".into(),
            }),
            None => issues.push(type_issue(&field, "number", width)),
        }
    }

    (issues.len() == before).then_some(widths)
}

fn type_issue(path: &str, expected: &str, received: &Value) -> SchemaIssue {
    SchemaIssue {
        path: path.to_string(),
        message: format!("expected {expected}, received {}", type_name(received)),
    }
}

fn missing_issue(path: &str) -> SchemaIssue {
    SchemaIssue {
        path: path.to_string(),
        message: "required".into(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
