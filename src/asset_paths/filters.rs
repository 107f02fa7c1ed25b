use regex::Regex;

fn private_segment() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/_").expect("invalid private segment regex"))
}

fn declaration_file() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|/)[^/]*\.d\.[^./]+$").expect("invalid declaration file regex")
    })
}

/// Determine whether an entry key points into an underscore-prefixed file or directory.
///
/// A leading underscore marks partials and helpers that are imported by real entry points but
/// must never become entries themselves. Only segments after a separator count: the first
/// segment of a key is the configured source directory and never hides its contents.
pub fn is_private_path(key: &str) -> bool {
    private_segment().is_match(key)
}

/// Determine whether a path names a type declaration file such as `types.d.ts`.
pub fn is_declaration_file(key: &str) -> bool {
    declaration_file().is_match(key)
}

/// Filter applied to script entry keys: private paths and type declarations.
pub fn should_skip_script(key: &str) -> bool {
    is_private_path(key) || is_declaration_file(key)
}
