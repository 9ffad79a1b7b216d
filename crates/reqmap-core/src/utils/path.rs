//! URL path fragment helpers.
//!
//! Location strings are built by plain concatenation; these helpers keep the
//! fragments that go into them well-formed.

/// Append `/` unless `url` already ends with one
pub fn ensure_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

/// Turn a manifest `main` file into a loader module path
///
/// Strips a leading `./` and a trailing `.js`; loaders append the extension
/// themselves.
pub fn module_path(file: &str) -> String {
    let trimmed = file.trim();
    let without_dot = trimmed.strip_prefix("./").unwrap_or(trimmed);
    without_dot
        .strip_suffix(".js")
        .unwrap_or(without_dot)
        .to_string()
}

/// Check that a relative fragment cannot climb out of its package directory
pub fn is_safe_fragment(fragment: &str) -> bool {
    if fragment.starts_with('/') || fragment.contains("://") {
        return false;
    }

    let mut depth = 0i32;
    for segment in fragment.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            },
            _ => depth += 1,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_trailing_slash() {
        assert_eq!(ensure_trailing_slash("/webjars"), "/webjars/");
        assert_eq!(ensure_trailing_slash("/webjars/"), "/webjars/");
        assert_eq!(ensure_trailing_slash(""), "/");
    }

    #[test]
    fn test_module_path() {
        assert_eq!(module_path("./dist/schema-form.js"), "dist/schema-form");
        assert_eq!(module_path("dist/angular-pouchdb.js"), "dist/angular-pouchdb");
        assert_eq!(module_path("ui-bootstrap-tpls"), "ui-bootstrap-tpls");
        assert_eq!(module_path("foo/bar"), "foo/bar");
    }

    #[test]
    fn test_is_safe_fragment() {
        assert!(is_safe_fragment("when"));
        assert!(is_safe_fragment("dist/./lib"));
        assert!(is_safe_fragment("a/../b"));
        assert!(!is_safe_fragment("../../etc"));
        assert!(!is_safe_fragment("/absolute"));
        assert!(!is_safe_fragment("http://elsewhere/lib"));
    }
}
