//! Module identifier normalization.
//!
//! Loaders treat `.` inside a module identifier as part of a file path, so a
//! package such as `validate.js` has to be configured as `validate-js`.

/// Character substituted for anything unsafe in a module identifier
pub const SUBSTITUTE: char = '-';

/// Map a raw package name to a loader-safe module identifier
///
/// Pure and total; `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .map(|c| if is_unsafe(c) { SUBSTITUTE } else { c })
        .collect()
}

/// Check whether `name` is already a module identifier
pub fn is_normalized(name: &str) -> bool {
    !name.chars().any(is_unsafe)
}

fn is_unsafe(c: char) -> bool {
    c == '.'
}
