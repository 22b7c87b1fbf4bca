use once_cell::sync::Lazy;
use regex::Regex;

// Everything outside the canonical alphabet, applied after lowercasing
static NON_CANONICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("Invalid canonical regex pattern")
});

/// Reduce a label to its comparison form: lowercase ASCII letters and digits only.
///
/// Punctuation, whitespace and any non-ASCII character are dropped, so
/// `"Option 1:"` and `"option-1"` compare equal.
pub fn canonical(text: &str) -> String {
    NON_CANONICAL_RE
        .replace_all(&text.to_lowercase(), "")
        .into_owned()
}
