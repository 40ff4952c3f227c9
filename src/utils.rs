use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Display stand-in for an axis that has no bound Parameter or no values.
pub const PLACEHOLDER_VALUE: &str = "—";

/// Folds a free-form attribute name into its lookup key.
///
/// Strips combining marks after NFD decomposition, lower-cases, and collapses
/// whitespace runs to a single space. `"  Azul   Marinho "` and `"azul marinho"`
/// fold to the same key, as do `"Lilás"` and `"LILAS"`.
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Folds a Parameter key for role matching: lower-case with all whitespace removed.
pub fn normalize_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keeps only ASCII digits, truncates to `width`, then right-pads with `'0'`.
///
/// This is the single sanitization rule for ref, base, size and color codes.
pub fn sanitize_digits(raw: &str, width: usize) -> String {
    let mut out: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(width)
        .collect();
    while out.len() < width {
        out.push('0');
    }
    out
}

/// True when `raw` contains at least one ASCII digit.
pub fn has_digits(raw: &str) -> bool {
    raw.chars().any(|c| c.is_ascii_digit())
}

/// True for exactly two ASCII digits, i.e. `^\d{2}$`.
pub fn is_two_digit_code(raw: &str) -> bool {
    raw.len() == 2 && raw.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_placeholder(value: &str) -> bool {
    value == PLACEHOLDER_VALUE
}
