use crate::whitespace::collapse_whitespace;

/// Returns `true` for characters removed during normalization: ASCII digits
/// and the 32 ASCII punctuation characters.
#[inline]
fn is_stripped_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch.is_ascii_punctuation()
}

/// Normalize a raw text value.
///
/// Lowercases, drops ASCII digits and punctuation, collapses whitespace runs
/// to a single space and trims the edges. Removed characters are deleted, not
/// replaced by a space, so `"computer-science"` becomes `"computerscience"`.
pub fn normalize_text(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    // Lowercasing can expand a single character into several (e.g. 'İ').
    for lower in input.chars().flat_map(char::to_lowercase) {
        if !is_stripped_char(lower) {
            stripped.push(lower);
        }
    }
    collapse_whitespace(&stripped)
}

/// Normalize an optional cell. Absent input stays absent.
pub fn normalize_field(input: Option<&str>) -> Option<String> {
    input.map(normalize_text)
}

/// Normalize an optional label. Values that normalize to the empty string are
/// treated as absent so they can never act as a vocabulary term.
pub fn normalize_label(input: Option<&str>) -> Option<String> {
    normalize_field(input).filter(|label| !label.is_empty())
}
