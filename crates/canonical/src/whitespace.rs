//! Whitespace normalization.
//!
//! All Unicode whitespace (spaces, tabs, newlines, carriage returns,
//! non-breaking spaces, ...) acts as a delimiter. Segments are re-joined with
//! a single ASCII space, so the result never has leading, trailing or
//! repeated whitespace.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  hello \t\n world  "), "hello world");
//! ```

/// Collapses repeated whitespace, trims edges, and turns newlines and tabs
/// into single spaces.
///
/// Returns an empty string for empty or whitespace-only input.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\r\nworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
