//! Defaulting of the `(level, level_name)` pair.

/// Placeholder for a level or level name that cannot be derived.
pub const UNKNOWN: &str = "unknown";

/// Fill in a missing level name from the level, then default anything still
/// missing to [`UNKNOWN`].
///
/// A present level with a missing name copies the level into the name. In
/// every other case each missing value independently becomes `unknown`.
pub fn default_level_pair(level: Option<&str>, level_name: Option<&str>) -> (String, String) {
    match (level, level_name) {
        (Some(level), None) => (level.to_string(), level.to_string()),
        (level, level_name) => (
            level.unwrap_or(UNKNOWN).to_string(),
            level_name.unwrap_or(UNKNOWN).to_string(),
        ),
    }
}
