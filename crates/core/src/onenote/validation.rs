//! Input validation for identifiers and display names
//!
//! Both checks run before any network action so a rejected input never
//! leaves a partial side effect behind.

use crate::error::{Error, Result};

/// Characters the service refuses in section and section group names
pub const RESERVED_NAME_CHARS: [char; 13] = [
    '?', '*', '\\', '/', ':', '<', '>', '|', '&', '#', '\'', '%', '~',
];

/// Characters that would change the structure of the request path
const PATH_BREAKING_CHARS: [char; 4] = ['/', '\\', '?', '#'];

/// Validate and normalize an externally supplied identifier.
///
/// Returns the trimmed identifier. Fails with `InvalidArgument` when the
/// value is empty, whitespace only, a dot segment, or contains characters
/// that would break out of its path segment.
pub fn sanitize_identifier(raw: &str, field: &str) -> Result<String> {
    let clean = raw.trim();

    if clean.is_empty() {
        return Err(Error::InvalidArgument(format!("{field} cannot be empty")));
    }

    if clean == "." || clean == ".." {
        return Err(Error::InvalidArgument(format!(
            "{field} cannot be a relative path segment"
        )));
    }

    if let Some(bad) = clean
        .chars()
        .find(|c| PATH_BREAKING_CHARS.contains(c) || c.is_control())
    {
        return Err(Error::InvalidArgument(format!(
            "{field} contains an illegal character: {}",
            bad.escape_default()
        )));
    }

    Ok(clean.to_string())
}

/// Validate a display name for a new section, section group or notebook.
///
/// The name must be non-empty after trimming and free of every character in
/// [`RESERVED_NAME_CHARS`]. Non-ASCII letters are accepted. The first
/// reserved character found is reported.
pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "display name cannot be empty".to_string(),
        ));
    }

    if let Some(bad) = name.chars().find(|c| RESERVED_NAME_CHARS.contains(c)) {
        return Err(Error::InvalidArgument(format!(
            "display name contains reserved character '{bad}' (reserved: {})",
            RESERVED_NAME_CHARS.iter().collect::<String>()
        )));
    }

    Ok(())
}
