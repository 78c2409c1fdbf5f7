//! Input validation for cellar operations.
//!
//! Validates secret names before anything reaches the store.

use crate::error::{Result, ValidationError};

/// Validate a secret name.
///
/// Names are colon-delimited namespaces of word characters, `(\w+:)*\w+`:
/// - Only A-Z, a-z, 0-9, underscore and `:`
/// - No empty segment (no leading, trailing or doubled `:`)
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }

    let mut position = 0;
    for (index, segment) in name.split(':').enumerate() {
        if segment.is_empty() {
            return Err(ValidationError::InvalidName {
                name: name.to_string(),
                reason: format!("empty namespace segment {}", index + 1),
            }
            .into());
        }

        for ch in segment.chars() {
            position += 1;
            if !is_word_char(ch) {
                return Err(ValidationError::InvalidName {
                    name: name.to_string(),
                    reason: format!(
                        "invalid character '{}' at position {}. Only letters, digits, underscore and ':' are allowed",
                        ch, position
                    ),
                }
                .into());
            }
        }
        // the separator
        position += 1;
    }

    Ok(())
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Validate file permissions (Unix only).
///
/// Returns the actual mode when it grants more than `allowed_mode`.
#[cfg(unix)]
pub fn excess_permissions(path: &std::path::Path, allowed_mode: u32) -> Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let actual_mode = metadata.permissions().mode() & 0o777;

    if actual_mode & !allowed_mode != 0 {
        return Ok(Some(actual_mode));
    }

    Ok(None)
}
