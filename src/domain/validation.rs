//! Note name validation.
//!
//! Names map one-to-one onto file names, so they must be usable as a file
//! name on every desktop platform and unique among active notes regardless
//! of case.

use thiserror::Error;

/// Characters that may not appear in a note name.
pub const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Reason a proposed note name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("note name cannot be empty")]
    EmptyName,

    #[error("note name '{name}' contains forbidden character '{character}'")]
    ForbiddenCharacter { name: String, character: char },

    /// Names starting with `.` become hidden files, which are not listed.
    #[error("note name '{name}' cannot start with '.'")]
    LeadingDot { name: String },

    #[error("a note named '{existing}' already exists")]
    NameTaken { existing: String },
}

/// Validates a proposed note name and returns it trimmed.
///
/// `existing` is the set of active note names. `current` is the name of the
/// note being renamed, if any; it is ignored during the collision check so a
/// note may be renamed to a different case of its own name.
///
/// # Errors
///
/// Returns `ValidationError` if:
/// - The name is empty or whitespace-only
/// - The name contains a forbidden or control character
/// - The name starts with `.`
/// - The name matches another active note case-insensitively
///
/// # Examples
///
/// ```
/// use notebox::domain::{validate_note_name, ValidationError};
///
/// let existing = ["Groceries", "Work"];
/// assert_eq!(validate_note_name("  Ideas ", existing, None).unwrap(), "Ideas");
/// assert!(matches!(
///     validate_note_name("work", existing, None),
///     Err(ValidationError::NameTaken { .. })
/// ));
/// assert!(validate_note_name("WORK", existing, Some("Work")).is_ok());
/// ```
pub fn validate_note_name<'a, I>(
    name: &str,
    existing: I,
    current: Option<&str>,
) -> Result<String, ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if let Some(character) = trimmed
        .chars()
        .find(|c| FORBIDDEN_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(ValidationError::ForbiddenCharacter {
            name: trimmed.to_string(),
            character,
        });
    }

    if trimmed.starts_with('.') {
        return Err(ValidationError::LeadingDot {
            name: trimmed.to_string(),
        });
    }

    let lower = trimmed.to_lowercase();
    if let Some(existing) = existing
        .into_iter()
        .filter(|n| Some(*n) != current)
        .find(|n| n.to_lowercase() == lower)
    {
        return Err(ValidationError::NameTaken {
            existing: existing.to_string(),
        });
    }

    Ok(trimmed.to_string())
}
