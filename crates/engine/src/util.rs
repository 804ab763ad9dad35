//! Internal helpers for name validation.
//!
//! These utilities are **not** part of the public API.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Trim a display name and reject blank input.
pub(crate) fn normalize_display_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed)
}

/// Lookup key for a name: case-folded, compatibility decomposed, without
/// combining marks. "Café" and "cafe" share a key.
pub(crate) fn normalize_name_key(display: &str) -> String {
    display
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
