//! Shared validation for free-text fields.

/// Validate a required text field: non-blank and at most `max_len` characters.
pub fn validate_required_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    validate_max_len(field, value, max_len)
}

/// Validate an optional text field. `None` always passes.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), String> {
    match value {
        Some(v) => validate_max_len(field, v, max_len),
        None => Ok(()),
    }
}

fn validate_max_len(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.chars().count() > max_len {
        return Err(format!("{field} must be at most {max_len} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_text_rejected() {
        let err = validate_required_text("title", "   ", 255).unwrap_err();
        assert_eq!(err, "title is required");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 4 characters, 8 bytes.
        assert!(validate_required_text("name", "ääää", 4).is_ok());
        assert!(validate_required_text("name", "äääää", 4).is_err());
    }

    #[test]
    fn optional_text_none_passes() {
        assert!(validate_optional_text("color", None, 1).is_ok());
        assert!(validate_optional_text("color", Some("#10B981"), 50).is_ok());
        assert!(validate_optional_text("color", Some("#10B981"), 3).is_err());
    }
}
