//! Request-field checks shared by the HTTP handlers.

use crate::errors::AppError;

/// Returns the trimmed value, or a validation error naming the field when it
/// is absent or blank.
pub fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}

/// Drops blank optional strings.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a numeric id sent as text (multipart fields, query strings).
pub fn parse_id(raw: &str, field: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("{field} must be a positive integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required(Some("  Engineering ".into()), "department").unwrap(), "Engineering");
    }

    #[test]
    fn test_required_rejects_blank_and_missing() {
        for value in [None, Some(String::new()), Some("   ".into())] {
            match required(value, "title") {
                Err(AppError::Validation(msg)) => assert_eq!(msg, "title is required"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_optional_drops_blank() {
        assert_eq!(optional(Some(" ".into())), None);
        assert_eq!(optional(Some(" 555-0100 ".into())), Some("555-0100".into()));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 12 ", "jobPostingId").unwrap(), 12);
        assert!(parse_id("0", "jobPostingId").is_err());
        assert!(parse_id("twelve", "jobPostingId").is_err());
    }
}
