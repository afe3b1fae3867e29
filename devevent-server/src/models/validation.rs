//! Validation error types

use std::fmt;

use serde::Serialize;

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is shorter than its minimum length
    TooShort { field: &'static str, min: usize },

    /// String doesn't match required format (e.g., time, email)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::TooShort { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidVariant { field, .. } => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Every field error collected by one validation pass.
///
/// Validation does not stop at the first failure; callers get the full
/// list so a form can show all problems at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<ValidationError>);

/// Serializable `{field, message}` pair for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDetail {
    pub field: &'static str,
    pub message: String,
}

impl FieldErrors {
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// True if any error was reported for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    pub fn details(&self) -> Vec<FieldDetail> {
        self.0
            .iter()
            .map(|e| FieldDetail {
                field: e.field(),
                message: e.to_string(),
            })
            .collect()
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Record `Empty` if the trimmed value is blank.
pub(crate) fn require(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    }
}

/// Record `Empty` or `TooShort` for a value with a minimum length in characters.
pub(crate) fn require_min_len(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min: usize,
) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    } else if value.chars().count() < min {
        errors.push(ValidationError::TooShort { field, min });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooShort {
            field: "title",
            min: 3,
        };
        assert_eq!(err.to_string(), "title must be at least 3 characters");
    }

    #[test]
    fn field_errors_join_messages() {
        let mut errors = FieldErrors::default();
        errors.push(ValidationError::Empty { field: "venue" });
        errors.push(ValidationError::InvalidFormat {
            field: "time",
            reason: "must be in HH:mm format (24-hour)",
        });

        assert_eq!(
            errors.to_string(),
            "venue cannot be empty; time: must be in HH:mm format (24-hour)"
        );
        assert!(errors.has_field("time"));
        assert!(!errors.has_field("title"));
        assert_eq!(errors.details()[0].field, "venue");
    }

    #[test]
    fn min_len_counts_chars() {
        let mut errors = FieldErrors::default();
        require_min_len(&mut errors, "title", "ñáé", 3);
        assert!(errors.is_empty());

        require_min_len(&mut errors, "title", "ab", 3);
        require_min_len(&mut errors, "overview", "   ", 10);
        assert_eq!(
            errors.iter().cloned().collect::<Vec<_>>(),
            vec![
                ValidationError::TooShort {
                    field: "title",
                    min: 3
                },
                ValidationError::Empty { field: "overview" },
            ]
        );
    }
}
