//! Input validation for request fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid email format.
    InvalidEmail(String),
    /// Value outside an allowed set.
    InvalidValue { field: String, message: String },
    /// Value outside a numeric range.
    OutOfRange { field: String, min: i64, max: i64 },
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::InvalidValue { field, message } => {
                write!(f, "Invalid {}: {}", field, message)
            }
            ValidationError::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum allowed length for titles.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Recognized mood names, best to worst.
pub const MOODS: [&str; 5] = ["verygood", "good", "neutral", "bad", "verybad"];

/// Recognized progress types.
pub const PROGRESS_TYPES: [&str; 3] = ["checkin", "milestone", "reflection"];

/// Recognized persona categories.
pub const PERSONA_CATEGORIES: [&str; 4] = ["coach", "friend", "mentor", "analyst"];

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one character after @
/// - Has at least one dot after @
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    // Basic format check: local@domain.tld
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Validate a password meets the minimum length.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Empty("password".to_string()));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidValue {
            field: "password".to_string(),
            message: format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        });
    }
    Ok(())
}

/// Validate a non-empty, bounded title.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::Empty("title".to_string()));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LENGTH,
            actual: title.len(),
        });
    }
    Ok(())
}

/// Validate a mood name.
pub fn validate_mood(mood: &str) -> Result<(), ValidationError> {
    if MOODS.contains(&mood) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: "mood".to_string(),
            message: format!("unknown mood '{}'", mood),
        })
    }
}

/// Validate a progress type name.
pub fn validate_progress_type(progress_type: &str) -> Result<(), ValidationError> {
    if PROGRESS_TYPES.contains(&progress_type) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: "progress_type".to_string(),
            message: format!("unknown progress type '{}'", progress_type),
        })
    }
}

/// Validate a persona category.
pub fn validate_persona_category(category: &str) -> Result<(), ValidationError> {
    if PERSONA_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: "category".to_string(),
            message: format!("unknown category '{}'", category),
        })
    }
}

/// Validate a completion percentage (0-100).
pub fn validate_completion_percentage(value: i64) -> Result<(), ValidationError> {
    if (0..=100).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "completion_percentage".to_string(),
            min: 0,
            max: 100,
        })
    }
}

/// Validate a difficulty rating (1-5).
pub fn validate_difficulty(value: i64) -> Result<(), ValidationError> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: "difficulty".to_string(),
            min: 1,
            max: 5,
        })
    }
}
