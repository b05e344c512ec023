//! Validation rules for user payloads
//!
//! Two profiles exist:
//!
//! - **minimal**: only `login` is checked (non-empty, letters and digits only)
//! - **full**: `login` as above, plus non-empty `firstName` and `lastName`
//!
//! Rules never short-circuit: every violated rule is recorded, so a single
//! response can report all field problems at once.
//!
//! ```rust
//! use users_service::validation::validate_full;
//!
//! let errors = validate_full("", "", "Doe");
//! assert_eq!(errors.messages("login"), &["Invalid login format".to_string()]);
//! assert_eq!(errors.messages("firstName"), &["Invalid name format".to_string()]);
//! assert!(errors.messages("lastName").is_empty());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name of the login attribute on the wire
pub const LOGIN: &str = "login";
/// Field name of the first name attribute on the wire
pub const FIRST_NAME: &str = "firstName";
/// Field name of the last name attribute on the wire
pub const LAST_NAME: &str = "lastName";

/// Message reported for a malformed login
pub const INVALID_LOGIN: &str = "Invalid login format";
/// Message reported for an empty first or last name
pub const INVALID_NAME: &str = "Invalid name format";

/// Which set of rules to apply to a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationProfile {
    /// Login only
    #[default]
    Minimal,
    /// Login plus both name fields
    Full,
}

/// Accumulated field-level errors
///
/// Serializes as a plain `{ "field": ["message", ...] }` object, which is the
/// body of a 422 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty error set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Fold another error set into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    /// Check if any errors were recorded
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Total number of messages across all fields
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Messages recorded against a field, empty if none
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Convert into `Ok(())` when empty, `Err(self)` otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

/// A login is valid when it is non-empty and made only of letters and digits
#[must_use]
pub fn is_valid_login(login: &str) -> bool {
    !login.is_empty() && login.chars().all(char::is_alphanumeric)
}

/// A name is valid when it is non-empty
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
}

/// Apply the minimal profile
#[must_use]
pub fn validate_minimal(login: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if !is_valid_login(login) {
        errors.add(LOGIN, INVALID_LOGIN);
    }
    errors
}

/// Apply the full profile
#[must_use]
pub fn validate_full(login: &str, first_name: &str, last_name: &str) -> ValidationErrors {
    let mut errors = validate_minimal(login);
    if !is_valid_name(first_name) {
        errors.add(FIRST_NAME, INVALID_NAME);
    }
    if !is_valid_name(last_name) {
        errors.add(LAST_NAME, INVALID_NAME);
    }
    errors
}

/// Apply the given profile
#[must_use]
pub fn validate(
    profile: ValidationProfile,
    login: &str,
    first_name: &str,
    last_name: &str,
) -> ValidationErrors {
    match profile {
        ValidationProfile::Minimal => validate_minimal(login),
        ValidationProfile::Full => validate_full(login, first_name, last_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_rules() {
        assert!(is_valid_login("johndoe375"));
        assert!(is_valid_login("JOHN"));
        assert!(is_valid_login("42"));
        assert!(!is_valid_login(""));
        assert!(!is_valid_login("john doe"));
        assert!(!is_valid_login("john_doe"));
        assert!(!is_valid_login("john-doe"));
        assert!(!is_valid_login("john@doe"));
    }

    #[test]
    fn test_minimal_accepts_valid_login() {
        assert!(!validate_minimal("johndoe375").has_errors());
    }

    #[test]
    fn test_minimal_ignores_names() {
        let errors = validate(ValidationProfile::Minimal, "johndoe", "", "");
        assert!(!errors.has_errors());
    }

    #[test]
    fn test_minimal_rejects_bad_login() {
        let errors = validate_minimal("john doe");
        assert_eq!(errors.messages(LOGIN), &[INVALID_LOGIN.to_string()]);
        assert_eq!(errors.error_count(), 1);
    }

    #[test]
    fn test_full_accumulates_every_error() {
        let errors = validate_full("", "", "");
        assert_eq!(errors.error_count(), 3);
        assert_eq!(errors.messages(LOGIN), &[INVALID_LOGIN.to_string()]);
        assert_eq!(errors.messages(FIRST_NAME), &[INVALID_NAME.to_string()]);
        assert_eq!(errors.messages(LAST_NAME), &[INVALID_NAME.to_string()]);
    }

    #[test]
    fn test_full_accepts_complete_payload() {
        let errors = validate(ValidationProfile::Full, "jdoe", "John", "Doe");
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_merge_appends_messages() {
        let mut errors = ValidationErrors::new();
        errors.add(LOGIN, "first");
        let mut other = ValidationErrors::new();
        other.add(LOGIN, "second");
        other.add(LAST_NAME, "third");

        errors.merge(other);

        assert_eq!(errors.messages(LOGIN), &["first".to_string(), "second".to_string()]);
        assert_eq!(errors.error_count(), 3);
    }

    #[test]
    fn test_serializes_as_field_map() {
        let errors = validate_full("", "John", "");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lastName": ["Invalid name format"],
                "login": ["Invalid login format"],
            })
        );
    }
}
