//! Field-keyed validation error lists.
//!
//! Records are validated by explicit functions that collect every failed rule
//! into a [`ValidationErrors`] list instead of stopping at the first one. Each
//! entry keeps the field name and a short message (`can't be blank`); the
//! human-readable full message is derived from both
//! (`First name can't be blank`).

use core::fmt;

use serde::Serialize;

/// Message for a missing required value.
pub const BLANK: &str = "can't be blank";

/// Message for a value that collides with an existing record.
pub const TAKEN: &str = "has already been taken";

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field the rule applies to (snake case, e.g. `first_name`).
    pub field: &'static str,
    /// Message without the field name (e.g. `can't be blank`).
    pub message: String,
}

impl FieldError {
    /// The message prefixed with the humanized field name.
    #[must_use]
    pub fn full_message(&self) -> String {
        format!("{} {}", humanize(self.field), self.message)
    }
}

/// Every rule violation found while validating one record.
///
/// ## Examples
///
/// ```
/// use jungle_core::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.require("first_name", Some("  "));
/// errors.require("last_name", None);
///
/// assert_eq!(
///     errors.full_messages(),
///     vec!["First name can't be blank", "Last name can't be blank"],
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Create an empty error list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a failed rule.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record [`BLANK`] for `field` unless `value` has non-whitespace content.
    ///
    /// Returns `true` when the value is present.
    pub fn require(&mut self, field: &'static str, value: Option<&str>) -> bool {
        if is_blank(value) {
            self.add(field, BLANK);
            false
        } else {
            true
        }
    }

    /// Record [`BLANK`] for `field` when a non-text value is missing.
    ///
    /// Returns `true` when the value is present.
    pub fn require_some<T>(&mut self, field: &'static str, value: Option<&T>) -> bool {
        if value.is_none() {
            self.add(field, BLANK);
            false
        } else {
            true
        }
    }

    /// Whether no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the failed rules in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// All messages prefixed with their humanized field names.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.0.iter().map(FieldError::full_message).collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the error list itself when at least one rule failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Whether an optional text value is missing or only whitespace.
#[must_use]
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Turn a snake case field name into a sentence-case label.
///
/// `password_confirmation` becomes `Password confirmation`.
#[must_use]
pub fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("first_name"), "First name");
        assert_eq!(humanize("password_confirmation"), "Password confirmation");
        assert_eq!(humanize("category"), "Category");
        assert_eq!(humanize(""), "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some("")));
        assert!(is_blank(Some(" \t\n")));
        assert!(!is_blank(Some(" x ")));
    }

    #[test]
    fn test_require_collects_every_failure() {
        let mut errors = ValidationErrors::new();
        assert!(!errors.require("first_name", None));
        assert!(errors.require("last_name", Some("Liang")));
        assert!(!errors.require("email", Some("   ")));

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.full_messages(),
            vec!["First name can't be blank", "Email can't be blank"]
        );
    }

    #[test]
    fn test_require_some() {
        let mut errors = ValidationErrors::new();
        assert!(errors.require_some("price", Some(&10_i64)));
        assert!(!errors.require_some::<i32>("quantity", None));
        assert_eq!(errors.on("quantity"), vec![BLANK]);
        assert!(errors.on("price").is_empty());
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("email", TAKEN);
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Email has already been taken");
    }

    #[test]
    fn test_serializes_as_list() {
        let mut errors = ValidationErrors::new();
        errors.add("name", BLANK);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "name", "message": "can't be blank" }])
        );
    }
}
