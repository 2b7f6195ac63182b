//! Input validation utilities
//!
//! Request types implement [`Validate`] by collecting every problem into a
//! [`ValidationErrors`] map keyed by field name. Lengths are measured in
//! characters, not bytes.

use std::collections::BTreeMap;
use std::fmt;

use email_address::{EmailAddress, Options};
use serde::Serialize;
use url::Url;

/// Field name to problem description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem for `field`. The first problem reported for a field wins.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record the error of a `Result<(), String>` check, if any
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(())` when no problems were recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Implemented by request payloads that are checked before touching storage
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Check that `value` has between `min` and `max` characters (inclusive)
pub fn validate_length(value: &str, min: usize, max: usize, label: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        if min == 0 {
            return Err(format!("{} must be at most {} characters long", label, max));
        }
        return Err(format!(
            "{} must be between {} and {} characters long",
            label, min, max
        ));
    }
    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().count() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    // addr-spec only, no display name
    let options = Options::default().without_display_text();
    if EmailAddress::parse_with_options(email, options).is_err() {
        return Err(format!("{} is not a valid email", email));
    }

    Ok(())
}

/// Validate that `value` parses as an absolute http or https URL
pub fn validate_http_url(value: &str) -> Result<(), String> {
    let parsed = Url::parse(value).map_err(|_| "invalid URL".to_string())?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err("must be a valid HTTP or HTTPS URL".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters() {
        assert!(validate_length("abc", 3, 32, "Username").is_ok());
        assert!(validate_length("ab", 3, 32, "Username").is_err());
        // three characters, six bytes
        assert!(validate_length("äöü", 3, 3, "Username").is_ok());
        assert_eq!(
            validate_length(&"x".repeat(501), 0, 500, "Bio").unwrap_err(),
            "Bio must be at most 500 characters long"
        );
    }

    #[test]
    fn emails_follow_the_address_grammar() {
        for valid in [
            "jane@example.com",
            "jane.doe+tag@mail.example.org",
            "jane@localhost",
            "\"jane doe\"@example.com",
        ] {
            assert!(validate_email(valid).is_ok(), "{} should be accepted", valid);
        }

        for invalid in [
            "",
            "jane",
            "@example.com",
            ".jane@example.com",
            "jane.@example.com",
            "jane..doe@example.com",
            "jane@-example-.com",
            "Jane <jane@example.com>",
        ] {
            assert!(validate_email(invalid).is_err(), "{} should be rejected", invalid);
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&long).unwrap_err(),
            "Email must be at most 254 characters long"
        );
    }

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(validate_http_url("https://x").is_ok());
        assert!(validate_http_url("http://images.example.com/a.png").is_ok());
        assert!(validate_http_url("ftp://x").is_err());
        assert!(validate_http_url("file:///etc/passwd").is_err());
        assert!(validate_http_url("example.com/a.png").is_err());
        assert!(validate_http_url("http://[::1").is_err());
        assert!(validate_http_url("").is_err());
    }

    #[test]
    fn collects_one_message_per_field() {
        let mut errors = ValidationErrors::new();
        errors.check("email", validate_email("nope"));
        errors.add("email", "second problem");
        errors.check("url", Ok(()));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("nope is not a valid email"));
        assert!(!errors.contains("url"));
        assert!(errors.clone().into_result().is_err());
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn serializes_as_a_flat_map() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "required");
        errors.add("author", "too long");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"author": "too long", "title": "required"}));
        assert_eq!(errors.to_string(), "author: too long; title: required");
    }
}
