//! Input validation utilities

use common::models::{LoginRequest, RegisterRequest};
use regex::Regex;
use std::sync::OnceLock;

/// Check an email against the accepted `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Validate a registration payload
pub fn validate_registration(request: &RegisterRequest) -> Result<(), String> {
    if request.name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err("All fields are required.".to_string());
    }

    if !is_valid_email(&request.email) {
        return Err("Email must be valid.".to_string());
    }

    Ok(())
}

/// Validate a login payload
pub fn validate_login(request: &LoginRequest) -> Result<(), String> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err("Email and password are required.".to_string());
    }

    if !is_valid_email(&request.email) {
        return Err("Email must be valid.".to_string());
    }

    Ok(())
}

/// Validate a search query, returning the trimmed term
pub fn validate_search_query(query: Option<&str>) -> Result<&str, String> {
    match query.map(str::trim) {
        Some(term) if !term.is_empty() => Ok(term),
        _ => Err("Query is required".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("a@b.co", true)]
    #[case("first.last+tag@sub.domain.org", true)]
    #[case("not-an-email", false)]
    #[case("missing@tld", false)]
    #[case("two@@example.com", false)]
    #[case("spaced out@example.com", false)]
    #[case("", false)]
    fn test_email_pattern(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid);
    }

    #[test]
    fn test_registration_requires_all_fields() {
        let request = RegisterRequest {
            name: "  ".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            validate_registration(&request),
            Err("All fields are required.".to_string())
        );
    }

    #[test]
    fn test_registration_rejects_invalid_email() {
        let request = RegisterRequest {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(
            validate_registration(&request),
            Err("Email must be valid.".to_string())
        );
    }

    #[test]
    fn test_login_requires_credentials() {
        let request = LoginRequest {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(
            validate_login(&request),
            Err("Email and password are required.".to_string())
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn test_blank_search_query_is_rejected(#[case] query: Option<&str>) {
        assert_eq!(
            validate_search_query(query),
            Err("Query is required".to_string())
        );
    }

    #[test]
    fn test_search_query_is_trimmed() {
        assert_eq!(validate_search_query(Some(" picasso ")), Ok("picasso"));
    }
}
