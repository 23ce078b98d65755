//! Input Validation
//!
//! Local checks run before credentials are sent to the backend. Every rule a
//! value breaks is reported, not just the first.

use secrecy::ExposeSecret;

use crate::error::ValidationError;
use crate::types::{LoginRequest, RegisterRequest};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 10;

/// A password rule shown to the user while they type.
#[derive(Clone, Copy)]
pub struct PasswordRule {
    pub label: &'static str,
    pub message: &'static str,
    check: fn(&str) -> bool,
}

impl std::fmt::Debug for PasswordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordRule")
            .field("label", &self.label)
            .finish()
    }
}

impl PasswordRule {
    pub fn is_met(&self, password: &str) -> bool {
        (self.check)(password)
    }
}

/// Rules a registration password must meet.
pub const PASSWORD_RULES: [PasswordRule; 4] = [
    PasswordRule {
        label: "At least 10 characters",
        message: "Password must be at least 10 characters long",
        check: |p| p.chars().count() >= MIN_PASSWORD_LEN,
    },
    PasswordRule {
        label: "At least one number",
        message: "Password must contain at least one number",
        check: |p| p.chars().any(|c| c.is_ascii_digit()),
    },
    PasswordRule {
        label: "At least one capital letter",
        message: "Password must contain at least one uppercase letter",
        check: |p| p.chars().any(|c| c.is_ascii_uppercase()),
    },
    PasswordRule {
        label: "At least one special character",
        message: "Password must contain at least one special character",
        check: |p| p.chars().any(|c| !c.is_ascii_alphanumeric()),
    },
];

/// Validate a login form.
pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    let mut reasons = Vec::new();
    check_username_length(&request.username, &mut reasons);
    fail_if_any("username", reasons)?;

    if request.password.expose_secret().is_empty() {
        return Err(invalid("password", vec!["Password is required".to_string()]));
    }
    Ok(())
}

/// Validate a registration form.
pub fn validate_registration(request: &RegisterRequest) -> Result<(), ValidationError> {
    let mut reasons = Vec::new();
    check_username_length(&request.username, &mut reasons);
    if !request.username.is_empty()
        && !request
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        reasons.push("Username can only contain letters, numbers, and underscores".to_string());
    }
    fail_if_any("username", reasons)?;

    let password = request.password.expose_secret();
    if password.is_empty() {
        return Err(invalid("password", vec!["Password is required".to_string()]));
    }
    let reasons = PASSWORD_RULES
        .iter()
        .filter(|rule| !rule.is_met(password))
        .map(|rule| rule.message.to_string())
        .collect();
    fail_if_any("password", reasons)
}

fn check_username_length(username: &str, reasons: &mut Vec<String>) {
    if username.is_empty() {
        reasons.push("Username is required".to_string());
    } else if username.chars().count() < MIN_USERNAME_LEN {
        reasons.push("Username must be at least 3 characters long".to_string());
    }
}

fn fail_if_any(field: &str, reasons: Vec<String>) -> Result<(), ValidationError> {
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(invalid(field, reasons))
    }
}

fn invalid(field: &str, reasons: Vec<String>) -> ValidationError {
    ValidationError::Invalid {
        field: field.to_string(),
        reasons,
    }
}

/// Password strength band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Good,
    Strong,
}

impl PasswordStrength {
    /// Band for the share of [`PASSWORD_RULES`] the password meets.
    pub fn evaluate(password: &str) -> Self {
        Self::from_score(Self::score(password))
    }

    /// Share of [`PASSWORD_RULES`] met, between 0 and 1.
    pub fn score(password: &str) -> f64 {
        let met = PASSWORD_RULES.iter().filter(|r| r.is_met(password)).count();
        met as f64 / PASSWORD_RULES.len() as f64
    }

    fn from_score(score: f64) -> Self {
        if score < 0.25 {
            Self::Weak
        } else if score < 0.5 {
            Self::Medium
        } else if score < 0.75 {
            Self::Good
        } else {
            Self::Strong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons(error: ValidationError) -> (String, Vec<String>) {
        match error {
            ValidationError::Invalid { field, reasons } => (field, reasons),
        }
    }

    #[test]
    fn test_login_rules() {
        assert!(validate_login(&LoginRequest::new("jdoe", "x")).is_ok());

        let (field, why) = reasons(validate_login(&LoginRequest::new("jd", "x")).unwrap_err());
        assert_eq!(field, "username");
        assert_eq!(why, vec!["Username must be at least 3 characters long"]);

        let (field, why) = reasons(validate_login(&LoginRequest::new("jdoe", "")).unwrap_err());
        assert_eq!(field, "password");
        assert_eq!(why, vec!["Password is required"]);
    }

    #[test]
    fn test_registration_accepts_strong_password() {
        let request = RegisterRequest::new("j_doe42", "Sup3r-secret!");
        assert!(validate_registration(&request).is_ok());
    }

    #[test]
    fn test_registration_rejects_bad_username() {
        let (field, why) =
            reasons(validate_registration(&RegisterRequest::new("j doe", "Sup3r-secret!")).unwrap_err());
        assert_eq!(field, "username");
        assert_eq!(
            why,
            vec!["Username can only contain letters, numbers, and underscores"]
        );
    }

    #[test]
    fn test_registration_collects_every_password_rule() {
        let (field, why) =
            reasons(validate_registration(&RegisterRequest::new("jdoe", "short")).unwrap_err());
        assert_eq!(field, "password");
        assert_eq!(
            why,
            vec![
                "Password must be at least 10 characters long",
                "Password must contain at least one number",
                "Password must contain at least one uppercase letter",
                "Password must contain at least one special character",
            ]
        );
    }

    #[test]
    fn test_password_strength_bands() {
        assert_eq!(PasswordStrength::evaluate("abc"), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::evaluate("abc1"), PasswordStrength::Medium);
        assert_eq!(PasswordStrength::evaluate("Abc1"), PasswordStrength::Good);
        assert_eq!(PasswordStrength::evaluate("Abc1!"), PasswordStrength::Strong);
        assert_eq!(PasswordStrength::evaluate("Abcdefghij1!"), PasswordStrength::Strong);
        assert_eq!(PasswordStrength::score("Abc1!"), 0.75);
    }
}
