/// Validation utilities for user input

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }

    /// Convert into a `Result` carrying the error message.
    pub fn into_result(self) -> Result<(), String> {
        match self.error {
            Some(message) if !self.is_valid => Err(message),
            _ => Ok(()),
        }
    }
}

/// Validate email format
pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    if email.is_empty() {
        return ValidationResult::err("Email is required");
    }

    if !email.contains('@') {
        return ValidationResult::err("Invalid email format");
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return ValidationResult::err("Invalid email format");
    }

    if parts[0].is_empty() {
        return ValidationResult::err("Email username cannot be empty");
    }

    if parts[1].is_empty() || !parts[1].contains('.') {
        return ValidationResult::err("Invalid email domain");
    }

    ValidationResult::ok()
}

/// Validate password strength for new accounts
pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }

    if password.chars().count() < 8 {
        return ValidationResult::err("Password must be at least 8 characters");
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_numeric());

    if !has_letter {
        return ValidationResult::err("Password must contain at least one letter");
    }

    if !has_digit {
        return ValidationResult::err("Password must contain at least one number");
    }

    ValidationResult::ok()
}

/// Validate the fields of a login form. Only presence is checked; the
/// gateway decides whether the credentials are right.
pub fn validate_login(email: &str, password: &str) -> ValidationResult {
    if email.trim().is_empty() {
        return ValidationResult::err("Email is required");
    }
    if password.is_empty() {
        return ValidationResult::err("Password is required");
    }
    ValidationResult::ok()
}

/// Validate a first or last name
pub fn validate_name(name: &str, field: &str) -> ValidationResult {
    let name = name.trim();
    if name.is_empty() {
        return ValidationResult::err(format!("{} is required", field));
    }

    if name.chars().count() > 50 {
        return ValidationResult::err(format!("{} must be less than 50 characters", field));
    }

    ValidationResult::ok()
}

/// Validate a top-up or withdrawal amount
pub fn validate_amount(amount: f64) -> ValidationResult {
    if !amount.is_finite() {
        return ValidationResult::err("Invalid amount");
    }

    if amount <= 0.0 {
        return ValidationResult::err("Amount must be greater than zero");
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("test@example.com").is_valid);
        assert!(validate_email("user@domain.co.uk").is_valid);
        assert!(validate_email("a@b.com").is_valid);
        assert!(!validate_email("").is_valid);
        assert!(!validate_email("invalid").is_valid);
        assert!(!validate_email("@example.com").is_valid);
        assert!(!validate_email("test@").is_valid);
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("validpass1").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
        assert!(!validate_password("short1").is_valid);
        assert!(!validate_password("12345678").is_valid); // no letter
        assert!(!validate_password("NoDigitsHere").is_valid);
    }

    #[test]
    fn test_login_only_checks_presence() {
        assert!(validate_login("a@b.com", "x").is_valid);
        assert!(!validate_login("  ", "validpass1").is_valid);
        assert_eq!(
            validate_login("a@b.com", "").error.as_deref(),
            Some("Password is required")
        );
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_name("Ada", "First name").is_valid);
        assert_eq!(
            validate_name("   ", "Last name").error.as_deref(),
            Some("Last name is required")
        );
        assert!(!validate_name(&"x".repeat(51), "First name").is_valid);
    }

    #[test]
    fn test_amount_validation() {
        assert!(validate_amount(500.0).is_valid);
        assert!(!validate_amount(0.0).is_valid);
        assert!(!validate_amount(-10.0).is_valid);
        assert!(!validate_amount(f64::NAN).is_valid);
        assert_eq!(validate_amount(-1.0).into_result(), Err("Amount must be greater than zero".to_string()));
        assert_eq!(validate_amount(1.0).into_result(), Ok(()));
    }
}
