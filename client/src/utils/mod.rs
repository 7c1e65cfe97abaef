//! Utility modules

pub mod validation;

pub use validation::{
    validate_amount, validate_email, validate_login, validate_name, validate_password,
    ValidationResult,
};
