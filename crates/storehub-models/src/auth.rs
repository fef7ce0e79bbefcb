//! Login and registration forms.
//!
//! Both are posted as `application/x-www-form-urlencoded` from the login and
//! registration pages. Validation messages are shown next to the fields, so
//! they are written for end users.

use std::fmt;

use serde::{Deserialize, Deserializer, de};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Reads an HTML checkbox. Browsers post `on` for a ticked box and omit
/// unticked ones; `true`, `1` and `yes` are accepted as well.
fn deserialize_checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct CheckboxVisitor;

    impl de::Visitor<'_> for CheckboxVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a checkbox value")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            Ok(matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "on" | "true" | "1" | "yes"
            ))
        }
    }

    deserializer.deserialize_any(CheckboxVisitor)
}

/// Missing text fields deserialize as empty so they fail validation and are
/// flashed back instead of rejecting the whole post.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
    /// Keep the session alive for the "remember me" window instead of the
    /// idle timeout.
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    pub remember: bool,
}

/// Self-service client registration.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "The name field is required."))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(
        length(min = 8, message = "The password must be at least 8 characters."),
        must_match(
            other = "password_confirmation",
            message = "The password confirmation does not match."
        )
    )]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
    #[validate(length(max = 50, message = "The phone may not be greater than 50 characters."))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_checkbox")]
    #[validate(custom(
        function = "validate_accepted",
        message = "You must accept the terms and conditions."
    ))]
    pub terms: bool,
}

impl RegisterForm {
    /// Phone with empty form input treated as absent.
    pub fn phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
    }
}

fn validate_accepted(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("accepted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Ana Client".to_string(),
            email: "ana@example.com".to_string(),
            password: "password123".to_string(),
            password_confirmation: "password123".to_string(),
            phone: Some("  ".to_string()),
            terms: true,
        }
    }

    #[test]
    fn test_valid_registration() {
        let form = register_form();
        assert!(form.validate().is_ok());
        assert_eq!(form.phone(), None);
    }

    #[test]
    fn test_password_confirmation_must_match() {
        let mut form = register_form();
        form.password_confirmation = "password124".to_string();

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_terms_must_be_accepted() {
        let mut form = register_form();
        form.terms = false;

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("terms"));
    }

    #[test]
    fn test_checkbox_values_from_form_posts() {
        let ticked: RegisterForm = serde_json::from_value(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "password123",
            "password_confirmation": "password123",
            "terms": "on",
        }))
        .unwrap();
        assert!(ticked.terms);
        assert!(ticked.validate().is_ok());

        for (value, expected) in [
            (json!("on"), true),
            (json!("1"), true),
            (json!("YES"), true),
            (json!(true), true),
            (json!("off"), false),
        ] {
            let form: LoginForm = serde_json::from_value(
                json!({ "email": "a@b.co", "password": "x", "remember": value.clone() }),
            )
            .unwrap();
            assert_eq!(form.remember, expected, "{value}");
        }

        let unticked: LoginForm =
            serde_json::from_value(json!({ "email": "a@b.co", "password": "x" })).unwrap();
        assert!(!unticked.remember);
    }

    #[test]
    fn test_missing_fields_fail_validation_instead_of_parsing() {
        let form: RegisterForm = serde_json::from_value(json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "password123",
        }))
        .unwrap();
        assert_eq!(form.password_confirmation, "");
        assert!(!form.terms);

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(errors.field_errors().contains_key("terms"));
    }

    #[test]
    fn test_login_requires_email_shape() {
        let form = LoginForm {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
            remember: false,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(!errors.field_errors().contains_key("password"));
    }
}
