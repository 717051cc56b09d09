use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Usernames: ASCII letters, digits and underscores
pub const USERNAME_PATTERN: &str = r"^[a-zA-Z0-9_]+$";

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("username pattern compiles"));

/// Rejects empty and whitespace-only strings
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// User entity, also used as the request body for create and update.
///
/// Constraints are enforced only where a body goes through `ValidatedJson`. Missing
/// fields deserialize to their defaults so the field rules report them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct User {
    /// Numeric identifier, `0` until one is assigned
    pub id: i64,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(
        custom(function = "not_blank"),
        regex(path = *USERNAME, message = "must match \"^[a-zA-Z0-9_]+$\"")
    )]
    pub username: String,
    #[validate(email(message = "must be a well-formed email address"))]
    pub email: String,
}

impl User {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            username: username.into(),
            email: email.into(),
        }
    }

    /// Same user under another id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &validator::ValidationErrors, field: &str) -> Vec<String> {
        errors.field_errors()[field]
            .iter()
            .filter_map(|e| e.message.as_ref().map(ToString::to_string))
            .collect()
    }

    #[test]
    fn test_valid_user_passes() {
        let user = User::new(0, "Ada Lovelace", "ada_l", "ada@example.com");
        assert!(user.validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let user = User::new(0, "   ", "ada", "ada@example.com");
        let errors = user.validate().unwrap_err();

        assert_eq!(messages(&errors, "name"), vec!["must not be blank"]);
        assert!(!errors.field_errors().contains_key("username"));
    }

    #[test]
    fn test_username_pattern() {
        let user = User::new(0, "Ada", "ada-l!", "ada@example.com");
        let errors = user.validate().unwrap_err();

        assert_eq!(
            messages(&errors, "username"),
            vec!["must match \"^[a-zA-Z0-9_]+$\""]
        );
    }

    #[test]
    fn test_empty_username_reports_both_rules() {
        let user = User::new(0, "Ada", "", "ada@example.com");
        let errors = user.validate().unwrap_err();

        let username = messages(&errors, "username");
        assert!(username.contains(&"must not be blank".to_string()));
        assert!(username.contains(&"must match \"^[a-zA-Z0-9_]+$\"".to_string()));
    }

    #[test]
    fn test_bad_email_rejected() {
        let user = User::new(0, "Ada", "ada", "not-an-email");
        let errors = user.validate().unwrap_err();

        assert_eq!(
            messages(&errors, "email"),
            vec!["must be a well-formed email address"]
        );
    }

    #[test]
    fn test_id_defaults_to_zero() {
        let user: User =
            serde_json::from_str(r#"{"name":"Ada","username":"ada","email":"ada@example.com"}"#)
                .unwrap();
        assert_eq!(user.id, 0);
    }

    #[test]
    fn test_missing_fields_fail_field_rules() {
        let user: User = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        let errors = user.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(!fields.contains_key("name"));
        assert!(messages(&errors, "username").contains(&"must not be blank".to_string()));
        assert_eq!(
            messages(&errors, "email"),
            vec!["must be a well-formed email address"]
        );
    }
}
