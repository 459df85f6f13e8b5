//! Customer contact details attached to orders.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::validation::{Validate, ValidationErrors, non_blank};

/// Maximum length for free-text comment fields.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Contact details captured with an order.
///
/// Stored as an embedded JSON document on the order row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub country_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl ContactInfo {
    /// Trim every field, lower-case the email and drop blank optionals.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            country_code: self.country_code.trim().to_owned(),
            email: non_blank(self.email.as_deref()).map(str::to_lowercase),
            city: non_blank(self.city.as_deref()).map(str::to_owned),
            comments: non_blank(self.comments.as_deref()).map(str::to_owned),
        }
    }

    /// The parsed email, if one was given and is valid.
    #[must_use]
    pub fn parsed_email(&self) -> Option<Email> {
        non_blank(self.email.as_deref()).and_then(|e| Email::parse(e).ok())
    }
}

impl Validate for ContactInfo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.name.trim().chars().count() < 2,
            "name",
            "Имя должно содержать минимум 2 символа",
        );
        errors.check(
            !is_valid_phone(&self.phone),
            "phone",
            "Введите корректный номер телефона",
        );
        errors.check(
            !is_valid_country_code(&self.country_code),
            "countryCode",
            "Неверный код страны",
        );
        if let Some(email) = non_blank(self.email.as_deref()) {
            errors.check(Email::parse(email).is_err(), "email", "Неверный email");
        }
        if let Some(comments) = self.comments.as_deref() {
            errors.check(
                comments.chars().count() > MAX_COMMENT_LENGTH,
                "comments",
                "Комментарий слишком длинный",
            );
        }
        errors.into_result()
    }
}

/// Phone numbers: 5-20 characters of digits, spaces, `+`, `-`, `(` and `)`,
/// with at least five digits.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    let len = phone.chars().count();
    (5..=20).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
        && phone.chars().filter(char::is_ascii_digit).count() >= 5
}

/// Dialling codes: `+` followed by one to four digits (`+7`, `+375`, `+998`).
#[must_use]
pub fn is_valid_country_code(code: &str) -> bool {
    code.trim().strip_prefix('+').is_some_and(|digits| {
        (1..=4).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> ContactInfo {
        ContactInfo {
            name: "Ivan".to_string(),
            phone: "+7 900 1234567".to_string(),
            country_code: "+7".to_string(),
            email: None,
            city: None,
            comments: None,
        }
    }

    #[test]
    fn test_valid_contact() {
        assert!(contact().validate().is_ok());
    }

    #[test]
    fn test_phone_rules() {
        assert!(is_valid_phone("+7 (900) 123-45-67"));
        assert!(is_valid_phone("12345"));
        assert!(!is_valid_phone("1234"));
        assert!(!is_valid_phone("call me maybe"));
        assert!(!is_valid_phone("+-() +-() +-()"));
    }

    #[test]
    fn test_country_code_rules() {
        assert!(is_valid_country_code("+7"));
        assert!(is_valid_country_code("+375"));
        assert!(!is_valid_country_code("7"));
        assert!(!is_valid_country_code("+12345"));
        assert!(!is_valid_country_code("+"));
    }

    #[test]
    fn test_blank_email_is_absent() {
        let mut info = contact();
        info.email = Some("   ".to_string());
        assert!(info.validate().is_ok());
        assert_eq!(info.normalized().email, None);
    }

    #[test]
    fn test_reports_every_bad_field() {
        let info = ContactInfo {
            name: "I".to_string(),
            phone: "1".to_string(),
            country_code: "7".to_string(),
            email: Some("nope".to_string()),
            city: None,
            comments: None,
        };
        let errors = info.validate().unwrap_err();
        for field in ["name", "phone", "countryCode", "email"] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_normalized_lowercases_email() {
        let mut info = contact();
        info.email = Some(" Ivan@Mail.RU ".to_string());
        info.city = Some("  Москва ".to_string());
        let normalized = info.normalized();
        assert_eq!(normalized.email.as_deref(), Some("ivan@mail.ru"));
        assert_eq!(normalized.city.as_deref(), Some("Москва"));
    }
}
