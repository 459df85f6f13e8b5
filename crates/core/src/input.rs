//! Request inputs accepted by the storefront API.
//!
//! Every input implements [`Validate`]; handlers reject a request with the
//! complete list of failures before any database work happens.

use serde::{Deserialize, Serialize};

use crate::types::{ContactInfo, Email, Part, Vehicle, is_valid_country_code, is_valid_phone};
use crate::validation::{Validate, ValidationErrors, non_blank};

/// Minimum password length for every password-setting path.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Upper bound on password length (bounds hashing cost).
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Upper bound on part lines per order.
pub const MAX_PARTS_PER_ORDER: usize = 50;

/// Minimum contact-form message length.
pub const MIN_MESSAGE_LENGTH: usize = 5;

/// Maximum contact-form message length.
pub const MAX_MESSAGE_LENGTH: usize = 5000;

fn check_password(errors: &mut ValidationErrors, field: &str, password: &str) {
    let len = password.chars().count();
    errors.check(
        len < MIN_PASSWORD_LENGTH,
        field,
        "Пароль должен содержать минимум 6 символов",
    );
    errors.check(len > MAX_PASSWORD_LENGTH, field, "Пароль слишком длинный");
}

fn check_email(errors: &mut ValidationErrors, field: &str, email: &str) {
    if email.trim().is_empty() {
        errors.add(field, "Укажите email");
    } else if Email::parse(email).is_err() {
        errors.add(field, "Неверный email");
    }
}

/// `POST /api/register`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Validate for RegisterInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, "email", &self.email);
        check_password(&mut errors, "password", &self.password);
        errors.check(
            self.full_name.trim().chars().count() < 2,
            "fullName",
            "Имя должно содержать минимум 2 символа",
        );
        if let Some(phone) = non_blank(self.phone.as_deref()) {
            errors.check(!is_valid_phone(phone), "phone", "Введите корректный номер телефона");
        }
        if let Some(code) = non_blank(self.country_code.as_deref()) {
            errors.check(!is_valid_country_code(code), "countryCode", "Неверный код страны");
        }
        errors.into_result()
    }
}

/// `POST /api/login`
///
/// Deliberately not [`Validate`]: any malformed input is reported as invalid
/// credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// `POST /api/orders`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub vehicle: Vehicle,
    pub parts: Vec<Part>,
    pub contact_info: ContactInfo,
}

impl OrderInput {
    /// Copy with every embedded document normalized.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            vehicle: self.vehicle.normalized(),
            parts: self.parts.iter().map(Part::normalized).collect(),
            contact_info: self.contact_info.normalized(),
        }
    }
}

impl Validate for OrderInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(nested) = self.vehicle.validate() {
            errors.nest("vehicle", nested);
        }
        if self.parts.is_empty() {
            errors.add("parts", "Добавьте хотя бы одну запчасть");
        }
        errors.check(
            self.parts.len() > MAX_PARTS_PER_ORDER,
            "parts",
            "Слишком много позиций в заказе",
        );
        for (index, part) in self.parts.iter().enumerate() {
            if let Err(nested) = part.validate() {
                errors.nest(&format!("parts.{index}"), nested);
            }
        }
        if let Err(nested) = self.contact_info.validate() {
            errors.nest("contactInfo", nested);
        }
        errors.into_result()
    }
}

/// `POST /api/guest-order`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestOrderInput {
    #[serde(flatten)]
    pub order: OrderInput,
    #[serde(default)]
    pub create_account: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Validate for GuestOrderInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.order.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if self.create_account {
            if non_blank(self.order.contact_info.email.as_deref()).is_none() {
                errors.add("contactInfo.email", "Укажите email для создания аккаунта");
            }
            check_password(&mut errors, "password", self.password.as_deref().unwrap_or(""));
        }
        errors.into_result()
    }
}

/// `POST /api/contact`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub message: String,
}

impl Validate for ContactMessageInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.name.trim().chars().count() < 2,
            "name",
            "Имя должно содержать минимум 2 символа",
        );
        if let Some(email) = non_blank(self.email.as_deref()) {
            errors.check(Email::parse(email).is_err(), "email", "Неверный email");
        }
        errors.check(!is_valid_phone(&self.phone), "phone", "Введите корректный номер телефона");
        errors.check(
            !is_valid_country_code(&self.country_code),
            "countryCode",
            "Неверный код страны",
        );
        let len = self.message.trim().chars().count();
        errors.check(len < MIN_MESSAGE_LENGTH, "message", "Сообщение слишком короткое");
        errors.check(len > MAX_MESSAGE_LENGTH, "message", "Сообщение слишком длинное");
        errors.into_result()
    }
}

/// `PATCH /api/user/profile`
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.country_code.is_none()
            && self.city.is_none()
    }
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = self.full_name.as_deref() {
            errors.check(
                name.trim().chars().count() < 2,
                "fullName",
                "Имя должно содержать минимум 2 символа",
            );
        }
        if let Some(phone) = self.phone.as_deref() {
            errors.check(!is_valid_phone(phone), "phone", "Введите корректный номер телефона");
        }
        if let Some(code) = self.country_code.as_deref() {
            errors.check(!is_valid_country_code(code), "countryCode", "Неверный код страны");
        }
        if let Some(city) = self.city.as_deref() {
            errors.check(city.trim().chars().count() > 100, "city", "Название города слишком длинное");
        }
        errors.into_result()
    }
}

/// `POST /api/forgot-password`
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordInput {
    #[serde(default)]
    pub email: String,
}

/// `POST /api/verify-reset-token`
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResetTokenInput {
    #[serde(default)]
    pub token: String,
}

/// `POST /api/reset-password`
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordInput {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

impl Validate for ResetPasswordInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(self.token.trim().is_empty(), "token", "Отсутствует токен");
        check_password(&mut errors, "password", &self.password);
        errors.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::VehicleType;

    fn order_json() -> serde_json::Value {
        serde_json::json!({
            "vehicle": {"type": "passenger", "make": "BMW", "model": "X5"},
            "parts": [{"name": "Тормозные колодки", "quantity": 2}],
            "contactInfo": {"name": "Ivan", "phone": "+7 900 1234567", "countryCode": "+7"}
        })
    }

    #[test]
    fn test_order_input_parses_and_validates() {
        let input: OrderInput = serde_json::from_value(order_json()).unwrap();
        assert_eq!(input.vehicle.vehicle_type, VehicleType::Passenger);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_order_requires_parts() {
        let mut json = order_json();
        json["parts"] = serde_json::json!([]);
        let input: OrderInput = serde_json::from_value(json).unwrap();
        assert!(input.validate().unwrap_err().has("parts"));
    }

    #[test]
    fn test_order_reports_nested_paths() {
        let mut json = order_json();
        json["parts"][0]["quantity"] = serde_json::json!(0);
        json["contactInfo"]["phone"] = serde_json::json!("12");
        let input: OrderInput = serde_json::from_value(json).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.has("parts.0.quantity"));
        assert!(errors.has("contactInfo.phone"));
    }

    #[test]
    fn test_guest_order_flattens_order_fields() {
        let mut json = order_json();
        json["createAccount"] = serde_json::json!(true);
        json["password"] = serde_json::json!("secret1");
        json["contactInfo"]["email"] = serde_json::json!("ivan@mail.ru");
        let input: GuestOrderInput = serde_json::from_value(json).unwrap();
        assert!(input.create_account);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_guest_order_create_account_requires_email_and_password() {
        let mut json = order_json();
        json["createAccount"] = serde_json::json!(true);
        json["password"] = serde_json::json!("12345");
        let input: GuestOrderInput = serde_json::from_value(json).unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.has("contactInfo.email"));
        assert!(errors.has("password"));
    }

    #[test]
    fn test_guest_order_without_account_ignores_password() {
        let input: GuestOrderInput = serde_json::from_value(order_json()).unwrap();
        assert!(!input.create_account);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_contact_message_example() {
        let input: ContactMessageInput = serde_json::from_value(serde_json::json!({
            "name": "Ivan",
            "phone": "+7 900 1234567",
            "countryCode": "+7",
            "message": "Нужна помощь с запчастями для BMW"
        }))
        .unwrap();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_contact_message_short_text() {
        let input = ContactMessageInput {
            name: "Ivan".to_string(),
            email: None,
            phone: "+7 900 1234567".to_string(),
            country_code: "+7".to_string(),
            message: "hi".to_string(),
        };
        assert!(input.validate().unwrap_err().has("message"));
    }

    #[test]
    fn test_register_input_rules() {
        let input = RegisterInput {
            email: "bad".to_string(),
            password: "123".to_string(),
            full_name: String::new(),
            phone: Some(String::new()),
            country_code: None,
            city: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.has("email"));
        assert!(errors.has("password"));
        assert!(errors.has("fullName"));
        assert!(!errors.has("phone"));
    }

    #[test]
    fn test_profile_update_partial() {
        let update: ProfileUpdate =
            serde_json::from_value(serde_json::json!({"city": "Казань"})).unwrap();
        assert!(!update.is_empty());
        assert!(update.validate().is_ok());
        assert!(ProfileUpdate::default().is_empty());
    }

    #[test]
    fn test_reset_password_too_short() {
        let input = ResetPasswordInput {
            token: "abc".to_string(),
            password: "12345".to_string(),
        };
        assert!(input.validate().unwrap_err().has("password"));
    }
}
