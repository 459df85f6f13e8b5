//! Vehicle and part documents embedded in orders.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::types::status::VehicleType;
use crate::validation::{Validate, ValidationErrors, non_blank};

/// Length of a vehicle identification number.
pub const VIN_LENGTH: usize = 17;

/// Oldest model year accepted.
pub const MIN_YEAR: i32 = 1950;

/// Largest quantity of a single part per order line.
pub const MAX_QUANTITY: u32 = 999;

/// The vehicle parts are requested for.
///
/// Only the type is mandatory: customers often know the VIN alone, or only
/// make and model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<String>,
}

impl Vehicle {
    /// Trim text fields, upper-case the VIN and drop blank optionals.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            vehicle_type: self.vehicle_type,
            vin: non_blank(self.vin.as_deref()).map(str::to_uppercase),
            make: non_blank(self.make.as_deref()).map(str::to_owned),
            model: non_blank(self.model.as_deref()).map(str::to_owned),
            year: self.year,
            engine: non_blank(self.engine.as_deref()).map(str::to_owned),
            fuel: non_blank(self.fuel.as_deref()).map(str::to_owned),
        }
    }

    /// Short human description, e.g. `"Toyota Camry 2018"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let year = self.year.map(|y| y.to_string());
        let parts: Vec<&str> = [self.make.as_deref(), self.model.as_deref(), year.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            self.vin.clone().unwrap_or_default()
        } else {
            parts.join(" ")
        }
    }
}

impl Validate for Vehicle {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(vin) = non_blank(self.vin.as_deref()) {
            errors.check(!is_valid_vin(vin), "vin", "VIN должен содержать 17 символов");
        }
        if let Some(year) = self.year {
            let max_year = chrono::Utc::now().year() + 1;
            errors.check(
                !(MIN_YEAR..=max_year).contains(&year),
                "year",
                "Неверный год выпуска",
            );
        }
        errors.into_result()
    }
}

/// VINs are 17 characters from `A-Z0-9` excluding `I`, `O` and `Q`.
#[must_use]
pub fn is_valid_vin(vin: &str) -> bool {
    let vin = vin.trim();
    vin.len() == VIN_LENGTH
        && vin.chars().all(|c| {
            let c = c.to_ascii_uppercase();
            c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q'))
        })
}

/// A requested part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Part {
    /// Trim text fields and drop blank optionals.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            quantity: self.quantity,
            sku: non_blank(self.sku.as_deref()).map(str::to_owned),
            brand: non_blank(self.brand.as_deref()).map(str::to_owned),
            description: non_blank(self.description.as_deref()).map(str::to_owned),
        }
    }
}

impl Validate for Part {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.name.trim().is_empty(),
            "name",
            "Укажите название запчасти",
        );
        errors.check(
            !(1..=MAX_QUANTITY).contains(&self.quantity),
            "quantity",
            "Количество должно быть от 1 до 999",
        );
        errors.into_result()
    }
}
