//! Enumerations stored as lowercase text.
//!
//! Both enums are persisted as `TEXT` columns (with a `CHECK` constraint) and
//! travel over JSON in their lowercase form.

use serde::{Deserialize, Serialize};

/// Order processing status.
///
/// The storefront sets `New` on creation. Any status may later be replaced by
/// any other; no transition table is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// The stored/serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid order status: {s}"))
    }
}

/// Vehicle category an order is placed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    /// Passenger cars.
    Passenger,
    /// Trucks, vans and buses.
    Commercial,
    /// Chinese brands (Haval, Chery, Geely, ...), sourced separately.
    Chinese,
}

impl VehicleType {
    /// Every vehicle type, in display order.
    pub const ALL: [Self; 3] = [Self::Passenger, Self::Commercial, Self::Chinese];

    /// The stored/serialized form, also used as a URL segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passenger => "passenger",
            Self::Commercial => "commercial",
            Self::Chinese => "chinese",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("invalid vehicle type: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_defaults_to_new() {
        assert_eq!(OrderStatus::default(), OrderStatus::New);
    }

    #[test]
    fn test_order_status_parse_matches_display() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("NEW".parse::<OrderStatus>().is_err());
        assert!("returned".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_json_is_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_vehicle_type_parse() {
        assert_eq!("chinese".parse::<VehicleType>().unwrap(), VehicleType::Chinese);
        assert!("truck".parse::<VehicleType>().is_err());
    }
}
