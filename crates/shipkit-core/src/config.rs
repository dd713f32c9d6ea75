use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::CarrierError;

/// Weight unit used for carrier submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightUnit {
    #[default]
    #[serde(rename = "LB")]
    Lb,
    #[serde(rename = "KG")]
    Kg,
}

impl WeightUnit {
    /// Request code expected by the carrier schema.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Lb => "LBS",
            Self::Kg => "KGS",
        }
    }

    /// Canonical unit label used in normalized results.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lb => "LB",
            Self::Kg => "KG",
        }
    }
}

impl Display for WeightUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dimension unit used for carrier submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionUnit {
    #[default]
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "CM")]
    Cm,
}

impl DimensionUnit {
    pub const fn code(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Cm => "CM",
        }
    }
}

impl Display for DimensionUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Shipper (ship-from) address on file with the carrier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipperAddress {
    pub name: String,
    pub attention_name: String,
    pub phone: String,
    pub email: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country_code: String,
}

/// Carrier API credentials. `Debug` redacts the secrets.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub access_key: String,
    pub username: String,
    pub password: String,
    pub account_number: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("account_number", &self.account_number)
            .finish()
    }
}

/// Test and production API base URLs; the `production` flag on
/// [`CarrierConfig`] selects between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub test_url: String,
    pub production_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            test_url: String::from("https://wwwcie.ups.com/webservices"),
            production_url: String::from("https://onlinetools.ups.com/webservices"),
        }
    }
}

/// Immutable configuration for one carrier adapter instance.
///
/// Passed to the adapter constructor by value; there is no process-wide
/// configuration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    pub production: bool,
    pub weight_unit: WeightUnit,
    pub dimension_unit: DimensionUnit,
    pub currency_code: String,
    /// When set and the receiver has an email address, the carrier emails
    /// the tracking number to the receiver.
    pub notify_receiver: bool,
    pub shipper: ShipperAddress,
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    /// Carrier pickup-type code.
    pub pickup_type: String,
    /// Carrier rate/customer-classification code.
    pub rate_type: String,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            production: false,
            weight_unit: WeightUnit::default(),
            dimension_unit: DimensionUnit::default(),
            currency_code: String::from("USD"),
            notify_receiver: false,
            shipper: ShipperAddress::default(),
            credentials: Credentials::default(),
            endpoints: Endpoints::default(),
            pickup_type: String::from("01"),
            rate_type: String::from("00"),
        }
    }
}

impl CarrierConfig {
    /// Checks that the fields every remote call depends on are present.
    pub fn validate(&self) -> Result<(), CarrierError> {
        let mut missing = Vec::new();
        if self.credentials.access_key.is_empty() {
            missing.push("credentials.access_key");
        }
        if self.credentials.username.is_empty() {
            missing.push("credentials.username");
        }
        if self.credentials.password.is_empty() {
            missing.push("credentials.password");
        }
        if self.credentials.account_number.is_empty() {
            missing.push("credentials.account_number");
        }
        if self.api_base().is_empty() {
            missing.push(if self.production {
                "endpoints.production_url"
            } else {
                "endpoints.test_url"
            });
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CarrierError::Configuration(format!(
                "missing fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// API base URL for the configured environment.
    pub fn api_base(&self) -> &str {
        if self.production {
            &self.endpoints.production_url
        } else {
            &self.endpoints.test_url
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> CarrierConfig {
        CarrierConfig {
            credentials: Credentials {
                access_key: String::from("KEY"),
                username: String::from("user"),
                password: String::from("secret"),
                account_number: String::from("A1B2C3"),
            },
            ..CarrierConfig::default()
        }
    }

    #[test]
    fn defaults_are_imperial_test_environment() {
        let config = CarrierConfig::default();
        assert_eq!(config.weight_unit, WeightUnit::Lb);
        assert_eq!(config.dimension_unit, DimensionUnit::In);
        assert_eq!(config.currency_code, "USD");
        assert!(!config.production);
        assert!(config.api_base().contains("wwwcie"));
    }

    #[test]
    fn production_flag_switches_api_base() {
        let config = CarrierConfig {
            production: true,
            ..configured()
        };
        assert!(config.api_base().contains("onlinetools"));
    }

    #[test]
    fn validate_lists_every_missing_credential() {
        let err = CarrierConfig::default().validate().expect_err("must fail");
        let message = err.to_string();
        assert!(message.contains("credentials.access_key"));
        assert!(message.contains("credentials.account_number"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let rendered = format!("{:?}", configured().credentials);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("KEY"));
        assert!(rendered.contains("A1B2C3"));
    }

    #[test]
    fn deserializes_unit_codes() {
        let config: CarrierConfig =
            serde_json::from_str(r#"{"weight_unit":"KG","dimension_unit":"CM"}"#)
                .expect("valid config json");
        assert_eq!(config.weight_unit, WeightUnit::Kg);
        assert_eq!(config.weight_unit.code(), "KGS");
        assert_eq!(config.dimension_unit.code(), "CM");
    }
}
