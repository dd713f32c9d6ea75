use serde::{Deserialize, Serialize};

/// Normalized outcome of a carrier call, exactly `Success` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Success,
    Error,
}

impl ResultStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Error => "Error",
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Per-package cost breakdown inside a rated service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRate {
    pub base_cost: f64,
    pub option_cost: f64,
    pub total_cost: f64,
    pub weight: f64,
    /// Carrier-computed chargeable weight; may exceed the actual weight
    /// under dimensional-weight pricing.
    pub billed_weight: f64,
    /// Canonical weight unit, `LB` or `KG`.
    pub weight_unit: String,
}

/// One rated shipping service offered by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRate {
    pub messages: Vec<String>,
    pub service_code: String,
    pub service_description: String,
    pub total_cost: f64,
    pub currency_code: String,
    pub package_count: usize,
    pub packages: Vec<PackageRate>,
}

/// Normalized result of a rate quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateResult {
    pub status: ResultStatus,
    pub services: Vec<ServiceRate>,
}

impl RateResult {
    pub fn success(services: Vec<ServiceRate>) -> Self {
        Self {
            status: ResultStatus::Success,
            services,
        }
    }
}

/// One generated label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingLabel {
    pub tracking_number: String,
    /// Base64-encoded label image as returned by the carrier.
    pub label_image: String,
    /// Image format tag, e.g. `gif`.
    pub label_file_type: String,
}

/// Normalized result of a label creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelResult {
    pub status: ResultStatus,
    pub shipment_cost: f64,
    pub labels: Vec<ShippingLabel>,
}

impl LabelResult {
    pub fn success(shipment_cost: f64, labels: Vec<ShippingLabel>) -> Self {
        Self {
            status: ResultStatus::Success,
            shipment_cost,
            labels,
        }
    }
}
