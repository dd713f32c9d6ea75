use serde::{Deserialize, Serialize};

use crate::{CarrierError, Package, ValidationError};

const MAX_FIELD_LEN: usize = 50;

/// Raw addressing and metadata for a shipment.
///
/// Receiver fields are required (validated by [`Shipment::new`]); the
/// `shipping_from_*` fields become required when
/// `ship_from_different_address` is set. Unknown keys in serialized input
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentData {
    pub ship_from_different_address: bool,
    pub shipping_from_name: String,
    pub shipping_from_attention_name: String,
    pub shipping_from_phone: String,
    pub shipping_from_email: String,
    pub shipping_from_address1: String,
    pub shipping_from_address2: String,
    pub shipping_from_address3: String,
    pub shipping_from_city: String,
    pub shipping_from_state: String,
    pub shipping_from_postal_code: String,
    pub shipping_from_country_code: String,

    pub receiver_name: String,
    pub receiver_attention_name: String,
    pub receiver_phone: String,
    pub receiver_email: String,
    pub receiver_address1: String,
    pub receiver_address2: String,
    pub receiver_address3: String,
    pub receiver_city: String,
    pub receiver_state: String,
    pub receiver_postal_code: String,
    pub receiver_country_code: String,
    pub receiver_is_residential: bool,
}

impl ShipmentData {
    fn sanitize(&mut self) {
        for field in self.text_fields_mut() {
            *field = sanitize_field(field);
        }
    }

    fn text_fields_mut(&mut self) -> [&mut String; 22] {
        [
            &mut self.shipping_from_name,
            &mut self.shipping_from_attention_name,
            &mut self.shipping_from_phone,
            &mut self.shipping_from_email,
            &mut self.shipping_from_address1,
            &mut self.shipping_from_address2,
            &mut self.shipping_from_address3,
            &mut self.shipping_from_city,
            &mut self.shipping_from_state,
            &mut self.shipping_from_postal_code,
            &mut self.shipping_from_country_code,
            &mut self.receiver_name,
            &mut self.receiver_attention_name,
            &mut self.receiver_phone,
            &mut self.receiver_email,
            &mut self.receiver_address1,
            &mut self.receiver_address2,
            &mut self.receiver_address3,
            &mut self.receiver_city,
            &mut self.receiver_state,
            &mut self.receiver_postal_code,
            &mut self.receiver_country_code,
        ]
    }

    fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut required: Vec<(&'static str, &str)> = vec![
            ("receiver_name", self.receiver_name.as_str()),
            ("receiver_address1", self.receiver_address1.as_str()),
            ("receiver_city", self.receiver_city.as_str()),
            ("receiver_state", self.receiver_state.as_str()),
            ("receiver_postal_code", self.receiver_postal_code.as_str()),
            ("receiver_country_code", self.receiver_country_code.as_str()),
        ];
        if self.ship_from_different_address {
            required.extend([
                ("shipping_from_name", self.shipping_from_name.as_str()),
                ("shipping_from_address1", self.shipping_from_address1.as_str()),
                ("shipping_from_city", self.shipping_from_city.as_str()),
                ("shipping_from_state", self.shipping_from_state.as_str()),
                (
                    "shipping_from_postal_code",
                    self.shipping_from_postal_code.as_str(),
                ),
                (
                    "shipping_from_country_code",
                    self.shipping_from_country_code.as_str(),
                ),
            ]);
        }

        required
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Strips markup and control characters, trims whitespace and caps the
/// value at 50 characters.
fn sanitize_field(value: &str) -> String {
    let mut cleaned = String::with_capacity(value.len());
    let mut in_tag = false;
    for ch in value.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag || ch.is_control() => {}
            _ => cleaned.push(ch),
        }
    }
    cleaned.trim().chars().take(MAX_FIELD_LEN).collect()
}

/// A validated shipment: sanitized addressing plus an append-only,
/// exclusively owned collection of packages.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    data: ShipmentData,
    packages: Vec<Package>,
}

impl Shipment {
    /// Sanitizes and validates the supplied data. Fails listing every
    /// missing required field, not just the first.
    pub fn new(mut data: ShipmentData) -> Result<Self, ValidationError> {
        if data == ShipmentData::default() {
            return Err(ValidationError::EmptyShipmentData);
        }

        data.sanitize();

        let missing = data.missing_required_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingShipmentFields { fields: missing });
        }

        Ok(Self {
            data,
            packages: Vec::new(),
        })
    }

    /// Appends a package. No upper bound is enforced at this layer.
    pub fn add_package(&mut self, package: Package) {
        self.packages.push(package);
    }

    /// The sanitized shipment data.
    pub fn data(&self) -> &ShipmentData {
        &self.data
    }

    /// All packages in insertion order; fails when none have been added.
    pub fn packages(&self) -> Result<&[Package], CarrierError> {
        if self.packages.is_empty() {
            return Err(CarrierError::EmptyPackages);
        }
        Ok(&self.packages)
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}
