use serde::{Deserialize, Serialize};

use crate::units::round_up_to_tenth;
use crate::ValidationError;

/// Service options attached to a single package.
///
/// `packaging_code` is the carrier's packaging-type code; adapters fall
/// back to their own default when it is unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageOptions {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub packaging_code: Option<String>,
    #[serde(default)]
    pub insured_amount: Option<f64>,
    #[serde(default)]
    pub signature_required: bool,
}

impl PackageOptions {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_packaging_code(mut self, code: impl Into<String>) -> Self {
        self.packaging_code = Some(code.into());
        self
    }

    pub fn with_insured_amount(mut self, amount: f64) -> Self {
        self.insured_amount = Some(amount);
        self
    }

    pub fn with_signature_required(mut self) -> Self {
        self.signature_required = true;
        self
    }
}

/// One physical parcel in a shipment.
///
/// Dimensions are sorted descending at construction, so `length` is always
/// the largest of the three inputs regardless of the order supplied, and
/// each dimension is rounded up to the nearest tenth. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    weight: f64,
    length: f64,
    width: f64,
    height: f64,
    size: f64,
    options: PackageOptions,
}

impl Package {
    /// Builds a package from a weight and three dimensions, in any order.
    pub fn new(weight: f64, dimensions: [f64; 3]) -> Result<Self, ValidationError> {
        Self::with_options(weight, dimensions, PackageOptions::default())
    }

    pub fn with_options(
        weight: f64,
        dimensions: [f64; 3],
        options: PackageOptions,
    ) -> Result<Self, ValidationError> {
        let mut sorted = dimensions;
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let length = round_up_to_tenth(sorted[0]);
        let width = round_up_to_tenth(sorted[1]);
        let height = round_up_to_tenth(sorted[2]);
        validate_measurements(weight, [length, width, height])?;

        let size = (length + 2.0 * (width + height)).round();

        Ok(Self {
            weight,
            length,
            width,
            height,
            size,
            options,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The largest dimension.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Length plus girth, rounded.
    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn options(&self) -> &PackageOptions {
        &self.options
    }

    /// Girth (twice the width plus height), with optional overrides so a
    /// carrier adapter can recompute it under different rounding without
    /// mutating the package.
    pub fn girth(&self, width: Option<f64>, height: Option<f64>) -> f64 {
        let width = width.unwrap_or(self.width);
        let height = height.unwrap_or(self.height);
        2.0 * (width + height)
    }
}

fn validate_measurements(weight: f64, dimensions: [f64; 3]) -> Result<(), ValidationError> {
    const NAMES: [&str; 3] = ["length", "width", "height"];

    let mut fields = Vec::new();
    if !weight.is_finite() || weight <= 0.0 {
        fields.push("weight");
    }
    for (value, name) in dimensions.iter().zip(NAMES) {
        if !value.is_finite() || *value <= 0.0 {
            fields.push(name);
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidPackage { fields })
    }
}
