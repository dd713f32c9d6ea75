//! Pure rounding and unit-conversion helpers shared by the shipment model
//! and the carrier adapters.
//!
//! Two distinct rounding passes exist on purpose: dimensions are rounded
//! up to the nearest tenth when a [`crate::Package`] is constructed, and
//! rounded up again to whole units when submitted to a carrier. The two
//! must not be collapsed.

/// Rounds a value up to the next tenth: 2.32 becomes 2.4, 3.0 stays 3.0.
pub fn round_up_to_tenth(value: f64) -> f64 {
    (value * 10.0).ceil() / 10.0
}

/// Rounds a value up to the next whole unit for carrier submission.
pub fn ceil_whole(value: f64) -> u32 {
    value.ceil() as u32
}

/// Splits a weight in pounds into whole pounds and ounces, with ounces
/// rounded up to the nearest tenth of an ounce.
pub fn split_pounds_ounces(pounds: f64) -> (u32, f64) {
    let whole = pounds.trunc() as u32;
    // Normalize the fraction to three decimals before converting so that
    // float noise does not leak into the ounce value.
    let fraction = ((pounds - pounds.trunc()) * 1000.0).round() / 1000.0;
    if fraction <= 0.0 {
        return (whole, 0.0);
    }
    (whole, round_up_to_tenth(fraction * 16.0))
}

/// Converts kilograms to pounds, rounded to two decimals.
pub fn kg_to_pounds(kg: f64) -> f64 {
    round_to_hundredth(kg * 2.20462)
}

/// Converts centimeters to inches, rounded to two decimals.
pub fn cm_to_inches(cm: f64) -> f64 {
    round_to_hundredth(cm * 0.393701)
}

fn round_to_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
