//! Create shipping labels for a shipment using a chosen service code.
//!
//! Run with `cargo run --example create_label`; `"03"` is UPS Ground.

use shipkit_core::{
    Carrier, CarrierConfig, CarrierId, CarrierRegistry, Credentials, Package, PackageOptions,
    Shipment, ShipmentData,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CarrierConfig {
        credentials: Credentials {
            access_key: String::from("your-access-key"),
            username: String::from("your-username"),
            password: String::from("your-password"),
            account_number: String::from("your-account"),
        },
        notify_receiver: true,
        ..CarrierConfig::default()
    };

    let mut shipment = Shipment::new(ShipmentData {
        receiver_name: String::from("XYZ Corporation"),
        receiver_email: String::from("receiving@xyz.test"),
        receiver_address1: String::from("123 Main St"),
        receiver_city: String::from("New York"),
        receiver_state: String::from("NY"),
        receiver_postal_code: String::from("10001"),
        receiver_country_code: String::from("US"),
        ..ShipmentData::default()
    })?;
    shipment.add_package(Package::with_options(
        3.0,
        [8.0, 4.0, 2.0],
        PackageOptions::default().with_description("ceramic mugs"),
    )?);

    let carrier = CarrierRegistry::with_defaults().create(CarrierId::Ups, &config)?;
    let result = carrier.create_label(&shipment, "03")?;

    println!("shipment cost: {:.2}", result.shipment_cost);
    for label in &result.labels {
        println!(
            "tracking {} ({} bytes of {} label data)",
            label.tracking_number,
            label.label_image.len(),
            label.label_file_type,
        );
    }
    Ok(())
}
