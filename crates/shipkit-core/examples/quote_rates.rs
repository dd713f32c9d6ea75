//! Quote rates for a two-package shipment.
//!
//! Run with `cargo run --example quote_rates` after filling in real
//! carrier credentials; against the test environment UPS returns
//! reference rates.

use shipkit_core::{
    Carrier, CarrierConfig, CarrierId, CarrierRegistry, Credentials, Package, PackageOptions,
    Shipment, ShipmentData, ShipperAddress,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CarrierConfig {
        credentials: Credentials {
            access_key: String::from("your-access-key"),
            username: String::from("your-username"),
            password: String::from("your-password"),
            account_number: String::from("your-account"),
        },
        shipper: ShipperAddress {
            name: String::from("Widgets Inc"),
            phone: String::from("3125550100"),
            address1: String::from("1 Factory Rd"),
            city: String::from("Chicago"),
            state: String::from("IL"),
            postal_code: String::from("60606"),
            country_code: String::from("US"),
            ..ShipperAddress::default()
        },
        ..CarrierConfig::default()
    };

    let mut shipment = Shipment::new(ShipmentData {
        receiver_name: String::from("XYZ Corporation"),
        receiver_address1: String::from("123 Main St"),
        receiver_city: String::from("New York"),
        receiver_state: String::from("NY"),
        receiver_postal_code: String::from("10001"),
        receiver_country_code: String::from("US"),
        receiver_is_residential: true,
        ..ShipmentData::default()
    })?;

    shipment.add_package(Package::with_options(
        24.0,
        [10.0, 6.0, 12.0],
        PackageOptions::default()
            .with_insured_amount(274.95)
            .with_signature_required(),
    )?);
    shipment.add_package(Package::new(11.34, [14.2, 16.8, 26.34])?);

    let carrier = CarrierRegistry::with_defaults().create(CarrierId::Ups, &config)?;
    let result = carrier.quote_rates(&shipment)?;

    for service in &result.services {
        println!(
            "{} ({}): {} {:.2} for {} package(s)",
            service.service_description,
            service.service_code,
            service.currency_code,
            service.total_cost,
            service.package_count,
        );
        for message in &service.messages {
            println!("  note: {message}");
        }
    }
    Ok(())
}
