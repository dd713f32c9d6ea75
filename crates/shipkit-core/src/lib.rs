//! Core contracts for shipkit.
//!
//! This crate contains:
//! - The carrier-neutral shipment model (packages, shipments) and its
//!   validation
//! - Normalized rate and label result types
//! - Carrier identifiers, the adapter trait and the adapter registry
//! - The carrier transport seam and the UPS adapter
//!
//! A caller builds [`Package`]s, attaches them to a [`Shipment`],
//! constructs a carrier adapter with a [`CarrierConfig`] (directly or via
//! the [`CarrierRegistry`]) and invokes [`Carrier::quote_rates`] or
//! [`Carrier::create_label`] to get a normalized [`RateResult`] or
//! [`LabelResult`].

pub mod adapters;
pub mod carrier;
pub mod config;
pub mod error;
pub mod package;
pub mod results;
pub mod shipment;
pub mod transport;
pub mod units;
pub mod wire;

pub use adapters::UpsAdapter;
pub use carrier::{Carrier, CarrierId, CarrierRegistry};
pub use config::{
    CarrierConfig, Credentials, DimensionUnit, Endpoints, ShipperAddress, WeightUnit,
};
pub use error::{CarrierError, ValidationError};
pub use package::{Package, PackageOptions};
pub use results::{
    LabelResult, PackageRate, RateResult, ResultStatus, ServiceRate, ShippingLabel,
};
pub use shipment::{Shipment, ShipmentData};
pub use transport::{
    HttpTransport, SecurityHeader, Transport, TransportFault, TransportRequest, TransportResponse,
};
pub use wire::{to_list, OneOrMany};
