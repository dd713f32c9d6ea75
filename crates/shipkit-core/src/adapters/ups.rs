//! UPS carrier adapter.
//!
//! Builds the carrier's rate and shipment documents from the neutral
//! shipment model, performs one blocking call per operation through the
//! [`Transport`] seam and normalizes the response. The rate and label
//! documents overlap conceptually but differ structurally (package type
//! lives under `PackagingType` in one and `Packaging` in the other), so
//! each operation has its own typed builder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::carrier::{Carrier, CarrierId};
use crate::transport::{HttpTransport, SecurityHeader, Transport, TransportRequest};
use crate::units::ceil_whole;
use crate::wire::{flexible_f64, to_list, OneOrMany};
use crate::{
    CarrierConfig, CarrierError, LabelResult, Package, PackageRate, RateResult, ServiceRate,
    Shipment, ShipmentData, ShippingLabel,
};

/// UPS service codes and their descriptions.
const SERVICES: [(&str, &str); 11] = [
    ("01", "Next Day Air"),
    ("02", "2nd Day Air"),
    ("03", "Ground"),
    ("07", "Worldwide Express"),
    ("08", "Worldwide Expeditor"),
    ("11", "Standard"),
    ("12", "3 Day Select"),
    ("13", "Next Day Air Saver"),
    ("14", "Next Day Air Early AM"),
    ("59", "2nd Day Air AM"),
    ("65", "World Wide Saver"),
];

/// Packaging-type code for customer-supplied packaging, the default when
/// a package does not name one.
const CUSTOMER_PACKAGING: &str = "02";

/// Delivery-confirmation code for "signature required".
const SIGNATURE_CONFIRMATION: &str = "2";

/// Quantum View notification code for emailing the tracking number.
const TRACKING_NOTIFICATION: &str = "6";

/// Labels are always requested in this raster format.
const LABEL_IMAGE_FORMAT: &str = "GIF";

fn service_description(code: &str) -> Option<&'static str> {
    SERVICES
        .iter()
        .find(|(service_code, _)| *service_code == code)
        .map(|(_, description)| *description)
}

/// Carrier adapter for UPS.
///
/// Holds only its configuration and transport; every call builds, sends
/// and parses independently, so concurrent callers use separate
/// instances per the crate's single-call model.
pub struct UpsAdapter {
    config: CarrierConfig,
    transport: Arc<dyn Transport>,
}

impl UpsAdapter {
    /// Builds an adapter over the production HTTP transport.
    pub fn new(config: CarrierConfig) -> Result<Self, CarrierError> {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Builds an adapter over a caller-supplied transport.
    pub fn with_transport(
        config: CarrierConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, CarrierError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    fn security(&self) -> SecurityHeader {
        SecurityHeader {
            username: self.config.credentials.username.clone(),
            password: self.config.credentials.password.clone(),
            access_key: self.config.credentials.access_key.clone(),
        }
    }

    fn send(&self, path: &str, operation: &str, payload: Value) -> Result<Value, CarrierError> {
        let request = TransportRequest {
            url: format!("{}{path}", self.config.api_base()),
            operation: operation.to_owned(),
            security: self.security(),
            payload,
        };

        let response = self.transport.send(&request).map_err(|fault| {
            let message = format!("{operation} request failed: {}", fault.message());
            CarrierError::RemoteCall {
                message,
                detail: fault.into_detail(),
            }
        })?;
        Ok(response.payload)
    }

    // ------------------------------------------------------------------
    // Rate request
    // ------------------------------------------------------------------

    fn build_rate_request(&self, shipment: &Shipment) -> Result<RateRequest, CarrierError> {
        let data = shipment.data();

        let ship_from = if data.ship_from_different_address {
            Some(RateParty {
                address: ShortAddress {
                    postal_code: data.shipping_from_postal_code.clone(),
                    country_code: data.shipping_from_country_code.clone(),
                    residential_address_indicator: None,
                },
            })
        } else {
            None
        };

        let packages = shipment
            .packages()?
            .iter()
            .map(|package| RatePackage {
                packaging_type: Coded::new(packaging_code(package)),
                dimensions: self.dimensions_payload(package),
                package_weight: self.weight_payload(package),
                service_options: self.service_options_payload(package),
            })
            .collect();

        Ok(RateRequest {
            request: RequestSection {
                request_option: "Shop",
            },
            pickup_type: Coded::new(self.config.pickup_type.clone()),
            customer_classification: Coded::new(self.config.rate_type.clone()),
            shipment: RateShipment {
                shipper: RateShipper {
                    shipper_number: self.config.credentials.account_number.clone(),
                    address: ShortAddress {
                        postal_code: self.config.shipper.postal_code.clone(),
                        country_code: self.config.shipper.country_code.clone(),
                        residential_address_indicator: None,
                    },
                },
                ship_from,
                ship_to: RateParty {
                    address: ShortAddress {
                        postal_code: data.receiver_postal_code.clone(),
                        country_code: data.receiver_country_code.clone(),
                        residential_address_indicator: residential_indicator(data),
                    },
                },
                packages,
            },
        })
    }

    // ------------------------------------------------------------------
    // Shipment (label) request
    // ------------------------------------------------------------------

    fn build_ship_request(
        &self,
        shipment: &Shipment,
        service_code: &str,
    ) -> Result<ShipRequest, CarrierError> {
        let data = shipment.data();
        let shipper = &self.config.shipper;

        let ship_from = if data.ship_from_different_address {
            Some(ShipParty {
                name: data.shipping_from_name.clone(),
                attention_name: data.shipping_from_attention_name.clone(),
                shipper_number: None,
                phone: Phone {
                    number: data.shipping_from_phone.clone(),
                },
                email_address: data.shipping_from_email.clone(),
                address: FullAddress {
                    address_lines: address_lines(
                        &data.shipping_from_address1,
                        &data.shipping_from_address2,
                        &data.shipping_from_address3,
                    ),
                    city: data.shipping_from_city.clone(),
                    state_province_code: data.shipping_from_state.clone(),
                    postal_code: data.shipping_from_postal_code.clone(),
                    country_code: data.shipping_from_country_code.clone(),
                    residential_address_indicator: None,
                },
            })
        } else {
            None
        };

        let notification = if self.config.notify_receiver && !data.receiver_email.is_empty() {
            Some(ShipmentServiceOptions {
                notification: Notification {
                    notification_code: TRACKING_NOTIFICATION,
                    email: NotificationEmail {
                        email_address: data.receiver_email.clone(),
                    },
                },
            })
        } else {
            None
        };

        let packages = shipment
            .packages()?
            .iter()
            .map(|package| ShipPackage {
                packaging: Coded::new(packaging_code(package)),
                // The carrier requires a non-empty description.
                description: package
                    .options()
                    .description
                    .clone()
                    .filter(|description| !description.is_empty())
                    .unwrap_or_else(|| String::from(" ")),
                dimensions: self.dimensions_payload(package),
                package_weight: self.weight_payload(package),
                service_options: self.service_options_payload(package),
            })
            .collect();

        Ok(ShipRequest {
            request: RequestSection {
                request_option: "nonvalidate",
            },
            pickup_type: Coded::new(self.config.pickup_type.clone()),
            customer_classification: Coded::new(self.config.rate_type.clone()),
            shipment: ShipShipment {
                shipper: ShipParty {
                    name: shipper.name.clone(),
                    attention_name: shipper.attention_name.clone(),
                    shipper_number: Some(self.config.credentials.account_number.clone()),
                    phone: Phone {
                        number: shipper.phone.clone(),
                    },
                    email_address: shipper.email.clone(),
                    address: FullAddress {
                        address_lines: address_lines(
                            &shipper.address1,
                            &shipper.address2,
                            &shipper.address3,
                        ),
                        city: shipper.city.clone(),
                        state_province_code: shipper.state.clone(),
                        postal_code: shipper.postal_code.clone(),
                        country_code: shipper.country_code.clone(),
                        residential_address_indicator: None,
                    },
                },
                ship_from,
                ship_to: ShipParty {
                    name: data.receiver_name.clone(),
                    attention_name: data.receiver_attention_name.clone(),
                    shipper_number: None,
                    phone: Phone {
                        number: data.receiver_phone.clone(),
                    },
                    email_address: data.receiver_email.clone(),
                    address: FullAddress {
                        address_lines: address_lines(
                            &data.receiver_address1,
                            &data.receiver_address2,
                            &data.receiver_address3,
                        ),
                        city: data.receiver_city.clone(),
                        state_province_code: data.receiver_state.clone(),
                        postal_code: data.receiver_postal_code.clone(),
                        country_code: data.receiver_country_code.clone(),
                        residential_address_indicator: residential_indicator(data),
                    },
                },
                payment_information: PaymentInformation {
                    shipment_charge: ShipmentCharge {
                        // Bill transportation charges to the shipper.
                        charge_type: "01",
                        bill_shipper: BillShipper {
                            account_number: self.config.credentials.account_number.clone(),
                        },
                    },
                },
                service: Coded::new(service_code.to_owned()),
                label_specification: LabelSpecification {
                    label_image_format: Coded::new(String::from(LABEL_IMAGE_FORMAT)),
                },
                service_options: notification,
                packages,
            },
        })
    }

    // ------------------------------------------------------------------
    // Shared per-package fragments
    // ------------------------------------------------------------------

    fn dimensions_payload(&self, package: &Package) -> DimensionsPayload {
        DimensionsPayload {
            unit_of_measurement: Coded::new(self.config.dimension_unit.code().to_owned()),
            length: ceil_whole(package.length()),
            width: ceil_whole(package.width()),
            height: ceil_whole(package.height()),
        }
    }

    fn weight_payload(&self, package: &Package) -> WeightPayload {
        WeightPayload {
            unit_of_measurement: Coded::new(self.config.weight_unit.code().to_owned()),
            weight: ceil_whole(package.weight()),
        }
    }

    fn service_options_payload(&self, package: &Package) -> Option<ServiceOptionsPayload> {
        let options = package.options();

        let declared_value = options.insured_amount.map(|amount| DeclaredValue {
            currency_code: self.config.currency_code.clone(),
            monetary_value: amount,
        });
        let delivery_confirmation = options.signature_required.then(|| DeliveryConfirmation {
            dcis_type: SIGNATURE_CONFIRMATION,
        });

        if declared_value.is_none() && delivery_confirmation.is_none() {
            return None;
        }
        Some(ServiceOptionsPayload {
            declared_value,
            delivery_confirmation,
        })
    }

    // ------------------------------------------------------------------
    // Response normalization
    // ------------------------------------------------------------------

    fn normalize_rates(&self, raw: Value) -> Result<RateResult, CarrierError> {
        let body: RateResponseBody = serde_json::from_value(raw.clone())
            .map_err(|error| malformed("rate", &error))?;

        ensure_success("rate", &body.response, &raw)?;

        let rated = to_list(body.rated_shipment);
        if rated.is_empty() {
            return Err(CarrierError::UnexpectedResponse(String::from(
                "no rated services in response",
            )));
        }

        let services = rated
            .into_iter()
            .map(|rated| self.normalize_service(rated))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RateResult::success(services))
    }

    fn normalize_service(&self, rated: RatedShipment) -> Result<ServiceRate, CarrierError> {
        let service_code = rated.service.code;
        let description = service_description(&service_code).ok_or_else(|| {
            CarrierError::UnexpectedResponse(format!(
                "unknown service code '{service_code}' in response"
            ))
        })?;

        let messages = to_list(rated.alerts)
            .into_iter()
            .map(|alert| format!("{}: {}", alert.code, alert.description))
            .collect();

        let packages: Vec<PackageRate> = to_list(rated.rated_packages)
            .into_iter()
            .map(normalize_package_rate)
            .collect();
        if packages.is_empty() {
            return Err(CarrierError::UnexpectedResponse(format!(
                "no rated packages for service '{service_code}'"
            )));
        }

        Ok(ServiceRate {
            messages,
            service_description: format!("UPS {description}"),
            service_code,
            total_cost: rated.total_charges.monetary_value,
            currency_code: rated.total_charges.currency_code,
            package_count: packages.len(),
            packages,
        })
    }

    fn normalize_labels(&self, raw: Value) -> Result<LabelResult, CarrierError> {
        let body: ShipResponseBody = serde_json::from_value(raw.clone())
            .map_err(|error| malformed("shipment", &error))?;

        ensure_success("shipment", &body.response, &raw)?;

        let results = body.shipment_results.ok_or_else(|| {
            CarrierError::UnexpectedResponse(String::from("no shipment results in response"))
        })?;
        let shipment_cost = results
            .shipment_charges
            .ok_or_else(|| {
                CarrierError::UnexpectedResponse(String::from(
                    "no shipment charges in response",
                ))
            })?
            .total_charges
            .monetary_value;

        let labels: Vec<ShippingLabel> = to_list(results.package_results)
            .into_iter()
            .map(|result| ShippingLabel {
                tracking_number: result.tracking_number,
                label_image: result
                    .shipping_label
                    .map(|label| label.graphic_image)
                    .unwrap_or_default(),
                label_file_type: LABEL_IMAGE_FORMAT.to_ascii_lowercase(),
            })
            .collect();
        if labels.is_empty() {
            return Err(CarrierError::UnexpectedResponse(String::from(
                "no labels in response",
            )));
        }

        Ok(LabelResult::success(shipment_cost, labels))
    }
}

impl Carrier for UpsAdapter {
    fn id(&self) -> CarrierId {
        CarrierId::Ups
    }

    fn quote_rates(&self, shipment: &Shipment) -> Result<RateResult, CarrierError> {
        let request = self.build_rate_request(shipment)?;
        let payload = serde_json::to_value(&request)?;
        let raw = self.send("/Rate", "ProcessRate", payload)?;
        self.normalize_rates(raw)
    }

    fn create_label(
        &self,
        shipment: &Shipment,
        service_code: &str,
    ) -> Result<LabelResult, CarrierError> {
        let request = self.build_ship_request(shipment, service_code)?;
        let payload = serde_json::to_value(&request)?;
        let raw = self.send("/Ship", "ProcessShipment", payload)?;
        self.normalize_labels(raw)
    }
}

fn packaging_code(package: &Package) -> String {
    package
        .options()
        .packaging_code
        .clone()
        .unwrap_or_else(|| String::from(CUSTOMER_PACKAGING))
}

/// The carrier flags residential destinations with an empty indicator
/// element whose presence is the signal.
fn residential_indicator(data: &ShipmentData) -> Option<String> {
    data.receiver_is_residential.then(String::new)
}

/// Multi-line address: lines two and three are appended only when set.
fn address_lines(line1: &str, line2: &str, line3: &str) -> Vec<String> {
    let mut lines = vec![line1.to_owned()];
    if !line2.is_empty() {
        lines.push(line2.to_owned());
    }
    if !line3.is_empty() {
        lines.push(line3.to_owned());
    }
    lines
}

fn ensure_success(
    operation: &str,
    response: &ResponseSection,
    raw: &Value,
) -> Result<(), CarrierError> {
    // Anything other than a literal Success status is an error.
    if response.response_status.description == "Success" {
        return Ok(());
    }
    Err(CarrierError::remote_call(
        format!(
            "carrier rejected the {operation} request: {}",
            response.response_status.description
        ),
        Some(raw.clone()),
    ))
}

fn malformed(operation: &str, error: &serde_json::Error) -> CarrierError {
    CarrierError::UnexpectedResponse(format!("malformed {operation} response: {error}"))
}

fn normalize_package_rate(detail: RatedPackageDetail) -> PackageRate {
    PackageRate {
        base_cost: detail.transportation_charges.monetary_value,
        option_cost: detail.service_options_charges.monetary_value,
        total_cost: detail.total_charges.monetary_value,
        weight: detail.weight,
        billed_weight: detail.billing_weight.weight,
        weight_unit: canonical_weight_unit(&detail.billing_weight.unit_of_measurement.code),
    }
}

/// Canonicalizes the carrier's billing-weight unit strings.
fn canonical_weight_unit(code: &str) -> String {
    match code {
        "LBS" => String::from("LB"),
        "KGS" => String::from("KG"),
        other => other.to_owned(),
    }
}

// ----------------------------------------------------------------------
// Outbound documents
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
struct Coded {
    #[serde(rename = "Code")]
    code: String,
}

impl Coded {
    fn new(code: String) -> Self {
        Self { code }
    }
}

#[derive(Debug, Clone, Serialize)]
struct RequestSection {
    #[serde(rename = "RequestOption")]
    request_option: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct RateRequest {
    #[serde(rename = "Request")]
    request: RequestSection,
    #[serde(rename = "PickupType")]
    pickup_type: Coded,
    #[serde(rename = "CustomerClassification")]
    customer_classification: Coded,
    #[serde(rename = "Shipment")]
    shipment: RateShipment,
}

#[derive(Debug, Clone, Serialize)]
struct RateShipment {
    #[serde(rename = "Shipper")]
    shipper: RateShipper,
    #[serde(rename = "ShipFrom", skip_serializing_if = "Option::is_none")]
    ship_from: Option<RateParty>,
    #[serde(rename = "ShipTo")]
    ship_to: RateParty,
    #[serde(rename = "Package")]
    packages: Vec<RatePackage>,
}

#[derive(Debug, Clone, Serialize)]
struct RateShipper {
    #[serde(rename = "ShipperNumber")]
    shipper_number: String,
    #[serde(rename = "Address")]
    address: ShortAddress,
}

#[derive(Debug, Clone, Serialize)]
struct RateParty {
    #[serde(rename = "Address")]
    address: ShortAddress,
}

/// Rate requests only need postal routing, not the full address.
#[derive(Debug, Clone, Serialize)]
struct ShortAddress {
    #[serde(rename = "PostalCode")]
    postal_code: String,
    #[serde(rename = "CountryCode")]
    country_code: String,
    #[serde(
        rename = "ResidentialAddressIndicator",
        skip_serializing_if = "Option::is_none"
    )]
    residential_address_indicator: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RatePackage {
    #[serde(rename = "PackagingType")]
    packaging_type: Coded,
    #[serde(rename = "Dimensions")]
    dimensions: DimensionsPayload,
    #[serde(rename = "PackageWeight")]
    package_weight: WeightPayload,
    #[serde(rename = "PackageServiceOptions", skip_serializing_if = "Option::is_none")]
    service_options: Option<ServiceOptionsPayload>,
}

#[derive(Debug, Clone, Serialize)]
struct DimensionsPayload {
    #[serde(rename = "UnitOfMeasurement")]
    unit_of_measurement: Coded,
    #[serde(rename = "Length")]
    length: u32,
    #[serde(rename = "Width")]
    width: u32,
    #[serde(rename = "Height")]
    height: u32,
}

#[derive(Debug, Clone, Serialize)]
struct WeightPayload {
    #[serde(rename = "UnitOfMeasurement")]
    unit_of_measurement: Coded,
    #[serde(rename = "Weight")]
    weight: u32,
}

#[derive(Debug, Clone, Serialize)]
struct ServiceOptionsPayload {
    #[serde(rename = "DeclaredValue", skip_serializing_if = "Option::is_none")]
    declared_value: Option<DeclaredValue>,
    #[serde(rename = "DeliveryConfirmation", skip_serializing_if = "Option::is_none")]
    delivery_confirmation: Option<DeliveryConfirmation>,
}

#[derive(Debug, Clone, Serialize)]
struct DeclaredValue {
    #[serde(rename = "CurrencyCode")]
    currency_code: String,
    #[serde(rename = "MonetaryValue")]
    monetary_value: f64,
}

#[derive(Debug, Clone, Serialize)]
struct DeliveryConfirmation {
    #[serde(rename = "DCISType")]
    dcis_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct ShipRequest {
    #[serde(rename = "Request")]
    request: RequestSection,
    #[serde(rename = "PickupType")]
    pickup_type: Coded,
    #[serde(rename = "CustomerClassification")]
    customer_classification: Coded,
    #[serde(rename = "Shipment")]
    shipment: ShipShipment,
}

#[derive(Debug, Clone, Serialize)]
struct ShipShipment {
    #[serde(rename = "Shipper")]
    shipper: ShipParty,
    #[serde(rename = "ShipFrom", skip_serializing_if = "Option::is_none")]
    ship_from: Option<ShipParty>,
    #[serde(rename = "ShipTo")]
    ship_to: ShipParty,
    #[serde(rename = "PaymentInformation")]
    payment_information: PaymentInformation,
    #[serde(rename = "Service")]
    service: Coded,
    #[serde(rename = "LabelSpecification")]
    label_specification: LabelSpecification,
    #[serde(rename = "ShipmentServiceOptions", skip_serializing_if = "Option::is_none")]
    service_options: Option<ShipmentServiceOptions>,
    #[serde(rename = "Package")]
    packages: Vec<ShipPackage>,
}

#[derive(Debug, Clone, Serialize)]
struct ShipParty {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "AttentionName")]
    attention_name: String,
    #[serde(rename = "ShipperNumber", skip_serializing_if = "Option::is_none")]
    shipper_number: Option<String>,
    #[serde(rename = "Phone")]
    phone: Phone,
    #[serde(rename = "EMailAddress")]
    email_address: String,
    #[serde(rename = "Address")]
    address: FullAddress,
}

#[derive(Debug, Clone, Serialize)]
struct Phone {
    #[serde(rename = "Number")]
    number: String,
}

#[derive(Debug, Clone, Serialize)]
struct FullAddress {
    #[serde(rename = "AddressLine")]
    address_lines: Vec<String>,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "StateProvinceCode")]
    state_province_code: String,
    #[serde(rename = "PostalCode")]
    postal_code: String,
    #[serde(rename = "CountryCode")]
    country_code: String,
    #[serde(
        rename = "ResidentialAddressIndicator",
        skip_serializing_if = "Option::is_none"
    )]
    residential_address_indicator: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct PaymentInformation {
    #[serde(rename = "ShipmentCharge")]
    shipment_charge: ShipmentCharge,
}

#[derive(Debug, Clone, Serialize)]
struct ShipmentCharge {
    #[serde(rename = "Type")]
    charge_type: &'static str,
    #[serde(rename = "BillShipper")]
    bill_shipper: BillShipper,
}

#[derive(Debug, Clone, Serialize)]
struct BillShipper {
    #[serde(rename = "AccountNumber")]
    account_number: String,
}

#[derive(Debug, Clone, Serialize)]
struct LabelSpecification {
    #[serde(rename = "LabelImageFormat")]
    label_image_format: Coded,
}

#[derive(Debug, Clone, Serialize)]
struct ShipmentServiceOptions {
    #[serde(rename = "Notification")]
    notification: Notification,
}

#[derive(Debug, Clone, Serialize)]
struct Notification {
    #[serde(rename = "NotificationCode")]
    notification_code: &'static str,
    #[serde(rename = "EMail")]
    email: NotificationEmail,
}

#[derive(Debug, Clone, Serialize)]
struct NotificationEmail {
    #[serde(rename = "EMailAddress")]
    email_address: String,
}

#[derive(Debug, Clone, Serialize)]
struct ShipPackage {
    #[serde(rename = "Packaging")]
    packaging: Coded,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Dimensions")]
    dimensions: DimensionsPayload,
    #[serde(rename = "PackageWeight")]
    package_weight: WeightPayload,
    #[serde(rename = "PackageServiceOptions", skip_serializing_if = "Option::is_none")]
    service_options: Option<ServiceOptionsPayload>,
}

// ----------------------------------------------------------------------
// Inbound documents
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ResponseSection {
    #[serde(rename = "ResponseStatus", default)]
    response_status: CodeDescription,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CodeDescription {
    #[serde(rename = "Code", default)]
    code: String,
    #[serde(rename = "Description", default)]
    description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Charges {
    #[serde(rename = "CurrencyCode", default)]
    currency_code: String,
    #[serde(rename = "MonetaryValue", deserialize_with = "flexible_f64", default)]
    monetary_value: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct RateResponseBody {
    #[serde(rename = "Response")]
    response: ResponseSection,
    #[serde(rename = "RatedShipment", default)]
    rated_shipment: Option<OneOrMany<RatedShipment>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RatedShipment {
    #[serde(rename = "Service")]
    service: CodeDescription,
    #[serde(rename = "RatedShipmentAlert", default)]
    alerts: Option<OneOrMany<CodeDescription>>,
    #[serde(rename = "TotalCharges")]
    total_charges: Charges,
    #[serde(rename = "RatedPackage", default)]
    rated_packages: Option<OneOrMany<RatedPackageDetail>>,
}

#[derive(Debug, Clone, Deserialize)]
struct RatedPackageDetail {
    #[serde(rename = "TransportationCharges")]
    transportation_charges: Charges,
    #[serde(rename = "ServiceOptionsCharges", default)]
    service_options_charges: Charges,
    #[serde(rename = "TotalCharges")]
    total_charges: Charges,
    #[serde(rename = "Weight", deserialize_with = "flexible_f64", default)]
    weight: f64,
    #[serde(rename = "BillingWeight")]
    billing_weight: BillingWeight,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BillingWeight {
    #[serde(rename = "UnitOfMeasurement", default)]
    unit_of_measurement: CodeDescription,
    #[serde(rename = "Weight", deserialize_with = "flexible_f64", default)]
    weight: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct ShipResponseBody {
    #[serde(rename = "Response")]
    response: ResponseSection,
    #[serde(rename = "ShipmentResults", default)]
    shipment_results: Option<ShipmentResults>,
}

#[derive(Debug, Clone, Deserialize)]
struct ShipmentResults {
    #[serde(rename = "ShipmentCharges", default)]
    shipment_charges: Option<ShipmentChargesSection>,
    #[serde(rename = "PackageResults", default)]
    package_results: Option<OneOrMany<PackageResultDetail>>,
}

#[derive(Debug, Clone, Deserialize)]
struct ShipmentChargesSection {
    #[serde(rename = "TotalCharges")]
    total_charges: Charges,
}

#[derive(Debug, Clone, Deserialize)]
struct PackageResultDetail {
    #[serde(rename = "TrackingNumber", default)]
    tracking_number: String,
    #[serde(rename = "ShippingLabel", default)]
    shipping_label: Option<LabelImage>,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelImage {
    #[serde(rename = "GraphicImage", default)]
    graphic_image: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::transport::TransportResponse;
    use crate::{PackageOptions, ShipmentData};

    struct RecordingTransport {
        payload: Value,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl RecordingTransport {
        fn returning(payload: Value) -> Self {
            Self {
                payload,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded(&self) -> Vec<TransportRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl Transport for RecordingTransport {
        fn send(
            &self,
            request: &TransportRequest,
        ) -> Result<TransportResponse, crate::transport::TransportFault> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request.clone());
            Ok(TransportResponse {
                payload: self.payload.clone(),
            })
        }
    }

    fn config() -> CarrierConfig {
        CarrierConfig {
            credentials: crate::config::Credentials {
                access_key: String::from("KEY"),
                username: String::from("user"),
                password: String::from("secret"),
                account_number: String::from("A1B2C3"),
            },
            shipper: crate::config::ShipperAddress {
                name: String::from("Widgets Inc"),
                attention_name: String::from("Shipping Dept"),
                phone: String::from("3125550100"),
                email: String::from("ship@widgets.test"),
                address1: String::from("1 Factory Rd"),
                address2: String::from("Dock 4"),
                address3: String::new(),
                city: String::from("Chicago"),
                state: String::from("IL"),
                postal_code: String::from("60606"),
                country_code: String::from("US"),
            },
            ..CarrierConfig::default()
        }
    }

    fn shipment() -> Shipment {
        let mut shipment = Shipment::new(ShipmentData {
            receiver_name: String::from("XYZ Corporation"),
            receiver_address1: String::from("123 Main St"),
            receiver_city: String::from("New York"),
            receiver_state: String::from("NY"),
            receiver_postal_code: String::from("10001"),
            receiver_country_code: String::from("US"),
            receiver_email: String::from("buyer@xyz.test"),
            receiver_is_residential: true,
            ..ShipmentData::default()
        })
        .expect("valid shipment");

        shipment.add_package(
            Package::with_options(
                24.0,
                [10.0, 6.0, 12.0],
                PackageOptions::default()
                    .with_insured_amount(274.95)
                    .with_signature_required(),
            )
            .expect("valid package"),
        );
        shipment.add_package(Package::new(11.34, [14.2, 16.8, 26.34]).expect("valid package"));
        shipment
    }

    fn success_rate_payload() -> Value {
        json!({
            "Response": {"ResponseStatus": {"Code": "1", "Description": "Success"}},
            "RatedShipment": {
                "Service": {"Code": "03"},
                "RatedShipmentAlert": {"Code": "110971", "Description": "Rate is for information only"},
                "TotalCharges": {"CurrencyCode": "USD", "MonetaryValue": "37.15"},
                "RatedPackage": [
                    {
                        "TransportationCharges": {"MonetaryValue": "15.20"},
                        "ServiceOptionsCharges": {"MonetaryValue": "6.55"},
                        "TotalCharges": {"MonetaryValue": "21.75"},
                        "Weight": "24.0",
                        "BillingWeight": {"UnitOfMeasurement": {"Code": "LBS"}, "Weight": "24.0"}
                    },
                    {
                        "TransportationCharges": {"MonetaryValue": "15.40"},
                        "ServiceOptionsCharges": {"MonetaryValue": "0.00"},
                        "TotalCharges": {"MonetaryValue": "15.40"},
                        "Weight": "12.0",
                        "BillingWeight": {"UnitOfMeasurement": {"Code": "LBS"}, "Weight": "31.0"}
                    }
                ]
            }
        })
    }

    #[test]
    fn rate_request_targets_the_rate_endpoint_with_credentials() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");

        adapter.quote_rates(&shipment()).expect("rates");

        let requests = transport.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://wwwcie.ups.com/webservices/Rate");
        assert_eq!(requests[0].operation, "ProcessRate");
        assert_eq!(requests[0].security.access_key, "KEY");
    }

    #[test]
    fn production_flag_switches_rate_endpoint() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(
            CarrierConfig {
                production: true,
                ..config()
            },
            transport.clone(),
        )
        .expect("adapter");

        adapter.quote_rates(&shipment()).expect("rates");
        assert_eq!(
            transport.recorded()[0].url,
            "https://onlinetools.ups.com/webservices/Rate"
        );
    }

    #[test]
    fn rate_request_document_carries_ceiled_packages_and_options() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");

        adapter.quote_rates(&shipment()).expect("rates");
        let payload = &transport.recorded()[0].payload;

        assert_eq!(payload["Request"]["RequestOption"], "Shop");
        assert_eq!(payload["PickupType"]["Code"], "01");
        assert_eq!(payload["CustomerClassification"]["Code"], "00");
        assert_eq!(payload["Shipment"]["Shipper"]["ShipperNumber"], "A1B2C3");
        assert_eq!(
            payload["Shipment"]["ShipTo"]["Address"]["ResidentialAddressIndicator"],
            ""
        );

        let packages = payload["Shipment"]["Package"]
            .as_array()
            .expect("package list");
        assert_eq!(packages.len(), 2);

        // Default customer packaging, insured and signature blocks on the first.
        assert_eq!(packages[0]["PackagingType"]["Code"], "02");
        assert_eq!(
            packages[0]["PackageServiceOptions"]["DeclaredValue"]["MonetaryValue"],
            274.95
        );
        assert_eq!(
            packages[0]["PackageServiceOptions"]["DeliveryConfirmation"]["DCISType"],
            "2"
        );

        // Second package: 26.34 ceils to 27, 11.34 lb ceils to 12, no options.
        assert_eq!(packages[1]["Dimensions"]["Length"], 27);
        assert_eq!(packages[1]["Dimensions"]["Width"], 17);
        assert_eq!(packages[1]["Dimensions"]["Height"], 15);
        assert_eq!(packages[1]["PackageWeight"]["Weight"], 12);
        assert_eq!(packages[1]["PackageWeight"]["UnitOfMeasurement"]["Code"], "LBS");
        assert!(packages[1].get("PackageServiceOptions").is_none());
    }

    #[test]
    fn rate_request_omits_ship_from_unless_shipping_from_different_address() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");

        adapter.quote_rates(&shipment()).expect("rates");
        assert!(transport.recorded()[0].payload["Shipment"]
            .get("ShipFrom")
            .is_none());
    }

    #[test]
    fn rate_request_includes_ship_from_postal_routing_when_flagged() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");

        let mut shipment = Shipment::new(ShipmentData {
            ship_from_different_address: true,
            shipping_from_name: String::from("Warehouse B"),
            shipping_from_address1: String::from("9 Dock St"),
            shipping_from_city: String::from("Newark"),
            shipping_from_state: String::from("NJ"),
            shipping_from_postal_code: String::from("07102"),
            shipping_from_country_code: String::from("US"),
            receiver_name: String::from("XYZ Corporation"),
            receiver_address1: String::from("123 Main St"),
            receiver_city: String::from("New York"),
            receiver_state: String::from("NY"),
            receiver_postal_code: String::from("10001"),
            receiver_country_code: String::from("US"),
            ..ShipmentData::default()
        })
        .expect("valid shipment");
        shipment.add_package(Package::new(1.0, [1.0, 1.0, 1.0]).expect("valid package"));

        adapter.quote_rates(&shipment).expect("rates");

        let ship_from = &transport.recorded()[0].payload["Shipment"]["ShipFrom"];
        assert_eq!(ship_from["Address"]["PostalCode"], "07102");
        assert_eq!(ship_from["Address"]["CountryCode"], "US");
        // Quotes only need postal routing, never the full address.
        assert!(ship_from.get("Name").is_none());
        assert!(ship_from["Address"].get("AddressLine").is_none());
    }

    #[test]
    fn quoting_an_empty_shipment_fails_before_any_remote_call() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");

        let empty = Shipment::new(ShipmentData {
            receiver_name: String::from("XYZ Corporation"),
            receiver_address1: String::from("123 Main St"),
            receiver_city: String::from("New York"),
            receiver_state: String::from("NY"),
            receiver_postal_code: String::from("10001"),
            receiver_country_code: String::from("US"),
            ..ShipmentData::default()
        })
        .expect("valid shipment");

        let err = adapter.quote_rates(&empty).expect_err("must fail");
        assert!(matches!(err, CarrierError::EmptyPackages));
        assert!(transport.recorded().is_empty());
    }

    #[test]
    fn unknown_service_code_is_an_error_not_a_skip() {
        let mut payload = success_rate_payload();
        payload["RatedShipment"]["Service"]["Code"] = json!("99");
        let transport = Arc::new(RecordingTransport::returning(payload));
        let adapter = UpsAdapter::with_transport(config(), transport).expect("adapter");

        let err = adapter.quote_rates(&shipment()).expect_err("must fail");
        assert!(matches!(
            err,
            CarrierError::UnexpectedResponse(message) if message.contains("'99'")
        ));
    }

    #[test]
    fn ship_request_document_differs_structurally_from_rate_request() {
        let transport = Arc::new(RecordingTransport::returning(json!({
            "Response": {"ResponseStatus": {"Description": "Success"}},
            "ShipmentResults": {
                "ShipmentCharges": {"TotalCharges": {"MonetaryValue": "37.15"}},
                "PackageResults": [
                    {"TrackingNumber": "1Z12345E0205271688", "ShippingLabel": {"GraphicImage": "R0lGOD=="}},
                    {"TrackingNumber": "1Z12345E0205271699", "ShippingLabel": {"GraphicImage": "R0lGOE=="}}
                ]
            }
        })));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");

        adapter.create_label(&shipment(), "03").expect("labels");

        let request = &transport.recorded()[0];
        assert_eq!(request.url, "https://wwwcie.ups.com/webservices/Ship");
        assert_eq!(request.operation, "ProcessShipment");

        let payload = &request.payload;
        assert_eq!(payload["Request"]["RequestOption"], "nonvalidate");
        assert_eq!(payload["Shipment"]["Service"]["Code"], "03");
        assert_eq!(
            payload["Shipment"]["LabelSpecification"]["LabelImageFormat"]["Code"],
            "GIF"
        );
        assert_eq!(
            payload["Shipment"]["PaymentInformation"]["ShipmentCharge"]["Type"],
            "01"
        );
        assert_eq!(
            payload["Shipment"]["PaymentInformation"]["ShipmentCharge"]["BillShipper"]
                ["AccountNumber"],
            "A1B2C3"
        );

        // Address lines 2/3 appended only when present.
        let shipper_lines = payload["Shipment"]["Shipper"]["Address"]["AddressLine"]
            .as_array()
            .expect("shipper lines");
        assert_eq!(shipper_lines.len(), 2);

        // Package type rides under Packaging here, not PackagingType, and
        // the description falls back to a single space.
        let packages = payload["Shipment"]["Package"]
            .as_array()
            .expect("package list");
        assert_eq!(packages[0]["Packaging"]["Code"], "02");
        assert_eq!(packages[0]["Description"], " ");
        assert!(packages[0].get("PackagingType").is_none());
    }

    #[test]
    fn notification_block_requires_flag_and_receiver_email() {
        let label_payload = json!({
            "Response": {"ResponseStatus": {"Description": "Success"}},
            "ShipmentResults": {
                "ShipmentCharges": {"TotalCharges": {"MonetaryValue": "10.00"}},
                "PackageResults": {"TrackingNumber": "1Z1", "ShippingLabel": {"GraphicImage": "R0="}}
            }
        });

        // Flag off: no block even though the receiver has an email.
        let transport = Arc::new(RecordingTransport::returning(label_payload.clone()));
        let adapter = UpsAdapter::with_transport(config(), transport.clone()).expect("adapter");
        adapter.create_label(&shipment(), "03").expect("labels");
        assert!(transport.recorded()[0].payload["Shipment"]
            .get("ShipmentServiceOptions")
            .is_none());

        // Flag on with email: block present.
        let transport = Arc::new(RecordingTransport::returning(label_payload));
        let adapter = UpsAdapter::with_transport(
            CarrierConfig {
                notify_receiver: true,
                ..config()
            },
            transport.clone(),
        )
        .expect("adapter");
        adapter.create_label(&shipment(), "03").expect("labels");
        assert_eq!(
            transport.recorded()[0].payload["Shipment"]["ShipmentServiceOptions"]["Notification"]
                ["EMail"]["EMailAddress"],
            "buyer@xyz.test"
        );
    }

    #[test]
    fn billing_weight_units_are_canonicalized() {
        let transport = Arc::new(RecordingTransport::returning(success_rate_payload()));
        let adapter = UpsAdapter::with_transport(config(), transport).expect("adapter");

        let result = adapter.quote_rates(&shipment()).expect("rates");
        assert_eq!(result.services[0].packages[0].weight_unit, "LB");
    }
}
