use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use crate::adapters::UpsAdapter;
use crate::transport::HttpTransport;
use crate::{CarrierConfig, CarrierError, LabelResult, RateResult, Shipment, ValidationError};

/// Canonical carrier identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarrierId {
    Ups,
}

impl CarrierId {
    pub const ALL: [Self; 1] = [Self::Ups];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ups => "ups",
        }
    }
}

impl Display for CarrierId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarrierId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ups" => Ok(Self::Ups),
            other => Err(ValidationError::InvalidCarrier {
                value: other.to_owned(),
            }),
        }
    }
}

/// Carrier adapter contract: quote rates and create labels for a shipment.
///
/// Each call performs exactly one blocking round-trip and shares no state
/// with other calls; concurrent callers use independent adapter instances.
pub trait Carrier: Send + Sync {
    fn id(&self) -> CarrierId;
    fn quote_rates(&self, shipment: &Shipment) -> Result<RateResult, CarrierError>;
    fn create_label(
        &self,
        shipment: &Shipment,
        service_code: &str,
    ) -> Result<LabelResult, CarrierError>;
}

type CarrierFactory =
    Box<dyn Fn(&CarrierConfig) -> Result<Box<dyn Carrier>, CarrierError> + Send + Sync>;

/// Maps carrier identifiers to adapter factories.
///
/// Adding a carrier means registering an implementation here, not
/// branching on an identifier at the call site.
pub struct CarrierRegistry {
    factories: HashMap<CarrierId, CarrierFactory>,
}

impl CarrierRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with every built-in adapter wired to the production
    /// HTTP transport.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(CarrierId::Ups, |config| {
            let adapter = UpsAdapter::with_transport(
                config.clone(),
                Arc::new(HttpTransport::new()),
            )?;
            Ok(Box::new(adapter) as Box<dyn Carrier>)
        });
        registry
    }

    pub fn register<F>(&mut self, id: CarrierId, factory: F)
    where
        F: Fn(&CarrierConfig) -> Result<Box<dyn Carrier>, CarrierError> + Send + Sync + 'static,
    {
        self.factories.insert(id, Box::new(factory));
    }

    /// Instantiates the adapter registered for `id` with the supplied
    /// configuration.
    pub fn create(
        &self,
        id: CarrierId,
        config: &CarrierConfig,
    ) -> Result<Box<dyn Carrier>, CarrierError> {
        let factory = self
            .factories
            .get(&id)
            .ok_or_else(|| CarrierError::NotRegistered(id.to_string()))?;
        factory(config)
    }

    pub fn registered(&self) -> Vec<CarrierId> {
        let mut ids: Vec<CarrierId> = self.factories.keys().copied().collect();
        ids.sort_by_key(|id| id.as_str());
        ids
    }
}

impl Default for CarrierRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
