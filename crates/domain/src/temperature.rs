//! Temperature: a thermostat probe read through the gateway.

use serde::{Deserialize, Serialize};

use crate::error::DomoHubError;
use crate::id::TemperatureId;
use crate::record::{DomoticFields, impl_domotic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Temperature {
    pub id: TemperatureId,
    pub fields: DomoticFields,
}

impl Temperature {
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn new(fields: DomoticFields) -> Result<Self, DomoHubError> {
        Self::with_id(TemperatureId::new(), fields)
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn with_id(id: TemperatureId, fields: DomoticFields) -> Result<Self, DomoHubError> {
        fields.validate()?;
        Ok(Self { id, fields })
    }
}

impl_domotic!(Temperature, TemperatureId, "Temperature");
