//! Scenario: a stored sequence the gateway can start or stop.
//!
//! The start/stop `status` and the `enabled` flag are read from the gateway at
//! runtime. They are never persisted: a freshly loaded scenario carries `None`
//! and `false`.

use serde::{Deserialize, Serialize};

use crate::error::DomoHubError;
use crate::id::ScenarioId;
use crate::record::{DomoticFields, impl_domotic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Start,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub fields: DomoticFields,
    #[serde(skip)]
    pub status: Option<ScenarioStatus>,
    #[serde(skip)]
    pub enabled: bool,
}

impl Scenario {
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn new(fields: DomoticFields) -> Result<Self, DomoHubError> {
        Self::with_id(ScenarioId::new(), fields)
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn with_id(id: ScenarioId, fields: DomoticFields) -> Result<Self, DomoHubError> {
        fields.validate()?;
        Ok(Self {
            id,
            fields,
            status: None,
            enabled: false,
        })
    }
}

impl_domotic!(Scenario, ScenarioId, "Scenario");
