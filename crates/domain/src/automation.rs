//! Automation: shutters, blinds and other motorised actuators.

use serde::{Deserialize, Serialize};

use crate::error::DomoHubError;
use crate::id::AutomationId;
use crate::record::{DomoticFields, impl_domotic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
    pub id: AutomationId,
    pub fields: DomoticFields,
}

impl Automation {
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn new(fields: DomoticFields) -> Result<Self, DomoHubError> {
        Self::with_id(AutomationId::new(), fields)
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn with_id(id: AutomationId, fields: DomoticFields) -> Result<Self, DomoHubError> {
        fields.validate()?;
        Ok(Self { id, fields })
    }
}

impl_domotic!(Automation, AutomationId, "Automation");
