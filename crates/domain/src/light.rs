//! Light: a switchable (optionally dimmable) lighting point.

use serde::{Deserialize, Serialize};

use crate::error::DomoHubError;
use crate::id::LightId;
use crate::record::{DomoticFields, impl_domotic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Light {
    pub id: LightId,
    pub fields: DomoticFields,
    pub dimmer: bool,
}

impl Light {
    /// Create a light with a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn new(fields: DomoticFields, dimmer: bool) -> Result<Self, DomoHubError> {
        Self::with_id(LightId::new(), fields, dimmer)
    }

    /// Create a light reusing an existing id (update flows).
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid.
    pub fn with_id(id: LightId, fields: DomoticFields, dimmer: bool) -> Result<Self, DomoHubError> {
        fields.validate()?;
        Ok(Self { id, fields, dimmer })
    }
}

impl_domotic!(Light, LightId, "Light");
