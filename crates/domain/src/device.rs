//! Device: a generic record that sends a raw protocol request and optionally
//! checks the reply.

use serde::{Deserialize, Serialize};

use crate::error::{DomoHubError, ValidationError};
use crate::id::DeviceId;
use crate::record::{DomoticFields, impl_domotic};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub fields: DomoticFields,
    /// Frame sent to the gateway when the device is triggered.
    pub request: String,
    /// Expected reply; `None` means any reply is accepted.
    pub response: Option<String>,
    /// Send the request as soon as the owning environment is displayed.
    pub run_on_load: bool,
    /// Ask for confirmation before sending.
    pub show_confirmation: bool,
}

/// Device-specific settings, all required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCommand {
    pub request: String,
    pub response: Option<String>,
    pub run_on_load: bool,
    pub show_confirmation: bool,
}

impl Device {
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid
    /// or the request is blank.
    pub fn new(fields: DomoticFields, command: DeviceCommand) -> Result<Self, DomoHubError> {
        Self::with_id(DeviceId::new(), fields, command)
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid
    /// or the request is blank.
    pub fn with_id(
        id: DeviceId,
        fields: DomoticFields,
        command: DeviceCommand,
    ) -> Result<Self, DomoHubError> {
        fields.validate()?;
        if command.request.trim().is_empty() {
            return Err(ValidationError::EmptyRequest.into());
        }
        Ok(Self {
            id,
            fields,
            request: command.request,
            response: command.response.filter(|r| !r.is_empty()),
            run_on_load: command.run_on_load,
            show_confirmation: command.show_confirmation,
        })
    }
}

impl_domotic!(Device, DeviceId, "Device");
