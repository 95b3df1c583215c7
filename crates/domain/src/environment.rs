//! Environment: a named grouping (room, floor, zone) that owns domotic records.

use serde::{Deserialize, Serialize};

use crate::error::{DomoHubError, ValidationError};
use crate::id::EnvironmentId;

/// A named grouping identified by a small integer from a monotonic sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
}

impl Environment {
    /// Create an environment with an already reserved id.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when `name` is blank or the id is zero.
    pub fn new(id: EnvironmentId, name: impl Into<String>) -> Result<Self, DomoHubError> {
        let environment = Self {
            id,
            name: name.into(),
        };
        environment.validate()?;
        Ok(environment)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when `name` is blank or the id is zero.
    pub fn validate(&self) -> Result<(), DomoHubError> {
        if self.id.value() == 0 {
            return Err(ValidationError::InvalidEnvironmentId.into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}
