//! Identity and ownership shape shared by persisted records.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomoHubError, ValidationError};
use crate::id::{EnvironmentId, GatewayId};

/// A persisted record with a unique, immutable identifier.
pub trait Record: Clone + Send + Sync + 'static {
    /// Primary key type.
    type Id: Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static;

    /// Human-readable kind used in errors and log fields (e.g. `"Light"`).
    const KIND: &'static str;

    fn id(&self) -> Self::Id;
}

/// A device-like record owned by an environment and driven through a gateway.
pub trait Domotic: Record {
    fn fields(&self) -> &DomoticFields;

    fn fields_mut(&mut self) -> &mut DomoticFields;

    fn environment_id(&self) -> EnvironmentId {
        self.fields().environment_id
    }

    fn gateway_id(&self) -> GatewayId {
        self.fields().gateway_id
    }

    fn name(&self) -> &str {
        &self.fields().name
    }

    fn is_favourite(&self) -> bool {
        self.fields().favourite
    }
}

/// Fields every domotic record carries.
///
/// All of them are mandatory: constructors of the concrete records only accept
/// a fully-populated value and reject blank `name` or `location`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomoticFields {
    pub environment_id: EnvironmentId,
    pub gateway_id: GatewayId,
    pub name: String,
    /// Address of the device on the gateway bus (`where` in the wire protocol).
    pub location: String,
    pub favourite: bool,
}

impl DomoticFields {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when `name` or `location` is blank.
    pub fn validate(&self) -> Result<(), DomoHubError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::EmptyLocation.into());
        }
        Ok(())
    }
}

/// Implements [`Record`] and [`Domotic`] for a struct holding `id` and `fields`.
macro_rules! impl_domotic {
    ($record:ty, $id:ty, $kind:literal) => {
        impl $crate::record::Record for $record {
            type Id = $id;

            const KIND: &'static str = $kind;

            fn id(&self) -> Self::Id {
                self.id
            }
        }

        impl $crate::record::Domotic for $record {
            fn fields(&self) -> &$crate::record::DomoticFields {
                &self.fields
            }

            fn fields_mut(&mut self) -> &mut $crate::record::DomoticFields {
                &mut self.fields
            }
        }
    };
}

pub(crate) use impl_domotic;

#[cfg(test)]
pub(crate) fn sample_fields() -> DomoticFields {
    DomoticFields {
        environment_id: EnvironmentId::INITIAL,
        gateway_id: GatewayId::new(),
        name: "Kitchen ceiling".to_string(),
        location: "21".to_string(),
        favourite: false,
    }
}
