//! Typed identifiers.
//!
//! Every domotic record and every gateway is keyed by a random UUID rendered
//! as a string in storage. Environments are the exception: they use a small
//! positive integer handed out by a monotonic sequence.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Gateway`](crate::gateway::Gateway).
    GatewayId
);

define_id!(
    /// Unique identifier for a [`Light`](crate::light::Light).
    LightId
);

define_id!(
    /// Unique identifier for an [`Automation`](crate::automation::Automation).
    AutomationId
);

define_id!(
    /// Unique identifier for a generic [`Device`](crate::device::Device).
    DeviceId
);

define_id!(
    /// Unique identifier for an [`Ipcam`](crate::ipcam::Ipcam).
    IpcamId
);

define_id!(
    /// Unique identifier for a [`Temperature`](crate::temperature::Temperature) sensor.
    TemperatureId
);

define_id!(
    /// Unique identifier for a [`Scenario`](crate::scenario::Scenario).
    ScenarioId
);

/// Identifier of an [`Environment`](crate::environment::Environment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnvironmentId(u32);

impl EnvironmentId {
    /// First value handed out when no environment exists yet.
    pub const INITIAL: Self = Self(100);

    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Largest id the sequence can hand out.
    pub const MAX: Self = Self(u32::MAX);

    /// The id following `self` in the sequence, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Sequence step: `max + 1`, or [`INITIAL`](Self::INITIAL) when there is no maximum.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EnvironmentIdsExhausted`] when `max` is [`MAX`](Self::MAX).
    pub fn after(max: Option<Self>) -> Result<Self, ValidationError> {
        match max {
            None => Ok(Self::INITIAL),
            Some(max) => max.next().ok_or(ValidationError::EnvironmentIdsExhausted),
        }
    }
}

impl fmt::Display for EnvironmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EnvironmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}
