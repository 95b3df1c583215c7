//! Ipcam: an IP camera streamed directly from its URL.

use serde::{Deserialize, Serialize};

use crate::error::{DomoHubError, ValidationError};
use crate::id::IpcamId;
use crate::record::{DomoticFields, impl_domotic};

/// Stream encoding served by the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    #[default]
    Mjpeg,
    Rtsp,
}

impl StreamType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mjpeg => "mjpeg",
            Self::Rtsp => "rtsp",
        }
    }
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StreamType {
    type Err = UnknownStreamType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mjpeg" => Ok(Self::Mjpeg),
            "rtsp" => Ok(Self::Rtsp),
            other => Err(UnknownStreamType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stream type {0:?}")]
pub struct UnknownStreamType(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipcam {
    pub id: IpcamId,
    pub fields: DomoticFields,
    pub url: String,
    pub stream_type: StreamType,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Camera-specific settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcamStream {
    pub url: String,
    pub stream_type: StreamType,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Ipcam {
    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid
    /// or the URL is blank.
    pub fn new(fields: DomoticFields, stream: IpcamStream) -> Result<Self, DomoHubError> {
        Self::with_id(IpcamId::new(), fields, stream)
    }

    /// # Errors
    ///
    /// Returns [`DomoHubError::Validation`] when the shared fields are invalid
    /// or the URL is blank.
    pub fn with_id(
        id: IpcamId,
        fields: DomoticFields,
        stream: IpcamStream,
    ) -> Result<Self, DomoHubError> {
        fields.validate()?;
        if stream.url.trim().is_empty() {
            return Err(ValidationError::EmptyUrl.into());
        }
        Ok(Self {
            id,
            fields,
            url: stream.url,
            stream_type: stream.stream_type,
            username: stream.username,
            password: stream.password,
        })
    }
}

impl_domotic!(Ipcam, IpcamId, "Ipcam");
