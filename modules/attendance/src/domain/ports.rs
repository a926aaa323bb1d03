//! Output ports for the external collaborators the core consumes.
//!
//! The collaborators themselves (camera/QR pipeline, IP lookup, browser
//! geolocation) live outside this module; the core only sees these traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::contract::model::GeolocationData;

/// Sentinel recorded in a log entry when the IP lookup fails.
pub const IP_UNAVAILABLE: &str = "Unavailable";

/// Failure modes of the collaborators. All are non-fatal to the toggle flow:
/// the state machine degrades to sentinel/omitted data instead of aborting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("No camera available")]
    NoCamera,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Timed out")]
    Timeout,

    #[error("Unavailable: {0}")]
    Unavailable(String),
}

/// Resolve the caller's IP address.
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn lookup(&self) -> Result<String, CollaboratorError>;
}

/// Resolve the caller's coordinates. Best-effort; callers record the failure
/// reason and proceed.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<GeolocationData, CollaboratorError>;
}

/// Decode a QR payload into text. Consumed by the presentation layer, not by
/// the state machine.
#[async_trait]
pub trait QrDecoder: Send + Sync {
    async fn decode(&self) -> Result<String, CollaboratorError>;
}
