//! Reference implementations of the collaborator ports.
//!
//! The real collaborators (camera pipeline, browser geolocation, an IP
//! echo service) live outside this codebase; these implementations serve
//! the CLI and tests.

use async_trait::async_trait;
use std::net::UdpSocket;
use std::path::PathBuf;

use crate::contract::model::GeolocationData;
use crate::domain::ports::{CollaboratorError, Geolocator, IpLookup, QrDecoder};

/// Resolves the host's outbound IP by opening a connectionless UDP socket.
/// No packets are sent.
pub struct HostIpLookup;

#[async_trait]
impl IpLookup for HostIpLookup {
    async fn lookup(&self) -> Result<String, CollaboratorError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
        socket
            .connect("8.8.8.8:80")
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
        let addr = socket
            .local_addr()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
        Ok(addr.ip().to_string())
    }
}

/// Always returns the configured address.
pub struct FixedIpLookup(pub String);

#[async_trait]
impl IpLookup for FixedIpLookup {
    async fn lookup(&self) -> Result<String, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// Always fails; exercises the sentinel path.
pub struct UnavailableIpLookup;

#[async_trait]
impl IpLookup for UnavailableIpLookup {
    async fn lookup(&self) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::Unavailable(
            "ip lookup service unreachable".to_string(),
        ))
    }
}

/// Always returns the configured coordinates.
pub struct FixedGeolocator(pub GeolocationData);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn locate(&self) -> Result<GeolocationData, CollaboratorError> {
        Ok(self.0)
    }
}

/// Always denies, like a browser with location permission refused.
pub struct DeniedGeolocator;

#[async_trait]
impl Geolocator for DeniedGeolocator {
    async fn locate(&self) -> Result<GeolocationData, CollaboratorError> {
        Err(CollaboratorError::PermissionDenied)
    }
}

/// Reads an already-decoded QR payload from a file, standing in for the
/// camera pipeline. A missing file maps to the no-camera failure mode.
pub struct FileQrDecoder {
    pub path: PathBuf,
}

#[async_trait]
impl QrDecoder for FileQrDecoder {
    async fn decode(&self) -> Result<String, CollaboratorError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CollaboratorError::NoCamera)
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(CollaboratorError::PermissionDenied)
            }
            Err(e) => Err(CollaboratorError::Unavailable(e.to_string())),
        }
    }
}
