//! Driving port for position updates.
//!
//! Coordinates arrive as raw numbers and are validated by the implementation,
//! so out-of-range values surface as
//! [`crate::domain::ErrorCode::InvalidLocation`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, GeoPoint, ProviderId, RequesterId};

/// New position for a requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequesterLocationRequest {
    pub requester_id: RequesterId,
    pub latitude: f64,
    pub longitude: f64,
}

/// New position and street address for a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetProviderLocationRequest {
    pub provider_id: ProviderId,
    pub latitude: f64,
    pub longitude: f64,
    /// Must not be blank.
    pub address: String,
}

/// Stored provider position after an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderLocationUpdated {
    pub location: GeoPoint,
    pub address: String,
}

/// Driving port for reading and updating positions.
#[async_trait]
pub trait LocationCommand: Send + Sync {
    /// Replace a requester's stored position.
    async fn set_requester_location(
        &self,
        request: SetRequesterLocationRequest,
    ) -> Result<GeoPoint, Error>;

    /// A requester's stored position; `None` means no location saved yet.
    async fn requester_location(&self, requester_id: &RequesterId)
    -> Result<Option<GeoPoint>, Error>;

    /// Replace a provider's position and address.
    async fn set_provider_location(
        &self,
        request: SetProviderLocationRequest,
    ) -> Result<ProviderLocationUpdated, Error>;
}
