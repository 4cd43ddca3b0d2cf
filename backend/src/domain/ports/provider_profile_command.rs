//! Driving port for provider profile maintenance.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ProviderId, ProviderProfileUpdate, ProviderView};

/// Partial profile update; absent or blank fields keep their stored value.
///
/// The aggregate rating is deliberately absent: it is derived from reviews.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProviderProfileRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl From<UpdateProviderProfileRequest> for ProviderProfileUpdate {
    fn from(value: UpdateProviderProfileRequest) -> Self {
        Self {
            name: value.name,
            mobile: value.mobile,
            category: value.category,
            price: value.price,
            description: value.description,
        }
    }
}

/// Driving port for provider profiles.
#[async_trait]
pub trait ProviderProfileCommand: Send + Sync {
    /// Apply a partial update and return the stored profile.
    ///
    /// # Errors
    ///
    /// [`crate::domain::ErrorCode::InvalidRequest`] for a negative or
    /// non-finite price, [`crate::domain::ErrorCode::ProviderNotFound`] for
    /// unknown ids.
    async fn update_profile(
        &self,
        provider_id: &ProviderId,
        request: UpdateProviderProfileRequest,
    ) -> Result<ProviderView, Error>;

    /// The provider's current profile.
    async fn profile(&self, provider_id: &ProviderId) -> Result<ProviderView, Error>;
}
