//! Provider profile maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument};

use crate::domain::ports::{
    ProviderProfileCommand, ProviderRepository, UpdateProviderProfileRequest,
};
use crate::domain::store_error_mapping::map_provider_error;
use crate::domain::{Error, Provider, ProviderId, ProviderProfileUpdate, ProviderView};

/// Profile service implementing [`ProviderProfileCommand`].
#[derive(Clone)]
pub struct ProfileService<P> {
    providers: Arc<P>,
}

impl<P> ProfileService<P> {
    /// Create a new service over `providers`.
    pub fn new(providers: Arc<P>) -> Self {
        Self { providers }
    }
}

impl<P> ProfileService<P>
where
    P: ProviderRepository,
{
    async fn load(&self, provider_id: &ProviderId) -> Result<Provider, Error> {
        self.providers
            .find_by_id(provider_id)
            .await
            .map_err(map_provider_error)?
            .ok_or_else(|| {
                Error::provider_not_found(format!("provider {provider_id} not found"))
                    .with_details(json!({ "providerId": provider_id }))
            })
    }
}

#[async_trait]
impl<P> ProviderProfileCommand for ProfileService<P>
where
    P: ProviderRepository,
{
    #[instrument(skip_all, fields(provider_id = %provider_id))]
    async fn update_profile(
        &self,
        provider_id: &ProviderId,
        request: UpdateProviderProfileRequest,
    ) -> Result<ProviderView, Error> {
        let update = ProviderProfileUpdate::from(request);
        update.validate().map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "price" }))
        })?;

        let mut provider = self.load(provider_id).await?;
        update.apply_to(&mut provider);
        self.providers
            .save_details(&provider)
            .await
            .map_err(map_provider_error)?;
        info!("provider profile updated");
        Ok(ProviderView::from_provider(&provider))
    }

    #[instrument(skip_all, fields(provider_id = %provider_id))]
    async fn profile(&self, provider_id: &ProviderId) -> Result<ProviderView, Error> {
        let provider = self.load(provider_id).await?;
        Ok(ProviderView::from_provider(&provider))
    }
}
