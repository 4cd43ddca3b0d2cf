//! Matching façade implementing the provider discovery port.
//!
//! Each call re-reads the requester's stored position; nothing about
//! requesters or providers is cached between calls.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::instrument;

use crate::domain::ports::{
    CategoryCountsRequest, ProviderDiscoveryQuery, ProviderRepository, ProvidersByCategoryRequest,
    RequesterRepository, SearchProvidersRequest,
};
use crate::domain::store_error_mapping::{map_provider_error, map_requester_error};
use crate::domain::{
    CategoryCount, Error, GeoPoint, ProviderFilter, ProviderId, ProviderView, ProximityEngine,
    RankedProvider, RequesterId, SearchRadius, SearchText,
};

/// Discovery service composing the proximity engine with requester lookups.
#[derive(Clone)]
pub struct MatchingService<P, Q> {
    engine: ProximityEngine<P>,
    providers: Arc<P>,
    requesters: Arc<Q>,
    default_radius: SearchRadius,
}

impl<P, Q> MatchingService<P, Q> {
    /// Create a service using the 10 km default radius.
    pub fn new(providers: Arc<P>, requesters: Arc<Q>) -> Self {
        Self {
            engine: ProximityEngine::new(Arc::clone(&providers)),
            providers,
            requesters,
            default_radius: SearchRadius::default(),
        }
    }

    /// Override the radius used when a caller does not supply one.
    #[must_use]
    pub fn with_default_radius(mut self, radius: SearchRadius) -> Self {
        self.default_radius = radius;
        self
    }
}

impl<P, Q> MatchingService<P, Q>
where
    P: ProviderRepository,
    Q: RequesterRepository,
{
    async fn requester_origin(&self, requester_id: &RequesterId) -> Result<Option<GeoPoint>, Error> {
        self.requesters
            .find_by_id(requester_id)
            .await
            .map_err(map_requester_error)?
            .map(|requester| requester.position)
            .ok_or_else(|| {
                Error::requester_not_found(format!("requester {requester_id} not found"))
                    .with_details(json!({ "requesterId": requester_id }))
            })
    }

    async fn required_origin(&self, requester_id: &RequesterId) -> Result<GeoPoint, Error> {
        self.requester_origin(requester_id).await?.ok_or_else(|| {
            Error::location_required("set a location before searching nearby providers")
        })
    }

    fn resolve_radius(&self, radius_km: Option<f64>) -> Result<SearchRadius, Error> {
        match radius_km {
            None => Ok(self.default_radius),
            Some(km) => SearchRadius::from_km(km).map_err(|err| {
                Error::invalid_request(err.to_string())
                    .with_details(json!({ "field": "radiusKm", "value": km }))
            }),
        }
    }

    fn shape(ranked: Vec<RankedProvider>) -> Vec<ProviderView> {
        ranked
            .into_iter()
            .map(|entry| {
                let view = ProviderView::from_provider(&entry.provider);
                match entry.distance_meters {
                    Some(distance) => view.with_distance(distance),
                    None => view,
                }
            })
            .collect()
    }
}

#[async_trait]
impl<P, Q> ProviderDiscoveryQuery for MatchingService<P, Q>
where
    P: ProviderRepository,
    Q: RequesterRepository,
{
    #[instrument(skip_all)]
    async fn list_all_providers(&self) -> Result<Vec<ProviderView>, Error> {
        let ranked = self.engine.list_matching(&ProviderFilter::available()).await?;
        Ok(Self::shape(ranked))
    }

    #[instrument(skip_all, fields(requester_id = %requester_id))]
    async fn list_nearby_providers(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Vec<ProviderView>, Error> {
        let origin = self.requester_origin(requester_id).await?;
        let ranked = self
            .engine
            .search(origin, self.default_radius, &ProviderFilter::available())
            .await?;
        Ok(Self::shape(ranked))
    }

    #[instrument(skip_all, fields(requester_id = %request.requester_id))]
    async fn search_providers(
        &self,
        request: SearchProvidersRequest,
    ) -> Result<Vec<ProviderView>, Error> {
        let origin = self.requester_origin(&request.requester_id).await?;
        let filter = match SearchText::parse(&request.query) {
            Some(text) => ProviderFilter::available().with_text(text),
            None => ProviderFilter::available(),
        };
        let ranked = self
            .engine
            .search(origin, self.default_radius, &filter)
            .await?;
        Ok(Self::shape(ranked))
    }

    #[instrument(skip_all, fields(requester_id = %request.requester_id))]
    async fn category_counts(
        &self,
        request: CategoryCountsRequest,
    ) -> Result<Vec<CategoryCount>, Error> {
        let radius = self.resolve_radius(request.radius_km)?;
        let origin = self.required_origin(&request.requester_id).await?;
        self.engine.count_by_category(origin, radius).await
    }

    #[instrument(skip_all, fields(requester_id = %request.requester_id))]
    async fn providers_by_category(
        &self,
        request: ProvidersByCategoryRequest,
    ) -> Result<Vec<ProviderView>, Error> {
        let category = SearchText::parse(&request.category).ok_or_else(|| {
            Error::invalid_request("category must not be blank")
                .with_details(json!({ "field": "category" }))
        })?;
        let radius = self.resolve_radius(request.radius_km)?;
        let origin = self.required_origin(&request.requester_id).await?;
        let filter = ProviderFilter::available().with_category(category);
        let ranked = self.engine.find_near(origin, radius, &filter).await?;
        Ok(Self::shape(ranked))
    }

    #[instrument(skip_all, fields(provider_id = %provider_id))]
    async fn get_provider(&self, provider_id: &ProviderId) -> Result<ProviderView, Error> {
        self.providers
            .find_by_id(provider_id)
            .await
            .map_err(map_provider_error)?
            .map(|provider| ProviderView::from_provider(&provider))
            .ok_or_else(|| {
                Error::provider_not_found(format!("provider {provider_id} not found"))
                    .with_details(json!({ "providerId": provider_id }))
            })
    }
}

#[cfg(test)]
#[path = "matching_service_tests.rs"]
mod tests;
