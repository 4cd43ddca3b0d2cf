//! Driving port for provider discovery.
//!
//! The [`ProviderDiscoveryQuery`] trait is what the HTTP layer calls to list,
//! search and count providers around a requester. None of its operations
//! mutate state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{CategoryCount, Error, ProviderId, ProviderView, RequesterId};

/// Free-text search around a requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProvidersRequest {
    /// Requester whose stored position is the search origin.
    pub requester_id: RequesterId,
    /// Query text; blank text means "plain nearby listing".
    #[serde(default)]
    pub query: String,
}

/// Category distribution around a requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCountsRequest {
    /// Requester whose stored position is the origin.
    pub requester_id: RequesterId,
    /// Radius in kilometres; the configured default applies when absent.
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Providers of one category around a requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvidersByCategoryRequest {
    /// Requester whose stored position is the origin.
    pub requester_id: RequesterId,
    /// Category label, matched case-insensitively as a substring.
    pub category: String,
    /// Radius in kilometres; the configured default applies when absent.
    #[serde(default)]
    pub radius_km: Option<f64>,
}

/// Driving port for provider discovery.
///
/// Every proximity result is ordered by ascending distance from the
/// requester's stored position and only contains available providers. Empty
/// results are successes.
///
/// # Errors
///
/// - [`crate::domain::ErrorCode::RequesterNotFound`] when the requester id
///   does not resolve.
/// - [`crate::domain::ErrorCode::LocationRequired`] when an operation needs
///   the requester's position and none is stored (search with non-blank text
///   degrades to an unordered text match instead).
/// - [`crate::domain::ErrorCode::InvalidRequest`] for a non-positive radius
///   or a blank category.
/// - [`crate::domain::ErrorCode::StoreUnavailable`] when the store fails.
#[async_trait]
pub trait ProviderDiscoveryQuery: Send + Sync {
    /// Every available provider, unordered.
    async fn list_all_providers(&self) -> Result<Vec<ProviderView>, Error>;

    /// Available providers within the default radius of the requester.
    async fn list_nearby_providers(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Vec<ProviderView>, Error>;

    /// Text search combined with proximity, falling back to text-only
    /// matching when the requester has no stored position.
    async fn search_providers(
        &self,
        request: SearchProvidersRequest,
    ) -> Result<Vec<ProviderView>, Error>;

    /// In-range provider counts per category, largest first.
    async fn category_counts(
        &self,
        request: CategoryCountsRequest,
    ) -> Result<Vec<CategoryCount>, Error>;

    /// In-range providers whose category matches.
    async fn providers_by_category(
        &self,
        request: ProvidersByCategoryRequest,
    ) -> Result<Vec<ProviderView>, Error>;

    /// A single provider, available or not.
    async fn get_provider(&self, provider_id: &ProviderId) -> Result<ProviderView, Error>;
}
