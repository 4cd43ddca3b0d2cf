//! Driving port for rating submissions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ProviderId, RatingSubmitted, RequesterId};

/// A requester's rating of a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub requester_id: RequesterId,
    pub provider_id: ProviderId,
    /// Raw number from the caller; must be a whole number in `1..=5`.
    pub rating: f64,
}

/// Driving port for rating submissions.
///
/// A submission inserts or overwrites the requester's review of the provider
/// and recomputes the provider's aggregate rating over all its reviews.
///
/// # Errors
///
/// - [`crate::domain::ErrorCode::InvalidRating`] for values that are not a
///   whole number in `1..=5`.
/// - [`crate::domain::ErrorCode::ProviderNotFound`] /
///   [`crate::domain::ErrorCode::RequesterNotFound`] for unknown ids.
/// - [`crate::domain::ErrorCode::Conflict`] when concurrent submissions keep
///   invalidating the aggregate write. The review itself is stored.
/// - [`crate::domain::ErrorCode::StoreUnavailable`] when the store fails.
#[async_trait]
pub trait ProviderRatingCommand: Send + Sync {
    /// Submit a rating and return the recomputed aggregate.
    async fn submit_rating(&self, request: SubmitRatingRequest) -> Result<RatingSubmitted, Error>;
}
