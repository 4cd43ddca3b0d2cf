//! Rating aggregation.
//!
//! A submission upserts the requester's review, then recomputes the provider's
//! aggregate as the mean over all of its reviews. The aggregate write is
//! guarded by the provider's `rating_revision`: when another submission wrote
//! first, the revision read, ratings read and write are repeated, up to a
//! bounded number of attempts.
//!
//! Each submission reads the revision after its own review is stored. The last
//! successful aggregate write therefore always follows every stored review's
//! revision read, so once submissions stop the stored aggregate is the exact
//! mean of the stored reviews.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::domain::ports::{
    ProviderRatingCommand, ProviderRepository, ProviderRepositoryError, RequesterRepository,
    ReviewRepository, SubmitRatingRequest,
};
use crate::domain::store_error_mapping::{
    map_provider_error, map_requester_error, map_review_error,
};
use crate::domain::{
    Error, ProviderId, RatingSubmitted, RatingValue, RequesterId, Review, mean_rating,
    round_for_display,
};

/// Default bound on aggregate recompute attempts per submission.
pub const DEFAULT_RATING_MAX_ATTEMPTS: u32 = 5;

/// Rating service implementing [`ProviderRatingCommand`].
///
/// `P` stores providers, `Q` requesters and `R` reviews.
#[derive(Clone)]
pub struct RatingService<P, Q, R> {
    providers: Arc<P>,
    requesters: Arc<Q>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
}

impl<P, Q, R> RatingService<P, Q, R> {
    /// Create a service with the default retry budget.
    pub fn new(
        providers: Arc<P>,
        requesters: Arc<Q>,
        reviews: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            providers,
            requesters,
            reviews,
            clock,
            max_attempts: DEFAULT_RATING_MAX_ATTEMPTS,
        }
    }

    /// Override the number of recompute attempts; values below one are
    /// raised to one.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

impl<P, Q, R> RatingService<P, Q, R>
where
    P: ProviderRepository,
    Q: RequesterRepository,
    R: ReviewRepository,
{
    fn parse_rating(raw: f64) -> Result<RatingValue, Error> {
        RatingValue::from_number(raw).map_err(|err| {
            Error::invalid_rating(err.to_string())
                .with_details(json!({ "field": "rating", "value": raw }))
        })
    }

    async fn ensure_provider(&self, provider_id: &ProviderId) -> Result<(), Error> {
        self.providers
            .find_by_id(provider_id)
            .await
            .map_err(map_provider_error)?
            .map(|_| ())
            .ok_or_else(|| {
                Error::provider_not_found(format!("provider {provider_id} not found"))
                    .with_details(json!({ "providerId": provider_id }))
            })
    }

    async fn ensure_requester(&self, requester_id: &RequesterId) -> Result<(), Error> {
        self.requesters
            .find_by_id(requester_id)
            .await
            .map_err(map_requester_error)?
            .map(|_| ())
            .ok_or_else(|| {
                Error::requester_not_found(format!("requester {requester_id} not found"))
                    .with_details(json!({ "requesterId": requester_id }))
            })
    }

    async fn recompute(&self, provider_id: &ProviderId) -> Result<RatingSubmitted, Error> {
        for attempt in 1..=self.max_attempts {
            let revision = self
                .providers
                .find_by_id(provider_id)
                .await
                .map_err(map_provider_error)?
                .map(|provider| provider.rating_revision)
                .ok_or_else(|| {
                    Error::provider_not_found(format!("provider {provider_id} not found"))
                })?;
            let ratings = self
                .reviews
                .ratings_for_provider(provider_id)
                .await
                .map_err(map_review_error)?;
            let average = mean_rating(&ratings);

            match self
                .providers
                .save_rating(provider_id, average, revision)
                .await
            {
                Ok(new_revision) => {
                    info!(
                        attempt,
                        revision = new_revision,
                        average,
                        reviews = ratings.len(),
                        "aggregate rating recomputed"
                    );
                    return Ok(RatingSubmitted {
                        provider_id: *provider_id,
                        average_rating: round_for_display(average),
                        review_count: u64::try_from(ratings.len()).unwrap_or(u64::MAX),
                    });
                }
                Err(ProviderRepositoryError::RevisionMismatch { expected, actual }) => {
                    warn!(
                        attempt,
                        expected, actual, "rating revision moved during recompute; retrying"
                    );
                }
                Err(err) => return Err(map_provider_error(err)),
            }
        }

        warn!(
            attempts = self.max_attempts,
            "rating recompute abandoned after repeated revision conflicts"
        );
        Err(
            Error::conflict("concurrent rating submissions kept invalidating the aggregate")
                .with_details(json!({
                    "providerId": provider_id,
                    "attempts": self.max_attempts,
                })),
        )
    }
}

#[async_trait]
impl<P, Q, R> ProviderRatingCommand for RatingService<P, Q, R>
where
    P: ProviderRepository,
    Q: RequesterRepository,
    R: ReviewRepository,
{
    #[instrument(
        skip_all,
        fields(provider_id = %request.provider_id, requester_id = %request.requester_id)
    )]
    async fn submit_rating(&self, request: SubmitRatingRequest) -> Result<RatingSubmitted, Error> {
        let rating = Self::parse_rating(request.rating)?;
        self.ensure_provider(&request.provider_id).await?;
        self.ensure_requester(&request.requester_id).await?;

        let now = self.clock.utc();
        let review = Review {
            provider_id: request.provider_id,
            requester_id: request.requester_id,
            rating,
            created_at: now,
            updated_at: now,
        };
        self.reviews
            .upsert(&review)
            .await
            .map_err(map_review_error)?;

        self.recompute(&request.provider_id).await
    }
}

#[cfg(test)]
#[path = "rating_service_tests.rs"]
mod tests;
