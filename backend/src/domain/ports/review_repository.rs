//! Port for review persistence.
//!
//! Reviews are keyed on `(provider_id, requester_id)`. Adapters must enforce
//! that key so a repeat submission overwrites the earlier rating.

use async_trait::async_trait;

use crate::domain::{ProviderId, RatingValue, Review};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "review repository query failed: {message}",
        /// The review references a provider or requester that does not exist.
        MissingParty { message: String } =>
            "review references an unknown party: {message}",
    }
}

/// Port for review storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert the review, or overwrite the rating of the existing review for
    /// the same `(provider_id, requester_id)` pair.
    ///
    /// On overwrite the stored `created_at` is kept and `updated_at` is taken
    /// from `review`.
    async fn upsert(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Every rating currently stored for `provider_id`, one per requester.
    async fn ratings_for_provider(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<RatingValue>, ReviewRepositoryError>;
}
