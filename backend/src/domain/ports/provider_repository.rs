//! Port for provider persistence and candidate lookup.
//!
//! The [`ProviderRepository`] trait is the geospatial store seen from the
//! proximity engine: it answers bounding-box candidate queries with the
//! availability, category and text predicates applied, and it guards aggregate
//! rating writes with a revision check so concurrent recomputes cannot
//! silently overwrite each other.

use async_trait::async_trait;

use crate::domain::{BoundingBox, Provider, ProviderFilter, ProviderId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by provider repository adapters.
    pub enum ProviderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "provider repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "provider repository query failed: {message}",
        /// A stored position is malformed or out of range.
        InvalidPosition { message: String } =>
            "stored provider position is invalid: {message}",
        /// The provider addressed by a write does not exist.
        NotFound { id: String } =>
            "provider {id} not found",
        /// Optimistic concurrency check on the aggregate rating failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "rating revision mismatch: expected {expected}, found {actual}",
    }
}

/// Port for provider storage and candidate retrieval.
///
/// # Candidate queries
///
/// [`ProviderRepository::list_matching`] and
/// [`ProviderRepository::find_in_bounds`] only return providers for which
/// [`ProviderFilter::matches`] holds. `find_in_bounds` additionally drops
/// providers without a location and those outside the box. Neither method
/// orders by distance; callers compute exact distances themselves.
///
/// # Rating revisions
///
/// Every successful [`ProviderRepository::save_rating`] increments
/// `rating_revision` by one. Other writes leave the revision untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderRepository: Send + Sync {
    /// Fetch a provider by id, regardless of availability.
    async fn find_by_id(&self, id: &ProviderId)
    -> Result<Option<Provider>, ProviderRepositoryError>;

    /// Every provider satisfying `filter`, in store order.
    async fn list_matching(
        &self,
        filter: &ProviderFilter,
    ) -> Result<Vec<Provider>, ProviderRepositoryError>;

    /// Located providers inside `bounds` satisfying `filter`, in store order.
    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ProviderFilter,
    ) -> Result<Vec<Provider>, ProviderRepositoryError>;

    /// Persist the display fields and location of `provider`.
    ///
    /// `rating` and `rating_revision` are ignored; only
    /// [`ProviderRepository::save_rating`] writes them. Fails with
    /// [`ProviderRepositoryError::NotFound`] when the provider does not exist.
    async fn save_details(&self, provider: &Provider) -> Result<(), ProviderRepositoryError>;

    /// Store a recomputed aggregate rating if the revision is unchanged.
    ///
    /// Succeeds only when the stored `rating_revision` equals
    /// `expected_revision`, and returns the new revision. Otherwise fails with
    /// [`ProviderRepositoryError::RevisionMismatch`] carrying the stored
    /// revision, or [`ProviderRepositoryError::NotFound`].
    async fn save_rating(
        &self,
        id: &ProviderId,
        rating: f64,
        expected_revision: u32,
    ) -> Result<u32, ProviderRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn revision_mismatch_error_formats_correctly() {
        let error = ProviderRepositoryError::revision_mismatch(2_u32, 5_u32);
        let message = error.to_string();

        assert!(message.contains("expected 2"));
        assert!(message.contains("found 5"));
    }

    #[rstest]
    fn not_found_names_the_provider() {
        let id = ProviderId::random();
        let error = ProviderRepositoryError::not_found(id.to_string());
        assert!(error.to_string().contains(&id.to_string()));
    }
}
