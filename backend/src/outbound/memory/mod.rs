//! In-process marketplace store.
//!
//! [`InMemoryMarketplaceStore`] implements every driven port over a single
//! mutex-guarded state. It backs the service bundle when no database is
//! configured and gives tests a store with real upsert and revision
//! semantics. Guards are never held across an `.await`.
//!
//! A poisoned lock is recovered on every path, port methods and seeding
//! helpers alike. Each mutation is a single assignment or push made after
//! all fallible checks, so a panicking holder cannot leave a half-applied
//! write behind.
//!
//! Providers are kept in insertion order, which is the "store order" that
//! equidistant proximity results preserve.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    ProviderRepository, ProviderRepositoryError, RequesterRepository, RequesterRepositoryError,
    ReviewRepository, ReviewRepositoryError,
};
use crate::domain::{
    BoundingBox, GeoPoint, Provider, ProviderFilter, ProviderId, RatingValue, Requester,
    RequesterId, Review,
};

#[derive(Debug, Default)]
struct StoreState {
    providers: Vec<Provider>,
    requesters: Vec<Requester>,
    reviews: Vec<Review>,
}

impl StoreState {
    fn provider_mut(&mut self, id: &ProviderId) -> Option<&mut Provider> {
        self.providers.iter_mut().find(|provider| provider.id == *id)
    }

    fn has_provider(&self, id: &ProviderId) -> bool {
        self.providers.iter().any(|provider| provider.id == *id)
    }

    fn has_requester(&self, id: &RequesterId) -> bool {
        self.requesters.iter().any(|requester| requester.id == *id)
    }
}

/// Marketplace store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryMarketplaceStore {
    state: Mutex<StoreState>,
}

impl InMemoryMarketplaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a provider, replacing any provider with the same id.
    ///
    /// Registration belongs to the identity collaborator; this exists to
    /// seed the store.
    pub fn insert_provider(&self, provider: Provider) {
        let mut state = self.lock();
        match state.provider_mut(&provider.id) {
            Some(existing) => *existing = provider,
            None => state.providers.push(provider),
        }
    }

    /// Register a requester, replacing any requester with the same id.
    pub fn insert_requester(&self, requester: Requester) {
        let mut state = self.lock();
        match state
            .requesters
            .iter_mut()
            .find(|existing| existing.id == requester.id)
        {
            Some(existing) => *existing = requester,
            None => state.requesters.push(requester),
        }
    }

    /// Number of reviews stored for `provider_id`.
    pub fn review_count(&self, provider_id: &ProviderId) -> usize {
        self.lock()
            .reviews
            .iter()
            .filter(|review| review.provider_id == *provider_id)
            .count()
    }
}

#[async_trait]
impl ProviderRepository for InMemoryMarketplaceStore {
    async fn find_by_id(
        &self,
        id: &ProviderId,
    ) -> Result<Option<Provider>, ProviderRepositoryError> {
        let state = self.lock();
        Ok(state
            .providers
            .iter()
            .find(|provider| provider.id == *id)
            .cloned())
    }

    async fn list_matching(
        &self,
        filter: &ProviderFilter,
    ) -> Result<Vec<Provider>, ProviderRepositoryError> {
        let state = self.lock();
        Ok(state
            .providers
            .iter()
            .filter(|provider| filter.matches(provider))
            .cloned()
            .collect())
    }

    async fn find_in_bounds(
        &self,
        bounds: &BoundingBox,
        filter: &ProviderFilter,
    ) -> Result<Vec<Provider>, ProviderRepositoryError> {
        let state = self.lock();
        Ok(state
            .providers
            .iter()
            .filter(|provider| {
                provider
                    .location
                    .is_some_and(|location| bounds.contains(&location))
                    && filter.matches(provider)
            })
            .cloned()
            .collect())
    }

    async fn save_details(&self, provider: &Provider) -> Result<(), ProviderRepositoryError> {
        let mut state = self.lock();
        let stored = state
            .provider_mut(&provider.id)
            .ok_or_else(|| ProviderRepositoryError::not_found(provider.id.to_string()))?;
        *stored = Provider {
            rating: stored.rating,
            rating_revision: stored.rating_revision,
            ..provider.clone()
        };
        Ok(())
    }

    async fn save_rating(
        &self,
        id: &ProviderId,
        rating: f64,
        expected_revision: u32,
    ) -> Result<u32, ProviderRepositoryError> {
        let mut state = self.lock();
        let stored = state
            .provider_mut(id)
            .ok_or_else(|| ProviderRepositoryError::not_found(id.to_string()))?;
        if stored.rating_revision != expected_revision {
            return Err(ProviderRepositoryError::revision_mismatch(
                expected_revision,
                stored.rating_revision,
            ));
        }
        let next = stored
            .rating_revision
            .checked_add(1)
            .ok_or_else(|| ProviderRepositoryError::query("rating revision overflow"))?;
        stored.rating = rating;
        stored.rating_revision = next;
        Ok(next)
    }
}

#[async_trait]
impl RequesterRepository for InMemoryMarketplaceStore {
    async fn find_by_id(
        &self,
        id: &RequesterId,
    ) -> Result<Option<Requester>, RequesterRepositoryError> {
        let state = self.lock();
        Ok(state
            .requesters
            .iter()
            .find(|requester| requester.id == *id)
            .cloned())
    }

    async fn save_position(
        &self,
        id: &RequesterId,
        position: GeoPoint,
    ) -> Result<(), RequesterRepositoryError> {
        let mut state = self.lock();
        let requester = state
            .requesters
            .iter_mut()
            .find(|requester| requester.id == *id)
            .ok_or_else(|| RequesterRepositoryError::not_found(id.to_string()))?;
        requester.position = Some(position);
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryMarketplaceStore {
    async fn upsert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut state = self.lock();
        if !state.has_provider(&review.provider_id) {
            return Err(ReviewRepositoryError::missing_party(format!(
                "provider {}",
                review.provider_id
            )));
        }
        if !state.has_requester(&review.requester_id) {
            return Err(ReviewRepositoryError::missing_party(format!(
                "requester {}",
                review.requester_id
            )));
        }
        match state.reviews.iter_mut().find(|existing| {
            existing.provider_id == review.provider_id
                && existing.requester_id == review.requester_id
        }) {
            Some(existing) => {
                existing.rating = review.rating;
                existing.updated_at = review.updated_at;
            }
            None => state.reviews.push(review.clone()),
        }
        Ok(())
    }

    async fn ratings_for_provider(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<RatingValue>, ReviewRepositoryError> {
        let state = self.lock();
        Ok(state
            .reviews
            .iter()
            .filter(|review| review.provider_id == *provider_id)
            .map(|review| review.rating)
            .collect())
    }
}
