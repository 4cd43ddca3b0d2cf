//! PostgreSQL-backed `ReviewRepository` using Diesel.
//!
//! Reviews are keyed by `(provider_id, requester_id)`; a resubmission becomes
//! an `ON CONFLICT DO UPDATE` that keeps the original `created_at`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{ProviderId, RatingValue, Review};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_error_message};
use super::models::NewReviewRow;
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the [`ReviewRepository`] port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    ReviewRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => ReviewRepositoryError::connection(message),
        StoreFailure::ForeignKey(constraint) => {
            ReviewRepositoryError::missing_party(format!("constraint {constraint}"))
        }
        StoreFailure::Query(message) => ReviewRepositoryError::query(message),
    }
}

fn rating_from_db(rating: i16) -> Result<RatingValue, ReviewRepositoryError> {
    u8::try_from(rating)
        .ok()
        .and_then(|value| RatingValue::new(value).ok())
        .ok_or_else(|| ReviewRepositoryError::query(format!("stored rating {rating} is out of range")))
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn upsert(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewReviewRow {
            provider_id: *review.provider_id.as_uuid(),
            requester_id: *review.requester_id.as_uuid(),
            rating: i16::from(review.rating.get()),
            created_at: review.created_at,
            updated_at: review.updated_at,
        };

        diesel::insert_into(reviews::table)
            .values(&row)
            .on_conflict((reviews::provider_id, reviews::requester_id))
            .do_update()
            .set((
                reviews::rating.eq(excluded(reviews::rating)),
                reviews::updated_at.eq(excluded(reviews::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn ratings_for_provider(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<RatingValue>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stored: Vec<i16> = reviews::table
            .filter(reviews::provider_id.eq(*provider_id.as_uuid()))
            .select(reviews::rating)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        stored.into_iter().map(rating_from_db).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Some(1))]
    #[case(5, Some(5))]
    #[case(0, None)]
    #[case(-3, None)]
    #[case(300, None)]
    fn stored_ratings_are_range_checked(#[case] stored: i16, #[case] expected: Option<u8>) {
        assert_eq!(rating_from_db(stored).ok().map(RatingValue::get), expected);
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        assert!(matches!(
            map_pool_error(PoolError::build("bad url")),
            ReviewRepositoryError::Connection { .. }
        ));
    }
}
